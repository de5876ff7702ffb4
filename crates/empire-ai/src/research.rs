//! Research Policy

use empire_types::{Order, PlayerId};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::context::TurnContext;

/// Starts a random available advance for `player` if nothing is being
/// researched. Players with nothing left to research stay idle.
pub fn decide_research(ctx: &mut TurnContext<'_>, player: PlayerId) {
    let world = ctx.world;
    let Some(p) = world.player(player) else {
        return;
    };
    if p.research.is_some() {
        return;
    }

    let available = world.available_research(player);
    let Some(&advance) = available.choose(&mut *ctx.rng) else {
        debug!(%player, "no research available");
        return;
    };
    info!(
        "AI: {} of the {} starts researching {}.",
        p.leader.name, p.tribe, advance
    );
    ctx.submit(Order::SetResearch { player, advance });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::testing::MockWorld;
    use empire_types::fixtures::{self, AI};
    use empire_types::{Advance, OrderQueue};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn decide(world: &MockWorld, seed: u64) -> Vec<Order> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut orders = OrderQueue::new();
        let config = AiConfig::default();
        {
            let mut ctx = TurnContext::new(world, &mut rng, &mut orders, &config);
            decide_research(&mut ctx, AI);
        }
        orders.drain()
    }

    #[test]
    fn test_picks_an_available_advance() {
        let mut world = MockWorld::new(1, 1);
        world.add_player(fixtures::ai_player(AI.0));
        let available = Advance::available_to(&Default::default());

        for seed in 0..10 {
            match decide(&world, seed).as_slice() {
                [Order::SetResearch { player, advance }] => {
                    assert_eq!(*player, AI);
                    assert!(available.contains(advance), "{} not available", advance);
                }
                other => panic!("unexpected orders {:?}", other),
            }
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let mut world = MockWorld::new(1, 1);
        world.add_player(fixtures::ai_player(AI.0));
        assert_eq!(decide(&world, 11), decide(&world, 11));
    }

    #[test]
    fn test_research_in_progress_is_kept() {
        let mut world = MockWorld::new(1, 1);
        world.add_player(fixtures::ai_player(AI.0));
        world.player_mut(AI).research = Some(Advance::Pottery);

        assert!(decide(&world, 1).is_empty());
    }

    #[test]
    fn test_idle_when_everything_is_known() {
        let mut world = MockWorld::new(1, 1);
        world.add_player(fixtures::ai_player(AI.0).with_advances(Advance::all().iter().copied()));

        assert!(decide(&world, 1).is_empty());
    }
}
