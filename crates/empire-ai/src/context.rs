//! Decision Context
//!
//! Bundles everything one decision call borrows: the world view, the shared
//! seeded random source, the order sink, and the tuning constants.

use empire_types::{Order, OrderQueue};
use rand::{Rng, RngCore};

use crate::config::AiConfig;
use crate::world::WorldQuery;

/// Borrowed state for a single decision.
pub struct TurnContext<'a> {
    pub world: &'a dyn WorldQuery,
    pub rng: &'a mut dyn RngCore,
    pub orders: &'a mut OrderQueue,
    pub config: &'a AiConfig,
}

impl<'a> TurnContext<'a> {
    pub fn new(
        world: &'a dyn WorldQuery,
        rng: &'a mut dyn RngCore,
        orders: &'a mut OrderQueue,
        config: &'a AiConfig,
    ) -> Self {
        Self {
            world,
            rng,
            orders,
            config,
        }
    }

    /// Rolls a percentage: true with probability `percent / 100`.
    pub fn chance(&mut self, percent: u32) -> bool {
        self.rng.gen_range(0..100) < percent
    }

    pub fn submit(&mut self, order: Order) {
        self.orders.push(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockWorld;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_chance_bounds() {
        let world = MockWorld::new(1, 1);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut orders = OrderQueue::new();
        let config = AiConfig::default();
        let mut ctx = TurnContext::new(&world, &mut rng, &mut orders, &config);

        for _ in 0..200 {
            assert!(!ctx.chance(0));
            assert!(ctx.chance(100));
        }
    }
}
