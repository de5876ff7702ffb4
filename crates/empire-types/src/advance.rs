//! Technology Tree
//!
//! Advances a player can research and the prerequisites that gate them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A technology advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
    Alphabet,
    BronzeWorking,
    CeremonialBurial,
    HorsebackRiding,
    Masonry,
    Pottery,
    Currency,
    CodeOfLaws,
    IronWorking,
    MapMaking,
    Mathematics,
    TheWheel,
    Writing,
    Literacy,
    Monarchy,
    Mysticism,
    Philosophy,
    Trade,
    Astronomy,
    BridgeBuilding,
    Feudalism,
    Chivalry,
    TheRepublic,
    University,
    Banking,
    Invention,
    Gunpowder,
    Democracy,
    Metallurgy,
    Physics,
    Conscription,
    Railroad,
    Industrialization,
    Steel,
    Combustion,
    Automobile,
    TheCorporation,
    MassProduction,
    Communism,
    LaborUnion,
}

impl Advance {
    /// Advances that must be known before this one can be researched.
    pub fn prerequisites(self) -> &'static [Advance] {
        use Advance::*;
        match self {
            Alphabet | BronzeWorking | CeremonialBurial | HorsebackRiding | Masonry | Pottery => &[],
            Currency => &[BronzeWorking],
            CodeOfLaws => &[Alphabet],
            IronWorking => &[BronzeWorking],
            MapMaking => &[Alphabet],
            Mathematics => &[Alphabet, Masonry],
            TheWheel => &[HorsebackRiding],
            Writing => &[Alphabet],
            Literacy => &[Writing, CodeOfLaws],
            Monarchy => &[CeremonialBurial, CodeOfLaws],
            Mysticism => &[CeremonialBurial, Philosophy],
            Philosophy => &[CodeOfLaws, Writing],
            Trade => &[CodeOfLaws, Writing, Pottery],
            Astronomy => &[Mysticism, Mathematics],
            BridgeBuilding => &[IronWorking, Mathematics],
            Feudalism => &[Monarchy, Masonry],
            Chivalry => &[Feudalism, HorsebackRiding],
            TheRepublic => &[CodeOfLaws, Literacy],
            University => &[Astronomy, Philosophy],
            Banking => &[Trade, TheRepublic],
            Invention => &[Writing, TheWheel],
            Gunpowder => &[Invention, IronWorking],
            Democracy => &[Banking, Invention],
            Metallurgy => &[Gunpowder, University],
            Physics => &[Mathematics, Literacy],
            Conscription => &[TheRepublic, Metallurgy],
            Railroad => &[BridgeBuilding, Physics],
            Industrialization => &[Railroad, Banking],
            Steel => &[Industrialization, Physics],
            Combustion => &[Physics, Industrialization],
            Automobile => &[Combustion, Steel],
            TheCorporation => &[Industrialization, Banking],
            MassProduction => &[Automobile, TheCorporation],
            Communism => &[Philosophy, Industrialization],
            LaborUnion => &[MassProduction, Communism],
        }
    }

    /// True when every prerequisite is contained in `known`.
    pub fn prerequisites_met(self, known: &BTreeSet<Advance>) -> bool {
        self.prerequisites().iter().all(|p| known.contains(p))
    }

    /// Advances not yet known whose prerequisites are all satisfied, in
    /// declaration order.
    pub fn available_to(known: &BTreeSet<Advance>) -> Vec<Advance> {
        Advance::all()
            .iter()
            .copied()
            .filter(|a| !known.contains(a) && a.prerequisites_met(known))
            .collect()
    }

    /// Research cost in bulbs given how many advances are already known.
    pub fn research_cost(known_count: usize) -> u32 {
        10 * (known_count as u32 + 1)
    }

    /// Returns all advances in declaration order.
    pub fn all() -> &'static [Advance] {
        use Advance::*;
        &[
            Alphabet,
            BronzeWorking,
            CeremonialBurial,
            HorsebackRiding,
            Masonry,
            Pottery,
            Currency,
            CodeOfLaws,
            IronWorking,
            MapMaking,
            Mathematics,
            TheWheel,
            Writing,
            Literacy,
            Monarchy,
            Mysticism,
            Philosophy,
            Trade,
            Astronomy,
            BridgeBuilding,
            Feudalism,
            Chivalry,
            TheRepublic,
            University,
            Banking,
            Invention,
            Gunpowder,
            Democracy,
            Metallurgy,
            Physics,
            Conscription,
            Railroad,
            Industrialization,
            Steel,
            Combustion,
            Automobile,
            TheCorporation,
            MassProduction,
            Communism,
            LaborUnion,
        ]
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        use Advance::*;
        match self {
            Alphabet => "Alphabet",
            BronzeWorking => "Bronze Working",
            CeremonialBurial => "Ceremonial Burial",
            HorsebackRiding => "Horseback Riding",
            Masonry => "Masonry",
            Pottery => "Pottery",
            Currency => "Currency",
            CodeOfLaws => "Code of Laws",
            IronWorking => "Iron Working",
            MapMaking => "Map Making",
            Mathematics => "Mathematics",
            TheWheel => "The Wheel",
            Writing => "Writing",
            Literacy => "Literacy",
            Monarchy => "Monarchy",
            Mysticism => "Mysticism",
            Philosophy => "Philosophy",
            Trade => "Trade",
            Astronomy => "Astronomy",
            BridgeBuilding => "Bridge Building",
            Feudalism => "Feudalism",
            Chivalry => "Chivalry",
            TheRepublic => "The Republic",
            University => "University",
            Banking => "Banking",
            Invention => "Invention",
            Gunpowder => "Gunpowder",
            Democracy => "Democracy",
            Metallurgy => "Metallurgy",
            Physics => "Physics",
            Conscription => "Conscription",
            Railroad => "Railroad",
            Industrialization => "Industrialization",
            Steel => "Steel",
            Combustion => "Combustion",
            Automobile => "Automobile",
            TheCorporation => "The Corporation",
            MassProduction => "Mass Production",
            Communism => "Communism",
            LaborUnion => "Labor Union",
        }
    }
}

impl fmt::Display for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots_available_at_start() {
        let available = Advance::available_to(&BTreeSet::new());
        assert!(available.contains(&Advance::Alphabet));
        assert!(available.contains(&Advance::Pottery));
        assert!(!available.contains(&Advance::Writing));
        assert_eq!(available.len(), 6);
    }

    #[test]
    fn test_prerequisites_unlock() {
        let mut known = BTreeSet::new();
        known.insert(Advance::Alphabet);
        let available = Advance::available_to(&known);
        assert!(available.contains(&Advance::Writing));
        assert!(available.contains(&Advance::CodeOfLaws));
        assert!(!available.contains(&Advance::Alphabet));
    }

    #[test]
    fn test_whole_tree_is_reachable() {
        let mut known = BTreeSet::new();
        loop {
            let available = Advance::available_to(&known);
            if available.is_empty() {
                break;
            }
            known.extend(available);
        }
        assert_eq!(known.len(), Advance::all().len());
    }

    #[test]
    fn test_every_prerequisite_is_declared() {
        for advance in Advance::all() {
            for prereq in advance.prerequisites() {
                assert!(Advance::all().contains(prereq));
                assert_ne!(prereq, advance);
            }
        }
    }
}
