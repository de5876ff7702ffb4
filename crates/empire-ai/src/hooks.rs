//! Capability Hooks
//!
//! Named extension points for decisions this ruleset does not make yet.
//! Each hook returns [`Capability::Undecided`] today; call sites resolve the
//! sentinel to the stock behaviour, so filling a hook in never touches the
//! policies that consult it.

use empire_types::{Order, Tile, Unit};

use crate::world::WorldQuery;

/// Answer of a capability hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<T> {
    /// The hook produced an answer
    Known(T),
    /// The hook cannot decide; callers fall back to stock behaviour
    Undecided,
}

impl<T> Capability<T> {
    /// Returns the known value or `fallback` when undecided.
    pub fn resolve(self, fallback: T) -> T {
        match self {
            Capability::Known(value) => value,
            Capability::Undecided => fallback,
        }
    }

    pub fn is_undecided(&self) -> bool {
        matches!(self, Capability::Undecided)
    }
}

/// Attribute aggregated over a unit stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAttribute {
    Attack,
    Defense,
}

/// Stock value of an undecided stack aggregate.
pub const STACK_ATTRIBUTE_FALLBACK: i32 = 1;

/// Whether `unit` is the strongest defender on its tile.
///
/// Undecided resolves to `false`.
pub fn is_best_defender(_world: &dyn WorldQuery, _unit: &Unit) -> Capability<bool> {
    Capability::Undecided
}

/// Aggregate of `attribute` over the stack that `unit` belongs to.
///
/// Undecided resolves to [`STACK_ATTRIBUTE_FALLBACK`].
pub fn stack_attribute(
    _world: &dyn WorldQuery,
    _unit: &Unit,
    _attribute: StackAttribute,
) -> Capability<i32> {
    Capability::Undecided
}

/// Railroad construction for a unit whose owner knows Railroad and whose
/// tile lacks one.
///
/// Undecided means nothing is built.
pub fn railroad_decision(_world: &dyn WorldQuery, _unit: &Unit, _tile: &Tile) -> Capability<Order> {
    Capability::Undecided
}
