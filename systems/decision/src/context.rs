//! Read-only view shared by every role during one tick.

use outpost_core::{CellCoord, Entity, EntityType, MoveAction, WorldSnapshot};
use outpost_system_navigation::step_toward;
use outpost_world::{TickFrame, WorldState};

use crate::StrategyConfig;

/// Everything a role may consult while deciding.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// Snapshot being answered.
    pub snapshot: &'a WorldSnapshot,
    /// Planner state after folding in the snapshot.
    pub world: &'a WorldState,
    /// Aggregates of the snapshot.
    pub frame: &'a TickFrame,
    /// Rule tunables.
    pub config: &'a StrategyConfig,
}

impl<'a> TickContext<'a> {
    /// Bundles the tick's inputs.
    #[must_use]
    pub fn new(
        snapshot: &'a WorldSnapshot,
        world: &'a WorldState,
        frame: &'a TickFrame,
        config: &'a StrategyConfig,
    ) -> Self {
        Self {
            snapshot,
            world,
            frame,
            config,
        }
    }

    /// Build cost of the kind.
    #[must_use]
    pub fn cost(&self, kind: EntityType) -> i32 {
        self.snapshot.props(kind).initial_cost
    }

    /// Sight range of the kind.
    #[must_use]
    pub fn sight(&self, kind: EntityType) -> i32 {
        self.snapshot.props(kind).sight_range
    }

    /// Router step from the mover toward `goal`, as a move order.
    #[must_use]
    pub fn step(&self, mover: &Entity, goal: CellCoord) -> Option<MoveAction> {
        step_toward(self.world, self.snapshot, mover, goal).map(MoveAction::step)
    }
}
