//! Commands returned to the simulation at the end of a tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CellCoord, EntityId, EntityType};

/// Request to walk toward a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    /// Destination tile.
    pub target: CellCoord,
    /// Settle on the closest reachable tile when the target itself is unreachable.
    pub find_closest_position: bool,
    /// Clear destructible tiles that stand in the way.
    pub break_through: bool,
}

impl MoveAction {
    /// Step onto an adjacent tile chosen by the router, breaking through
    /// anything destructible there.
    #[must_use]
    pub const fn step(target: CellCoord) -> Self {
        Self {
            target,
            find_closest_position: false,
            break_through: true,
        }
    }

    /// Walk toward a tile, settling for the closest reachable one and breaking
    /// through anything destructible on the way.
    #[must_use]
    pub const fn advance(target: CellCoord) -> Self {
        Self {
            target,
            find_closest_position: true,
            break_through: true,
        }
    }
}

/// Request to construct a structure or spawn a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAction {
    /// Kind to produce.
    pub entity_type: EntityType,
    /// Anchor tile of the new entity.
    pub position: CellCoord,
}

/// Autonomous engagement the simulation performs when no explicit target is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAttack {
    /// Radius within which the simulation may path to a target.
    pub pathfind_range: i32,
    /// Kinds that may be engaged; empty means any kind.
    pub valid_targets: Vec<EntityType>,
}

/// Request to attack a specific entity, or to engage automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackAction {
    /// Explicit target, if any.
    pub target: Option<EntityId>,
    /// Automatic engagement settings, if any.
    pub auto_attack: Option<AutoAttack>,
}

impl AttackAction {
    /// Attacks the provided entity.
    #[must_use]
    pub const fn entity(target: EntityId) -> Self {
        Self {
            target: Some(target),
            auto_attack: None,
        }
    }
}

/// Request to repair or finish a structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairAction {
    /// Structure to repair.
    pub target: EntityId,
}

/// Per-entity command with one independent slot per channel.
///
/// An empty value tells the simulation to cancel whatever the entity was doing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAction {
    /// Movement channel.
    pub move_action: Option<MoveAction>,
    /// Construction channel.
    pub build_action: Option<BuildAction>,
    /// Combat channel.
    pub attack_action: Option<AttackAction>,
    /// Repair channel.
    pub repair_action: Option<RepairAction>,
}

impl EntityAction {
    /// Action with every channel empty.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Returns the action with the movement channel set.
    #[must_use]
    pub fn with_move(mut self, action: MoveAction) -> Self {
        self.move_action = Some(action);
        self
    }

    /// Returns the action with the construction channel set.
    #[must_use]
    pub fn with_build(mut self, action: BuildAction) -> Self {
        self.build_action = Some(action);
        self
    }

    /// Returns the action with the combat channel set.
    #[must_use]
    pub fn with_attack(mut self, action: AttackAction) -> Self {
        self.attack_action = Some(action);
        self
    }

    /// Returns the action with the repair channel set.
    #[must_use]
    pub fn with_repair(mut self, action: RepairAction) -> Self {
        self.repair_action = Some(action);
        self
    }

    /// Reports whether no channel carries a command.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.move_action.is_none()
            && self.build_action.is_none()
            && self.attack_action.is_none()
            && self.repair_action.is_none()
    }
}

/// Complete answer for one tick, keyed by owned entity.
pub type ActionMap = BTreeMap<EntityId, EntityAction>;
