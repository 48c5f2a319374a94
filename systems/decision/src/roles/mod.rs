//! Per-role priority lists.
//!
//! Each role is an ordered list of [`Rule`]s. The first rule whose guard holds
//! supplies the entity's action for the tick; later rules are not consulted.

mod production;
mod troop;
mod turret;
mod worker;

use std::fmt;

use outpost_core::{
    AttackAction, AutoAttack, BuildAction, CellCoord, Entity, EntityAction, EntityType, TargetRef,
    MAP_SIZE,
};
use outpost_system_placement::nearest_spawn_point;
use outpost_world::query;

use crate::TickContext;

pub use production::{TroopBaseRole, WorkerBaseRole};
pub use troop::TroopRole;
pub use turret::TurretRole;
pub use worker::WorkerRole;

/// Radius of searches that cover the whole map.
const MAP_RADIUS: f32 = MAP_SIZE as f32;

/// Guarded behaviour of a role.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Name reported in logs.
    pub name: &'static str,
    /// Returns the action when the guard holds.
    pub apply: fn(&TickContext<'_>, &Entity) -> Option<EntityAction>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Decision logic for one kind of owned entity.
pub trait RoleBehavior: Sync {
    /// Name reported in logs.
    fn name(&self) -> &'static str;

    /// Rules in priority order.
    fn rules(&self) -> &'static [Rule];

    /// First rule whose guard holds, with its action.
    fn decide(&self, ctx: &TickContext<'_>, entity: &Entity) -> Option<(&'static str, EntityAction)> {
        self.rules()
            .iter()
            .find_map(|rule| (rule.apply)(ctx, entity).map(|action| (rule.name, action)))
    }
}

static WORKER_BASE: WorkerBaseRole = WorkerBaseRole;
static TROOP_BASE: TroopBaseRole = TroopBaseRole;
static WORKER: WorkerRole = WorkerRole;
static TROOP: TroopRole = TroopRole;
static TURRET: TurretRole = TurretRole;

/// Role driving entities of the kind; houses, walls and resources have none.
#[must_use]
pub fn role_for(kind: EntityType) -> Option<&'static dyn RoleBehavior> {
    match kind {
        EntityType::WorkerBase => Some(&WORKER_BASE),
        EntityType::MeleeBase | EntityType::RangedBase => Some(&TROOP_BASE),
        EntityType::Worker => Some(&WORKER),
        EntityType::MeleeUnit | EntityType::RangedUnit => Some(&TROOP),
        EntityType::Turret => Some(&TURRET),
        EntityType::House | EntityType::Wall | EntityType::Resource => None,
    }
}

fn radius(range: i32) -> f32 {
    range as f32
}

/// Action carrying only a router step toward `goal`; idle when no route exists.
fn toward(ctx: &TickContext<'_>, entity: &Entity, goal: CellCoord) -> EntityAction {
    EntityAction {
        move_action: ctx.step(entity, goal),
        ..EntityAction::idle()
    }
}

/// Step toward the target while attacking it.
fn charge(ctx: &TickContext<'_>, entity: &Entity, target: TargetRef) -> EntityAction {
    toward(ctx, entity, target.position).with_attack(AttackAction::entity(target.id))
}

/// Step toward the target while attacking it, engaging others of `kinds`
/// within sight on the way.
fn charge_with_auto(
    ctx: &TickContext<'_>,
    entity: &Entity,
    target: TargetRef,
    kinds: &[EntityType],
) -> EntityAction {
    toward(ctx, entity, target.position).with_attack(AttackAction {
        target: Some(target.id),
        auto_attack: Some(AutoAttack {
            pathfind_range: ctx.sight(entity.entity_type),
            valid_targets: kinds.to_vec(),
        }),
    })
}

/// Orders the structure to release a unit on its spawn tile nearest `rally`.
fn spawn_toward(
    ctx: &TickContext<'_>,
    structure: &Entity,
    unit: EntityType,
    rally: CellCoord,
) -> Option<EntityAction> {
    let footprint = ctx.snapshot.footprint(structure);
    let position = nearest_spawn_point(query::world_grid(ctx.world), footprint, rally)?;
    Some(EntityAction::idle().with_build(BuildAction {
        entity_type: unit,
        position,
    }))
}
