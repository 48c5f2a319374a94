//! Production structures: unit spawning.

use outpost_core::{spatial, Entity, EntityAction, EntityType};
use outpost_system_navigation::nearest_resource;
use outpost_system_targeting::search_for_enemies;
use outpost_world::query;

use super::{radius, spawn_toward, RoleBehavior, Rule, MAP_RADIUS};
use crate::TickContext;

/// Worker base: keeps the worker share topped up.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerBaseRole;

const WORKER_BASE_RULES: &[Rule] = &[Rule {
    name: "spawn_worker",
    apply: spawn_worker,
}];

impl RoleBehavior for WorkerBaseRole {
    fn name(&self) -> &'static str {
        "worker_base"
    }

    fn rules(&self) -> &'static [Rule] {
        WORKER_BASE_RULES
    }
}

/// Melee and ranged bases: reinforce the troop share and defend home.
#[derive(Clone, Copy, Debug, Default)]
pub struct TroopBaseRole;

const TROOP_BASE_RULES: &[Rule] = &[
    Rule {
        name: "defend_base",
        apply: defend_base,
    },
    Rule {
        name: "reinforce",
        apply: reinforce,
    },
];

impl RoleBehavior for TroopBaseRole {
    fn name(&self) -> &'static str {
        "troop_base"
    }

    fn rules(&self) -> &'static [Rule] {
        TROOP_BASE_RULES
    }
}

/// Radius around a structure treated as the home region.
fn home_guard(ctx: &TickContext<'_>, structure: &Entity) -> f32 {
    radius(ctx.frame.base_size() + ctx.sight(structure.entity_type))
}

fn spawn_worker(ctx: &TickContext<'_>, base: &Entity) -> Option<EntityAction> {
    let frame = ctx.frame;
    let worker_cost = ctx.cost(EntityType::Worker);

    if frame.resources() < worker_cost {
        return None;
    }
    if search_for_enemies(ctx.snapshot, base, home_guard(ctx, base), &[]).is_some() {
        return None;
    }
    if frame.has_troop_base() && frame.resources() < ctx.cost(EntityType::MeleeUnit) + worker_cost {
        return None;
    }
    if frame.worker_share() >= 1.0 - frame.troop_ratio() {
        return None;
    }

    let resource = nearest_resource(ctx.world, ctx.snapshot, base.position, None)?;
    spawn_toward(ctx, base, EntityType::Worker, resource.position)
}

fn unit_of(base: EntityType) -> Option<EntityType> {
    match base {
        EntityType::MeleeBase => Some(EntityType::MeleeUnit),
        EntityType::RangedBase => Some(EntityType::RangedUnit),
        _ => None,
    }
}

fn defend_base(ctx: &TickContext<'_>, base: &Entity) -> Option<EntityAction> {
    let unit = unit_of(base.entity_type)?;
    let intruder = search_for_enemies(ctx.snapshot, base, home_guard(ctx, base), &[])?;
    spawn_toward(ctx, base, unit, intruder.position)
}

fn reinforce(ctx: &TickContext<'_>, base: &Entity) -> Option<EntityAction> {
    let unit = unit_of(base.entity_type)?;
    let frame = ctx.frame;

    if base.entity_type == EntityType::MeleeBase && frame.count(EntityType::RangedBase) > 0 {
        return None;
    }
    if frame.troop_share() >= frame.troop_ratio() {
        return None;
    }

    let memory = query::memory(ctx.world);
    let rally = search_for_enemies(ctx.snapshot, base, MAP_RADIUS, &[])
        .map(|enemy| enemy.position)
        .or_else(|| spatial::nearest_position(base.position, memory.sightings()))
        .or_else(|| spatial::nearest_position(base.position, memory.spawns()))
        .unwrap_or(base.position);

    spawn_toward(ctx, base, unit, rally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::scaffolding::SnapshotBuilder;
    use outpost_core::{BuildAction, CellCoord, WorldSnapshot};
    use outpost_world::{observe, TickFrame, WorldState};

    use crate::StrategyConfig;

    fn decide(snapshot: &WorldSnapshot, role: &dyn RoleBehavior, kind: EntityType) -> Option<(&'static str, EntityAction)> {
        let config = StrategyConfig::default();
        let mut world = WorldState::default();
        let _ = observe(&mut world, snapshot);
        let frame = TickFrame::from_snapshot(snapshot, config.troop_ratio);
        let ctx = TickContext::new(snapshot, &world, &frame, &config);
        let entity = snapshot
            .my_entities()
            .find(|entity| entity.entity_type == kind)
            .expect("structure added by the test");
        role.decide(&ctx, entity)
    }

    #[test]
    fn worker_base_spawns_toward_resources() {
        let mut builder = SnapshotBuilder::new();
        builder.resources(100);
        let _ = builder.mine(EntityType::WorkerBase, 5, 5);
        let _ = builder.mine(EntityType::House, 20, 0);
        let _ = builder.resource(30, 7);
        let snapshot = builder.build();

        let (rule, action) = decide(&snapshot, &WorkerBaseRole, EntityType::WorkerBase).expect("spawns");
        assert_eq!(rule, "spawn_worker");
        assert_eq!(
            action.build_action,
            Some(BuildAction {
                entity_type: EntityType::Worker,
                position: CellCoord::new(10, 7),
            })
        );
    }

    #[test]
    fn worker_base_waits_for_resources() {
        let mut builder = SnapshotBuilder::new();
        builder.resources(5);
        let _ = builder.mine(EntityType::WorkerBase, 5, 5);
        let _ = builder.resource(30, 7);
        let snapshot = builder.build();

        assert_eq!(decide(&snapshot, &WorkerBaseRole, EntityType::WorkerBase), None);
    }

    #[test]
    fn worker_base_holds_when_enemies_are_home() {
        let mut builder = SnapshotBuilder::new();
        builder.resources(100);
        let _ = builder.mine(EntityType::WorkerBase, 5, 5);
        let _ = builder.resource(30, 7);
        let _ = builder.hostile(EntityType::MeleeUnit, 12, 7);
        let snapshot = builder.build();

        assert_eq!(decide(&snapshot, &WorkerBaseRole, EntityType::WorkerBase), None);
    }

    #[test]
    fn troop_base_defends_against_intruders() {
        let mut builder = SnapshotBuilder::new();
        let _ = builder.mine(EntityType::RangedBase, 20, 20);
        let _ = builder.hostile(EntityType::Worker, 22, 16);
        let snapshot = builder.build();

        let (rule, action) = decide(&snapshot, &TroopBaseRole, EntityType::RangedBase).expect("defends");
        assert_eq!(rule, "defend_base");
        assert_eq!(
            action.build_action.as_ref().map(|build| build.entity_type),
            Some(EntityType::RangedUnit)
        );
        assert_eq!(action.build_action.map(|build| build.position), Some(CellCoord::new(22, 19)));
    }

    #[test]
    fn melee_base_defers_to_ranged_base() {
        let mut builder = SnapshotBuilder::new();
        let _ = builder.mine(EntityType::MeleeBase, 20, 20);
        let _ = builder.mine(EntityType::RangedBase, 20, 30);
        let _ = builder.mine(EntityType::House, 0, 0);
        let snapshot = builder.build();

        assert_eq!(decide(&snapshot, &TroopBaseRole, EntityType::MeleeBase), None);
        let (rule, _) = decide(&snapshot, &TroopBaseRole, EntityType::RangedBase).expect("reinforces");
        assert_eq!(rule, "reinforce");
    }
}
