//! Workers: fighting back, repairs, construction and gathering.

use outpost_core::{
    spatial, AttackAction, BuildAction, Entity, EntityAction, EntityType, RepairAction,
};
use outpost_system_navigation::nearest_resource;
use outpost_system_placement::{find_placement, PlacementPolicy, PlacementRequest};
use outpost_system_targeting::{
    count_troops, find_repair_job, is_closer_than_peers, search_for_enemies, RepairJob, Side,
};
use outpost_world::query;
use tracing::trace;

use super::{charge_with_auto, radius, toward, RoleBehavior, Rule, MAP_RADIUS};
use crate::TickContext;

const HUNT_WORKERS: &[EntityType] = &[EntityType::Worker];
const HUNT_STRUCTURES: &[EntityType] = &[
    EntityType::WorkerBase,
    EntityType::MeleeBase,
    EntityType::RangedBase,
    EntityType::House,
];
const HUNT_TROOPS: &[EntityType] = &[EntityType::MeleeUnit, EntityType::RangedUnit];
const SKIRMISH_BASES: &[EntityType] = &[
    EntityType::WorkerBase,
    EntityType::MeleeBase,
    EntityType::RangedBase,
];
const THREATS: &[EntityType] = &[
    EntityType::MeleeUnit,
    EntityType::RangedUnit,
    EntityType::Turret,
];
const REPAIR_NEARBY: &[EntityType] = &[
    EntityType::WorkerBase,
    EntityType::RangedBase,
    EntityType::House,
    EntityType::Turret,
];

/// Worker priorities, from fighting back down to scouting.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerRole;

const WORKER_RULES: &[Rule] = &[
    Rule {
        name: "hunt_workers",
        apply: hunt_workers,
    },
    Rule {
        name: "hunt_structures",
        apply: hunt_structures,
    },
    Rule {
        name: "hunt_troops",
        apply: hunt_troops,
    },
    Rule {
        name: "skirmish_workers",
        apply: skirmish_workers,
    },
    Rule {
        name: "skirmish_bases",
        apply: skirmish_bases,
    },
    Rule {
        name: "repair",
        apply: repair,
    },
    Rule {
        name: "flee",
        apply: flee,
    },
    Rule {
        name: "build_worker_base",
        apply: build_worker_base,
    },
    Rule {
        name: "build_ranged_base",
        apply: build_ranged_base,
    },
    Rule {
        name: "build_house",
        apply: build_house,
    },
    Rule {
        name: "gather",
        apply: gather,
    },
    Rule {
        name: "advance",
        apply: advance,
    },
];

impl RoleBehavior for WorkerRole {
    fn name(&self) -> &'static str {
        "worker"
    }

    fn rules(&self) -> &'static [Rule] {
        WORKER_RULES
    }
}

/// Map-wide hunt, only once no resource is left to gather.
fn hunt(ctx: &TickContext<'_>, worker: &Entity, kinds: &[EntityType]) -> Option<EntityAction> {
    if ctx.frame.resources_on_map() > 0 {
        return None;
    }
    let target = search_for_enemies(ctx.snapshot, worker, MAP_RADIUS, kinds)?;
    Some(charge_with_auto(ctx, worker, target, kinds))
}

fn hunt_workers(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    hunt(ctx, worker, HUNT_WORKERS)
}

fn hunt_structures(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    hunt(ctx, worker, HUNT_STRUCTURES)
}

fn hunt_troops(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    hunt(ctx, worker, HUNT_TROOPS)
}

/// Fights a nearby enemy when no own troop is around to do it.
fn skirmish(ctx: &TickContext<'_>, worker: &Entity, kinds: &[EntityType]) -> Option<EntityAction> {
    let config = ctx.config;
    let target = search_for_enemies(
        ctx.snapshot,
        worker,
        radius(config.worker_skirmish_range),
        kinds,
    )?;
    if count_troops(ctx.snapshot, worker.position, Side::Ally, radius(config.worker_flee_range)) > 0 {
        return None;
    }
    Some(charge_with_auto(ctx, worker, target, kinds))
}

fn skirmish_workers(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    skirmish(ctx, worker, HUNT_WORKERS)
}

fn skirmish_bases(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    skirmish(ctx, worker, SKIRMISH_BASES)
}

fn repair(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let config = ctx.config;
    let frame = ctx.frame;
    if frame.resources() < config.repair_min_resources && frame.count(EntityType::Worker) <= 1 {
        return None;
    }

    let melee_base_job = if frame.count(EntityType::RangedBase) == 0 {
        find_repair_job(ctx.world, ctx.snapshot, worker, &[EntityType::MeleeBase], MAP_RADIUS)
    } else {
        None
    };
    let RepairJob { target, standing } = melee_base_job.or_else(|| {
        find_repair_job(
            ctx.world,
            ctx.snapshot,
            worker,
            REPAIR_NEARBY,
            radius(config.worker_repair_range),
        )
    })?;

    if !is_closer_than_peers(ctx.snapshot, worker, target.position, config.repair_crew_size) {
        return None;
    }

    let spot = spatial::nearest_position(worker.position, &standing)?;
    Some(toward(ctx, worker, spot).with_repair(RepairAction { target: target.id }))
}

fn flee(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let snapshot = ctx.snapshot;
    if count_troops(snapshot, worker.position, Side::Ally, 1.0) > 0 {
        return None;
    }
    if nearest_resource(ctx.world, snapshot, worker.position, Some(1)).is_some() {
        return None;
    }
    let threat = search_for_enemies(snapshot, worker, radius(ctx.config.worker_flee_range), THREATS)?;

    let here = worker.position;
    let away = here
        .offset(here.x() - threat.position.x(), here.y() - threat.position.y())
        .clamped();
    Some(toward(ctx, worker, away))
}

/// Sends the closest worker to raise a structure on the first free site.
///
/// Falls through when the site has no open tile to stand on.
fn construct(
    ctx: &TickContext<'_>,
    worker: &Entity,
    kind: EntityType,
    policy: PlacementPolicy,
    from_diagonal: i32,
) -> Option<EntityAction> {
    let placement = find_placement(
        query::build_grid(ctx.world),
        PlacementRequest {
            builder: worker.position,
            size: ctx.snapshot.props(kind).size,
            policy,
            from_diagonal,
        },
    )?;

    if !is_closer_than_peers(ctx.snapshot, worker, placement.origin, 1) {
        return None;
    }

    let Some(spot) = spatial::nearest_position(worker.position, &placement.standing) else {
        trace!(?kind, origin = ?placement.origin, "building site has no standing tile");
        return None;
    };
    Some(toward(ctx, worker, spot).with_build(BuildAction {
        entity_type: kind,
        position: placement.origin,
    }))
}

fn build_worker_base(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let kind = EntityType::WorkerBase;
    if ctx.frame.count(kind) > 0 || ctx.frame.resources() < ctx.cost(kind) {
        return None;
    }
    construct(ctx, worker, kind, ctx.config.worker_base_placement, 0)
}

fn build_ranged_base(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let kind = EntityType::RangedBase;
    if ctx.frame.count(kind) > 0 || ctx.frame.resources() < ctx.cost(kind) {
        return None;
    }
    construct(
        ctx,
        worker,
        kind,
        ctx.config.ranged_base_placement,
        ctx.frame.base_size(),
    )
}

fn build_house(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let kind = EntityType::House;
    let frame = ctx.frame;
    let houses = i32::try_from(frame.count(kind)).unwrap_or(i32::MAX);
    if frame.resources() < ctx.cost(kind).saturating_mul(houses.saturating_add(1)) {
        return None;
    }
    let provided = ctx.snapshot.props(kind).population_provide;
    if frame.population_used() < frame.population_max() - provided {
        return None;
    }
    construct(ctx, worker, kind, ctx.config.house_placement, 0)
}

fn gather(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let resource = nearest_resource(ctx.world, ctx.snapshot, worker.position, None)?;
    Some(toward(ctx, worker, resource.position).with_attack(AttackAction::entity(resource.id)))
}

fn advance(ctx: &TickContext<'_>, worker: &Entity) -> Option<EntityAction> {
    let memory = query::memory(ctx.world);
    let goal = if ctx.snapshot.fog_of_war {
        memory.spawn_for(worker.id)?
    } else {
        spatial::nearest_position(worker.position, memory.spawns())?
    };
    Some(toward(ctx, worker, goal))
}
