//! Melee and ranged units.

use outpost_core::{spatial, CellCoord, Entity, EntityAction, EntityType, MoveAction};
use outpost_system_targeting::{count_troops, is_worth_to_attack, search_for_enemies, Side};
use outpost_world::query;

use super::{charge, radius, toward, RoleBehavior, Rule};
use crate::TickContext;

const ENGAGEABLE: &[EntityType] = &[
    EntityType::Worker,
    EntityType::MeleeUnit,
    EntityType::RangedUnit,
    EntityType::WorkerBase,
    EntityType::MeleeBase,
    EntityType::RangedBase,
    EntityType::House,
    EntityType::Wall,
];

/// Troop priorities: retreat, raid, engage, then search the fog.
#[derive(Clone, Copy, Debug, Default)]
pub struct TroopRole;

const TROOP_RULES: &[Rule] = &[
    Rule {
        name: "retreat",
        apply: retreat,
    },
    Rule {
        name: "raid_worker_base",
        apply: raid_worker_base,
    },
    Rule {
        name: "raid_workers",
        apply: raid_workers,
    },
    Rule {
        name: "raid_troop_bases",
        apply: raid_troop_bases,
    },
    Rule {
        name: "engage",
        apply: engage,
    },
    Rule {
        name: "chase_sighting",
        apply: chase_sighting,
    },
    Rule {
        name: "advance",
        apply: advance,
    },
];

impl RoleBehavior for TroopRole {
    fn name(&self) -> &'static str {
        "troop"
    }

    fn rules(&self) -> &'static [Rule] {
        TROOP_RULES
    }
}

fn retreat(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    let home = CellCoord::new(0, 0);
    let reach = ctx.frame.base_size() + ctx.sight(EntityType::RangedUnit);
    if home.distance(troop.position) <= radius(reach) {
        return None;
    }

    let config = ctx.config;
    if is_worth_to_attack(ctx.snapshot, troop, &config.engagement, config.engagement_range) {
        return None;
    }
    Some(EntityAction::idle().with_move(MoveAction::advance(home)))
}

/// Raids are allowed once the troop share is met or the unit has left home.
fn may_raid(ctx: &TickContext<'_>, troop: &Entity) -> bool {
    let frame = ctx.frame;
    let base_size = frame.base_size();
    frame.troop_share() >= frame.troop_ratio()
        || (troop.position.x() > base_size && troop.position.y() > base_size)
}

fn raid(ctx: &TickContext<'_>, troop: &Entity, range: i32, kinds: &[EntityType]) -> Option<EntityAction> {
    if !may_raid(ctx, troop) {
        return None;
    }
    let target = search_for_enemies(ctx.snapshot, troop, radius(range), kinds)?;
    Some(charge(ctx, troop, target))
}

fn raid_worker_base(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    if troop.entity_type != EntityType::RangedUnit {
        return None;
    }
    raid(ctx, troop, ctx.config.troop_hunt_base_range, &[EntityType::WorkerBase])
}

fn raid_workers(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    let config = ctx.config;
    let guards = count_troops(
        ctx.snapshot,
        troop.position,
        Side::Enemy,
        radius(config.troop_guard_range),
    );
    if guards > 0 {
        return None;
    }
    raid(ctx, troop, config.troop_hunt_worker_range, &[EntityType::Worker])
}

fn raid_troop_bases(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    if troop.entity_type != EntityType::RangedUnit {
        return None;
    }
    raid(
        ctx,
        troop,
        ctx.config.troop_hunt_base_range,
        &[EntityType::MeleeBase, EntityType::RangedBase],
    )
}

fn engage(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    let target = search_for_enemies(ctx.snapshot, troop, f32::MAX, ENGAGEABLE)?;
    Some(charge(ctx, troop, target))
}

fn chase_sighting(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    if !ctx.snapshot.fog_of_war {
        return None;
    }
    let sighting = spatial::nearest_position(troop.position, query::memory(ctx.world).sightings())?;
    Some(toward(ctx, troop, sighting))
}

fn advance(ctx: &TickContext<'_>, troop: &Entity) -> Option<EntityAction> {
    if !ctx.snapshot.fog_of_war {
        return None;
    }
    let spawn = query::memory(ctx.world).spawn_for(troop.id)?;
    Some(toward(ctx, troop, spawn))
}
