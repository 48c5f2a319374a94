//! Stationary turrets.

use outpost_core::{AttackAction, AutoAttack, Entity, EntityAction, EntityType};
use outpost_system_targeting::search_for_enemies;

use super::{radius, RoleBehavior, Rule};
use crate::TickContext;

/// Turret: fire at the weakest enemy in range.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurretRole;

const TURRET_RULES: &[Rule] = &[Rule {
    name: "fire",
    apply: fire,
}];

impl RoleBehavior for TurretRole {
    fn name(&self) -> &'static str {
        "turret"
    }

    fn rules(&self) -> &'static [Rule] {
        TURRET_RULES
    }
}

fn fire(ctx: &TickContext<'_>, turret: &Entity) -> Option<EntityAction> {
    let range = ctx.snapshot.props(turret.entity_type).attack_range()?;
    let target = search_for_enemies(ctx.snapshot, turret, radius(range), &[])?;
    let valid_targets = EntityType::ALL
        .into_iter()
        .filter(|kind| *kind != EntityType::Resource)
        .collect();

    Some(EntityAction::idle().with_attack(AttackAction {
        target: Some(target.id),
        auto_attack: Some(AutoAttack {
            pathfind_range: ctx.sight(turret.entity_type),
            valid_targets,
        }),
    }))
}
