//! Retreat heuristic for melee and ranged units.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use outpost_core::{CellCoord, Entity, EntityType, WorldSnapshot};

/// Distances at which a troop stands its ground regardless of the odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldDistances {
    /// Own ranged unit facing an enemy ranged unit.
    pub ranged_vs_ranged: i32,
    /// Own ranged unit facing an enemy melee unit.
    pub ranged_vs_melee: i32,
    /// Own melee unit facing an enemy ranged unit.
    pub melee_vs_ranged: i32,
    /// Own melee unit facing an enemy melee unit.
    pub melee_vs_melee: i32,
}

impl Default for HoldDistances {
    fn default() -> Self {
        Self {
            ranged_vs_ranged: 5,
            ranged_vs_melee: 3,
            melee_vs_ranged: 5,
            melee_vs_melee: 1,
        }
    }
}

impl HoldDistances {
    fn between(&self, own: EntityType, enemy: EntityType) -> Option<i32> {
        match (own, enemy) {
            (EntityType::RangedUnit, EntityType::RangedUnit) => Some(self.ranged_vs_ranged),
            (EntityType::RangedUnit, EntityType::MeleeUnit) => Some(self.ranged_vs_melee),
            (EntityType::MeleeUnit, EntityType::RangedUnit) => Some(self.melee_vs_ranged),
            (EntityType::MeleeUnit, EntityType::MeleeUnit) => Some(self.melee_vs_melee),
            _ => None,
        }
    }
}

/// Health multipliers and hold distances of the retreat heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementRules {
    /// Threat weight of an enemy melee unit's health.
    pub enemy_melee_weight: f32,
    /// Threat weight of an enemy ranged unit's health.
    pub enemy_ranged_weight: f32,
    /// Defense weight of an own melee unit's health.
    pub ally_melee_weight: f32,
    /// Defense weight of an own ranged unit's health.
    pub ally_ranged_weight: f32,
    /// Unconditional hold distances.
    pub hold: HoldDistances,
}

impl Default for EngagementRules {
    fn default() -> Self {
        Self {
            enemy_melee_weight: 0.5,
            enemy_ranged_weight: 1.5,
            ally_melee_weight: 0.33,
            ally_ranged_weight: 1.0,
            hold: HoldDistances::default(),
        }
    }
}

impl EngagementRules {
    fn threat(&self, enemy: &Entity) -> i32 {
        weighted(enemy.health, self.enemy_melee_weight, self.enemy_ranged_weight, enemy.entity_type)
    }

    fn defense(&self, ally: &Entity) -> i32 {
        weighted(ally.health, self.ally_melee_weight, self.ally_ranged_weight, ally.entity_type)
    }
}

fn weighted(health: i32, melee: f32, ranged: f32, kind: EntityType) -> i32 {
    let weight = match kind {
        EntityType::MeleeUnit => melee,
        EntityType::RangedUnit => ranged,
        _ => 0.0,
    };
    (health as f32 * weight) as i32
}

/// Decides whether `troop` should keep fighting.
///
/// Every enemy troop within `range` of the unit adds its weighted health to
/// the threat score, and every own troop within `range` of such an enemy adds
/// its weighted health to the defense score once. The unit holds when it is
/// already within a hold distance of some enemy, when an engaged enemy is
/// nearer the home corner than a defending ally, or when defense is at least
/// the threat.
#[must_use]
pub fn is_worth_to_attack(
    snapshot: &WorldSnapshot,
    troop: &Entity,
    rules: &EngagementRules,
    range: i32,
) -> bool {
    let home = CellCoord::new(0, 0);
    let footprint = snapshot.footprint(troop);
    let mut threat = 0;
    let mut defense = 0;
    let mut counted = BTreeSet::new();

    for enemy in snapshot
        .hostile_entities()
        .filter(|enemy| enemy.entity_type.is_troop())
    {
        if let Some(hold) = rules.hold.between(troop.entity_type, enemy.entity_type) {
            if footprint.is_at_range(enemy.position, hold) {
                return true;
            }
        }

        if !footprint.is_at_range(enemy.position, range) {
            continue;
        }
        threat += rules.threat(enemy);

        let enemy_footprint = snapshot.footprint(enemy);
        for ally in snapshot
            .my_entities()
            .filter(|ally| ally.entity_type.is_troop())
            .filter(|ally| enemy_footprint.is_at_range(ally.position, range))
        {
            if home.distance(enemy.position) < home.distance(ally.position) {
                return true;
            }
            if counted.insert(ally.id) {
                defense += rules.defense(ally);
            }
        }
    }

    defense >= threat
}
