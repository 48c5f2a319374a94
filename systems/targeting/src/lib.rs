#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Snapshot-level target selection and proximity predicates.
//!
//! Everything here is a pure read of the snapshot (and, for repairs, of the
//! world grid). A miss is reported as `None` or `false` and never as an error.

mod engagement;
mod repair;

use outpost_core::{CellCoord, Entity, EntityType, TargetRef, WorldSnapshot};

pub use engagement::{is_worth_to_attack, EngagementRules, HoldDistances};
pub use repair::{find_repair_job, RepairJob};

/// Which side of the match a count refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The controlled player.
    Ally,
    /// Any other player.
    Enemy,
}

/// Picks the enemy `seeker` should engage.
///
/// Candidates are hostile, non-resource entities whose kind is listed in
/// `kinds`; an empty list accepts every kind. Ranged units and turrets first
/// look for the weakest candidate inside their attack range. Otherwise the
/// candidate nearest to the seeker's anchor within `radius` wins, ties going
/// to the earliest in snapshot order.
#[must_use]
pub fn search_for_enemies(
    snapshot: &WorldSnapshot,
    seeker: &Entity,
    radius: f32,
    kinds: &[EntityType],
) -> Option<TargetRef> {
    let candidates = || {
        snapshot.hostile_entities().filter(|enemy| {
            enemy.entity_type != EntityType::Resource
                && (kinds.is_empty() || kinds.contains(&enemy.entity_type))
        })
    };

    if matches!(seeker.entity_type, EntityType::RangedUnit | EntityType::Turret) {
        if let Some(range) = snapshot.props(seeker.entity_type).attack_range() {
            let footprint = snapshot.footprint(seeker);
            let weakest = candidates()
                .filter(|enemy| footprint.is_at_range(enemy.position, range))
                .fold(None::<&Entity>, |best, enemy| match best {
                    Some(current) if enemy.health >= current.health => Some(current),
                    _ => Some(enemy),
                });
            if let Some(enemy) = weakest {
                return Some(target_of(enemy));
            }
        }
    }

    let mut best: Option<(f32, &Entity)> = None;
    for enemy in candidates() {
        let distance = seeker.position.distance(enemy.position);
        if distance > radius {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, enemy)),
        }
    }

    best.map(|(_, enemy)| target_of(enemy))
}

/// Counts melee and ranged units of one side within Euclidean `radius` of
/// `anchor`.
#[must_use]
pub fn count_troops(snapshot: &WorldSnapshot, anchor: CellCoord, side: Side, radius: f32) -> usize {
    snapshot
        .entities
        .iter()
        .filter(|entity| entity.entity_type.is_troop())
        .filter(|entity| match side {
            Side::Ally => snapshot.is_mine(entity),
            Side::Enemy => snapshot.is_hostile(entity),
        })
        .filter(|entity| anchor.distance(entity.position) <= radius)
        .count()
}

/// Reports whether fewer than `max_closer` own peers of the same kind are
/// strictly closer to `target` than `entity`.
///
/// Limits how many workers commit to one job. A limit of zero never rejects.
#[must_use]
pub fn is_closer_than_peers(
    snapshot: &WorldSnapshot,
    entity: &Entity,
    target: CellCoord,
    max_closer: usize,
) -> bool {
    let own = entity.position.distance(target);
    let mut closer = 0_usize;

    for peer in snapshot.my_entities() {
        if peer.entity_type != entity.entity_type || peer.id == entity.id {
            continue;
        }
        if own > peer.position.distance(target) {
            closer += 1;
            if closer == max_closer {
                return false;
            }
        }
    }

    true
}

fn target_of(entity: &Entity) -> TargetRef {
    TargetRef {
        id: entity.id,
        position: entity.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::scaffolding::SnapshotBuilder;
    use outpost_core::{EntityId, PlayerId};

    fn entity(snapshot: &WorldSnapshot, id: EntityId) -> &Entity {
        snapshot
            .entities
            .iter()
            .find(|entity| entity.id == id)
            .expect("entity added by the test")
    }

    #[test]
    fn nearest_enemy_within_radius() {
        let mut builder = SnapshotBuilder::new();
        let me = builder.mine(EntityType::MeleeUnit, 10, 10);
        let _ = builder.hostile(EntityType::Worker, 20, 10);
        let near = builder.hostile(EntityType::House, 13, 10);
        let _ = builder.resource(11, 10);
        let snapshot = builder.build();
        let seeker = entity(&snapshot, me);

        let found = search_for_enemies(&snapshot, seeker, 80.0, &[]).expect("enemy in range");
        assert_eq!(found.id, near);
        assert_eq!(search_for_enemies(&snapshot, seeker, 2.0, &[]), None);
    }

    #[test]
    fn kind_filter_skips_other_enemies() {
        let mut builder = SnapshotBuilder::new();
        let me = builder.mine(EntityType::Worker, 10, 10);
        let _ = builder.hostile(EntityType::MeleeUnit, 11, 10);
        let far_worker = builder.hostile(EntityType::Worker, 30, 30);
        let snapshot = builder.build();

        let found = search_for_enemies(&snapshot, entity(&snapshot, me), 80.0, &[EntityType::Worker])
            .expect("worker on the map");
        assert_eq!(found.id, far_worker);
    }

    #[test]
    fn ranged_units_prefer_weakest_enemy_in_range() {
        let mut builder = SnapshotBuilder::new();
        let me = builder.mine(EntityType::RangedUnit, 10, 10);
        let opponent = Some(builder.opponent());
        let _ = builder.add(opponent, EntityType::MeleeUnit, CellCoord::new(11, 10), Some(40));
        let weak = builder.add(opponent, EntityType::MeleeUnit, CellCoord::new(14, 10), Some(5));
        let _ = builder.add(opponent, EntityType::MeleeUnit, CellCoord::new(40, 10), Some(1));
        let snapshot = builder.build();

        let found = search_for_enemies(&snapshot, entity(&snapshot, me), 80.0, &[]).expect("in range");
        assert_eq!(found.id, weak);
    }

    #[test]
    fn counts_troops_by_side() {
        let mut builder = SnapshotBuilder::new();
        let _ = builder.mine(EntityType::MeleeUnit, 5, 5);
        let _ = builder.mine(EntityType::RangedUnit, 5, 9);
        let _ = builder.mine(EntityType::Worker, 5, 6);
        let _ = builder.hostile(EntityType::RangedUnit, 6, 6);
        let _ = builder.add(
            Some(PlayerId::new(3)),
            EntityType::MeleeUnit,
            CellCoord::new(5, 7),
            None,
        );
        let snapshot = builder.build();
        let anchor = CellCoord::new(5, 5);

        assert_eq!(count_troops(&snapshot, anchor, Side::Ally, 3.0), 1);
        assert_eq!(count_troops(&snapshot, anchor, Side::Ally, 4.0), 2);
        assert_eq!(count_troops(&snapshot, anchor, Side::Enemy, 2.0), 2);
        assert_eq!(count_troops(&snapshot, anchor, Side::Enemy, 1.0), 0);
    }

    #[test]
    fn peers_closer_to_the_job_cap_commitment() {
        let mut builder = SnapshotBuilder::new();
        let far = builder.mine(EntityType::Worker, 20, 20);
        let near = builder.mine(EntityType::Worker, 2, 2);
        let _ = builder.mine(EntityType::Worker, 3, 3);
        let _ = builder.mine(EntityType::MeleeUnit, 1, 1);
        let snapshot = builder.build();
        let job = CellCoord::new(0, 0);

        assert!(is_closer_than_peers(&snapshot, entity(&snapshot, near), job, 1));
        assert!(!is_closer_than_peers(&snapshot, entity(&snapshot, far), job, 1));
        assert!(!is_closer_than_peers(&snapshot, entity(&snapshot, far), job, 2));
        assert!(is_closer_than_peers(&snapshot, entity(&snapshot, far), job, 3));
        assert!(is_closer_than_peers(&snapshot, entity(&snapshot, far), job, 0));
    }
}
