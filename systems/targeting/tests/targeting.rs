use outpost_core::{
    scaffolding::SnapshotBuilder, CellCoord, Entity, EntityId, EntityType, WorldSnapshot,
};
use outpost_system_targeting::{
    count_troops, find_repair_job, is_worth_to_attack, search_for_enemies, EngagementRules, Side,
};
use outpost_world::{observe, WorldState};
use proptest::prelude::*;

fn entity(snapshot: &WorldSnapshot, id: EntityId) -> &Entity {
    snapshot
        .entities
        .iter()
        .find(|entity| entity.id == id)
        .expect("entity added by the test")
}

fn observed(snapshot: &WorldSnapshot) -> WorldState {
    let mut world = WorldState::default();
    let _ = observe(&mut world, snapshot);
    world
}

#[test]
fn nearest_damaged_structure_is_repaired() {
    let mut builder = SnapshotBuilder::new();
    let me = Some(builder.my_id());
    let worker = builder.mine(EntityType::Worker, 10, 10);
    let _ = builder.add(me, EntityType::House, CellCoord::new(20, 20), Some(10));
    let near = builder.add(me, EntityType::House, CellCoord::new(12, 12), Some(10));
    let _ = builder.mine(EntityType::House, 10, 5);
    let snapshot = builder.build();
    let world = observed(&snapshot);

    let job = find_repair_job(&world, &snapshot, entity(&snapshot, worker), &[], 80.0)
        .expect("damaged houses exist");
    assert_eq!(job.target.id, near);
    assert_eq!(job.standing.len(), 12);
    assert!(job.standing.contains(&CellCoord::new(11, 12)));
}

#[test]
fn repair_respects_kind_filter_and_range() {
    let mut builder = SnapshotBuilder::new();
    let me = Some(builder.my_id());
    let worker = builder.mine(EntityType::Worker, 10, 10);
    let _ = builder.add(me, EntityType::MeleeBase, CellCoord::new(30, 10), Some(100));
    let _ = builder.add(me, EntityType::Wall, CellCoord::new(11, 10), Some(1));
    let snapshot = builder.build();
    let world = observed(&snapshot);
    let worker = entity(&snapshot, worker);

    assert!(find_repair_job(&world, &snapshot, worker, &[EntityType::House], 80.0).is_none());
    assert!(find_repair_job(&world, &snapshot, worker, &[EntityType::MeleeBase], 20.0).is_none());
    assert!(find_repair_job(&world, &snapshot, worker, &[EntityType::MeleeBase], 21.0).is_some());
    assert!(find_repair_job(&world, &snapshot, worker, &[EntityType::Wall], 80.0).is_none());
}

#[test]
fn worker_standing_beside_the_job_keeps_its_tile() {
    let mut builder = SnapshotBuilder::new();
    let me = Some(builder.my_id());
    let worker = builder.mine(EntityType::Worker, 3, 0);
    let _ = builder.add(me, EntityType::House, CellCoord::new(0, 0), Some(10));
    let snapshot = builder.build();
    let world = observed(&snapshot);

    let job = find_repair_job(&world, &snapshot, entity(&snapshot, worker), &[], 80.0)
        .expect("damaged house");
    assert_eq!(job.standing.first(), Some(&CellCoord::new(3, 0)));
    assert_eq!(job.standing.len(), 6);
}

#[test]
fn turret_targets_anything_in_reach() {
    let mut builder = SnapshotBuilder::new();
    let turret = builder.mine(EntityType::Turret, 20, 20);
    let wall = builder.hostile(EntityType::Wall, 24, 21);
    let snapshot = builder.build();

    let found = search_for_enemies(&snapshot, entity(&snapshot, turret), 5.0, &[])
        .expect("wall in range");
    assert_eq!(found.id, wall);
}

#[test]
fn support_tips_the_balance() {
    let mut builder = SnapshotBuilder::new();
    let me = builder.mine(EntityType::MeleeUnit, 40, 40);
    let _ = builder.mine(EntityType::RangedUnit, 39, 40);
    let _ = builder.mine(EntityType::RangedUnit, 40, 39);
    let _ = builder.mine(EntityType::MeleeUnit, 39, 39);
    let _ = builder.hostile(EntityType::RangedUnit, 46, 40);
    let _ = builder.hostile(EntityType::RangedUnit, 46, 41);
    let snapshot = builder.build();

    assert!(is_worth_to_attack(
        &snapshot,
        entity(&snapshot, me),
        &EngagementRules::default(),
        7
    ));
}

#[test]
fn engagement_rules_load_from_toml() {
    let rules: EngagementRules = toml::from_str(
        r#"
        enemy_ranged_weight = 2.0

        [hold]
        melee_vs_melee = 2
        "#,
    )
    .expect("valid rules");

    assert_eq!(rules.enemy_ranged_weight, 2.0);
    assert_eq!(rules.enemy_melee_weight, 0.5);
    assert_eq!(rules.hold.melee_vs_melee, 2);
    assert_eq!(rules.hold.ranged_vs_melee, 3);
}

proptest! {
    #[test]
    fn troop_count_grows_with_radius(
        troops in proptest::collection::vec((0..80i32, 0..80i32, any::<bool>()), 0..30),
        radius in 0.0f32..60.0,
        extra in 0.0f32..20.0,
    ) {
        let mut builder = SnapshotBuilder::new();
        for (x, y, ranged) in troops {
            let kind = if ranged { EntityType::RangedUnit } else { EntityType::MeleeUnit };
            let _ = builder.hostile(kind, x, y);
        }
        let snapshot = builder.build();
        let anchor = CellCoord::new(40, 40);

        let inner = count_troops(&snapshot, anchor, Side::Enemy, radius);
        let outer = count_troops(&snapshot, anchor, Side::Enemy, radius + extra);
        prop_assert!(inner <= outer);
        prop_assert_eq!(count_troops(&snapshot, anchor, Side::Ally, 200.0), 0);
    }

    #[test]
    fn melee_targets_lie_within_radius(
        enemies in proptest::collection::vec((0..80i32, 0..80i32), 1..20),
        radius in 0.0f32..120.0,
    ) {
        let mut builder = SnapshotBuilder::new();
        let me = builder.mine(EntityType::MeleeUnit, 40, 40);
        for (x, y) in enemies {
            let _ = builder.hostile(EntityType::Worker, x, y);
        }
        let snapshot = builder.build();
        let seeker = entity(&snapshot, me);

        if let Some(found) = search_for_enemies(&snapshot, seeker, radius, &[]) {
            let best = seeker.position.distance(found.position);
            prop_assert!(best <= radius);
            for enemy in snapshot.hostile_entities() {
                prop_assert!(seeker.position.distance(enemy.position) >= best);
            }
        }
    }
}
