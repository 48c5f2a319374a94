use outpost_core::{scaffolding::SnapshotBuilder, CellCoord, EntityType, Footprint, MAP_SIZE};
use outpost_system_placement::{
    find_placement, nearest_spawn_point, PlacementPolicy, PlacementRequest,
};
use outpost_world::{observe, query, Tile, TileGrid, WorldState};
use proptest::prelude::*;

#[test]
fn house_keeps_clear_of_the_base_margin() {
    let mut builder = SnapshotBuilder::new();
    let _ = builder.mine(EntityType::WorkerBase, 0, 0);
    let _ = builder.mine(EntityType::Worker, 10, 10);
    let snapshot = builder.build();
    let mut world = WorldState::default();
    let _ = observe(&mut world, &snapshot);

    let placement = find_placement(
        query::build_grid(&world),
        PlacementRequest {
            builder: CellCoord::new(10, 10),
            size: 3,
            policy: PlacementPolicy::Corner,
            from_diagonal: 0,
        },
    )
    .expect("room beside the base");

    assert_eq!(placement.origin, CellCoord::new(0, 7));
    assert_eq!(
        placement.standing,
        vec![
            CellCoord::new(3, 7),
            CellCoord::new(3, 8),
            CellCoord::new(3, 9),
            CellCoord::new(0, 10),
            CellCoord::new(1, 10),
            CellCoord::new(2, 10),
        ]
    );
}

#[test]
fn units_leave_toward_the_rally_point() {
    let mut builder = SnapshotBuilder::new();
    let _ = builder.mine(EntityType::MeleeBase, 20, 20);
    let _ = builder.mine(EntityType::MeleeUnit, 25, 22);
    let snapshot = builder.build();
    let mut world = WorldState::default();
    let _ = observe(&mut world, &snapshot);

    let base = Footprint::new(CellCoord::new(20, 20), 5);
    assert_eq!(
        nearest_spawn_point(query::world_grid(&world), base, CellCoord::new(60, 22)),
        Some(CellCoord::new(25, 21))
    );
}

#[test]
fn policies_parse_from_config_names() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        policy: PlacementPolicy,
    }

    let parsed: Wrapper = toml::from_str("policy = \"corner_center\"").expect("valid name");
    assert_eq!(parsed.policy, PlacementPolicy::CornerCenter);
    assert_eq!(PlacementPolicy::default(), PlacementPolicy::Corner);
}

fn policy() -> impl Strategy<Value = PlacementPolicy> {
    prop_oneof![
        Just(PlacementPolicy::Corner),
        Just(PlacementPolicy::CornerCenter),
        Just(PlacementPolicy::AroundBuilder),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn accepted_sites_are_open_and_inside_the_map(
        policy in policy(),
        size in 1..6i32,
        bx in 0..80i32,
        by in 0..80i32,
        blocked in proptest::collection::vec((0..80i32, 0..80i32), 0..400),
    ) {
        let mut grid = TileGrid::new();
        for (x, y) in blocked {
            grid.set(CellCoord::new(x, y), Tile::Blocked);
        }
        let request = PlacementRequest {
            builder: CellCoord::new(bx, by),
            size,
            policy,
            from_diagonal: 0,
        };

        if let Some(placement) = find_placement(&grid, request) {
            let origin = placement.origin;
            prop_assert!(origin.x() >= 0 && origin.y() >= 0);
            prop_assert!(origin.x() < MAP_SIZE - size && origin.y() < MAP_SIZE - size);
            for cell in Footprint::new(origin, size).cells() {
                prop_assert!(cell == request.builder || grid.is_empty(cell));
            }
            for cell in placement.standing {
                prop_assert!(cell == request.builder || grid.is_empty(cell));
            }
        }
    }
}
