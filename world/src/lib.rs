#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Planner state that persists across ticks.
//!
//! The world owns the pathing and placement grids, the enemy memory and the
//! own-unit occupancy history. Systems read it through [`query`]; only
//! [`observe`] mutates it, and only once per simulation tick.

mod frame;
mod grid;
mod memory;
mod occupancy;

use outpost_core::WorldSnapshot;
use tracing::debug;

pub use frame::TickFrame;
pub use grid::{BuildIndent, Tile, TileGrid};
pub use memory::EnemyMemory;

use grid::GridLayer;
use occupancy::UnitOccupancy;

/// Mutable planner state owned by the engine for the lifetime of a game.
#[derive(Clone, Debug)]
pub struct WorldState {
    world_grid: TileGrid,
    build_grid: TileGrid,
    memory: EnemyMemory,
    occupancy: UnitOccupancy,
    build_indent: BuildIndent,
    last_processed_tick: Option<u32>,
}

impl WorldState {
    /// Creates an empty world using the provided build-grid margins.
    #[must_use]
    pub fn new(build_indent: BuildIndent) -> Self {
        Self {
            world_grid: TileGrid::new(),
            build_grid: TileGrid::new(),
            memory: EnemyMemory::new(),
            occupancy: UnitOccupancy::new(),
            build_indent,
            last_processed_tick: None,
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(BuildIndent::default())
    }
}

/// Outcome of feeding a snapshot to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The snapshot belonged to a new tick and the state advanced.
    Advanced,
    /// The tick was already processed; the state is unchanged.
    AlreadyProcessed,
}

/// Folds a snapshot into the world.
///
/// Grids, memory and occupancy history advance only when the snapshot's tick
/// differs from the last processed one, so repeated deliveries of a tick are
/// harmless.
pub fn observe(world: &mut WorldState, snapshot: &WorldSnapshot) -> Observation {
    if world.last_processed_tick == Some(snapshot.current_tick) {
        return Observation::AlreadyProcessed;
    }
    world.last_processed_tick = Some(snapshot.current_tick);

    world.occupancy.advance(snapshot);

    if snapshot.fog_of_war {
        world.memory.seed_spawns(snapshot.players.len());
    }

    world.world_grid.rebuild(snapshot, GridLayer::World);
    world
        .build_grid
        .rebuild(snapshot, GridLayer::Build(world.build_indent));

    if snapshot.fog_of_war {
        let _ = world.memory.prune_sightings(snapshot);
        let _ = world.memory.prune_spawns(snapshot);
        world.memory.record_visible(snapshot);
    }

    debug!(
        tick = snapshot.current_tick,
        sightings = world.memory.sightings().len(),
        spawns = world.memory.spawns().len(),
        "world advanced"
    );

    Observation::Advanced
}

/// Read-only accessors over the world state.
pub mod query {
    use outpost_core::CellCoord;

    use super::{EnemyMemory, TileGrid, WorldState};

    /// Pathing grid of the last processed tick.
    #[must_use]
    pub fn world_grid(world: &WorldState) -> &TileGrid {
        &world.world_grid
    }

    /// Placement grid of the last processed tick.
    #[must_use]
    pub fn build_grid(world: &WorldState) -> &TileGrid {
        &world.build_grid
    }

    /// Remembered enemy positions.
    #[must_use]
    pub fn memory(world: &WorldState) -> &EnemyMemory {
        &world.memory
    }

    /// Reports whether the owned unit standing on the tile changed between
    /// the two most recent processed ticks.
    #[must_use]
    pub fn occupant_changed(world: &WorldState, cell: CellCoord) -> bool {
        world.occupancy.has_changed(cell)
    }

    /// Tick index of the last snapshot folded into the world.
    #[must_use]
    pub fn last_processed_tick(world: &WorldState) -> Option<u32> {
        world.last_processed_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::{scaffolding::SnapshotBuilder, CellCoord, EntityType};

    #[test]
    fn repeated_tick_is_ignored() {
        let mut builder = SnapshotBuilder::new();
        builder.tick(4);
        let _ = builder.mine(EntityType::Worker, 3, 3);

        let mut world = WorldState::default();
        assert_eq!(observe(&mut world, &builder.build()), Observation::Advanced);

        let _ = builder.mine(EntityType::Worker, 9, 9);
        assert_eq!(
            observe(&mut world, &builder.build()),
            Observation::AlreadyProcessed
        );
        assert!(query::world_grid(&world).is_empty(CellCoord::new(9, 9)));
        assert_eq!(query::last_processed_tick(&world), Some(4));
    }

    #[test]
    fn spawns_are_seeded_only_under_fog() {
        let mut builder = SnapshotBuilder::new();
        let mut clear = WorldState::default();
        let _ = observe(&mut clear, &builder.build());
        assert!(query::memory(&clear).spawns().is_empty());

        builder.fog_of_war(true);
        let mut fogged = WorldState::default();
        let _ = observe(&mut fogged, &builder.build());
        assert_eq!(query::memory(&fogged).spawns(), &[CellCoord::new(79, 79)]);

        builder.extra_player(3);
        let mut crowded = WorldState::default();
        let _ = observe(&mut crowded, &builder.build());
        assert_eq!(
            query::memory(&crowded).spawns(),
            &[
                CellCoord::new(79, 0),
                CellCoord::new(0, 79),
                CellCoord::new(79, 79)
            ]
        );
    }

    #[test]
    fn sightings_outlive_vision() {
        let mut builder = SnapshotBuilder::new();
        builder.fog_of_war(true);
        let _ = builder.mine(EntityType::House, 0, 0);
        let raider = builder.hostile(EntityType::MeleeUnit, 30, 30);

        let mut world = WorldState::default();
        let _ = observe(&mut world, &builder.build());

        builder.remove(raider);
        builder.tick(1);
        let _ = observe(&mut world, &builder.build());

        assert_eq!(query::memory(&world).sightings(), &[CellCoord::new(30, 30)]);
    }

    #[test]
    fn occupancy_history_tracks_moving_units() {
        let mut builder = SnapshotBuilder::new();
        let walker = builder.mine(EntityType::Worker, 10, 10);
        let _ = builder.mine(EntityType::Worker, 20, 20);

        let mut world = WorldState::default();
        let _ = observe(&mut world, &builder.build());
        builder.relocate(walker, 10, 11);
        builder.tick(1);
        let _ = observe(&mut world, &builder.build());

        assert!(query::occupant_changed(&world, CellCoord::new(10, 11)));
        assert!(!query::occupant_changed(&world, CellCoord::new(20, 20)));
    }
}
