//! Cost grids assembled from the world for the engine's two routing queries.

use outpost_core::{spatial, CellCoord, Entity, EntityType, TargetRef, WorldSnapshot};
use outpost_world::{query, Tile, WorldState};
use tracing::trace;

use crate::{next_step, search_path, CostGrid, PathCost};

/// Next tile the mover should enter on its way to `goal`.
///
/// Resources cost extra to cross, other entities block, and the attack range
/// of every hostile turret is off limits. An owned unit only blocks its tile
/// when it stood still since the previous tick. Returns `None` when no route
/// exists or the mover already covers the goal.
#[must_use]
pub fn step_toward(
    world: &WorldState,
    snapshot: &WorldSnapshot,
    mover: &Entity,
    goal: CellCoord,
) -> Option<CellCoord> {
    let footprint = snapshot.footprint(mover);
    if !goal.in_bounds() || footprint.contains(goal) {
        return None;
    }

    let mut grid = CostGrid::filled(PathCost::Blocked);
    for (cell, tile) in query::world_grid(world).iter() {
        let cost = match tile {
            Tile::Empty => PathCost::Empty,
            Tile::Destructible => PathCost::Destructible,
            Tile::Blocked => PathCost::Blocked,
        };
        grid.set(cell, cost);
    }

    for entity in &snapshot.entities {
        if entity.entity_type == EntityType::Resource {
            continue;
        }

        if snapshot.is_mine(entity) && entity.entity_type.is_unit() {
            let cost = if query::occupant_changed(world, entity.position) {
                PathCost::Empty
            } else {
                PathCost::Blocked
            };
            grid.set(entity.position, cost);
        } else {
            for cell in snapshot.footprint(entity).cells() {
                grid.set(cell, PathCost::Blocked);
            }
        }
    }

    for cell in footprint.cells() {
        grid.set(cell, PathCost::Target);
    }
    grid.set(goal, PathCost::START);

    let turret_range = snapshot
        .props(EntityType::Turret)
        .attack_range()
        .unwrap_or(0);
    for turret in snapshot
        .hostile_entities()
        .filter(|entity| entity.entity_type == EntityType::Turret)
    {
        for cell in spatial::diamond_cells(snapshot.footprint(turret), turret_range) {
            grid.set(cell, PathCost::Blocked);
        }
    }

    if search_path(&mut grid, None).is_empty() {
        trace!(mover = mover.id.get(), ?goal, "no route");
        return None;
    }

    next_step(&grid, mover.position)
}

/// Resource nearest to `from` among those first reached through free tiles.
///
/// Only empty tiles are crossed. Among the resources touched by the same wave,
/// the Euclidean-nearest one wins, ties going to the first in grid order.
#[must_use]
pub fn nearest_resource(
    world: &WorldState,
    snapshot: &WorldSnapshot,
    from: CellCoord,
    max_wave: Option<u32>,
) -> Option<TargetRef> {
    let mut grid = CostGrid::filled(PathCost::Blocked);
    for (cell, tile) in query::world_grid(world).iter() {
        if tile == Tile::Empty {
            grid.set(cell, PathCost::Empty);
        }
    }
    grid.set(from, PathCost::START);
    for resource in snapshot.resources() {
        grid.set(resource.position, PathCost::Target);
    }

    let reached = search_path(&mut grid, max_wave);
    let nearest = spatial::nearest_position(from, &reached)?;

    snapshot
        .resources()
        .find(|resource| resource.position == nearest)
        .map(|resource| TargetRef {
            id: resource.id,
            position: nearest,
        })
}
