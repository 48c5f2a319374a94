//! Damaged structure search for workers.

use outpost_core::{CellCoord, Entity, EntityType, TargetRef, WorldSnapshot};
use outpost_system_placement::adjacent_open_tiles;
use outpost_world::{query, WorldState};
use tracing::trace;

/// Structure in need of repair and where a worker can stand to fix it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairJob {
    /// Damaged structure.
    pub target: TargetRef,
    /// Open tiles around the structure, the worker's own tile included.
    pub standing: Vec<CellCoord>,
}

/// Finds the nearest damaged own structure of the listed kinds.
///
/// Only core structures qualify; an empty `kinds` list accepts all of them.
/// The structure must lie strictly within Euclidean `range` of the worker and
/// have an open tile beside it.
#[must_use]
pub fn find_repair_job(
    world: &WorldState,
    snapshot: &WorldSnapshot,
    worker: &Entity,
    kinds: &[EntityType],
    range: f32,
) -> Option<RepairJob> {
    let mut best: Option<(f32, &Entity)> = None;

    for structure in snapshot.my_entities() {
        let kind = structure.entity_type;
        if !kind.is_core_structure() || !(kinds.is_empty() || kinds.contains(&kind)) {
            continue;
        }
        if structure.health >= snapshot.props(kind).max_health {
            continue;
        }

        let distance = structure.position.distance(worker.position);
        if distance >= range {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, structure)),
        }
    }

    let (_, structure) = best?;
    let standing = adjacent_open_tiles(
        query::world_grid(world),
        snapshot.footprint(structure),
        Some(worker.position),
    );
    if standing.is_empty() {
        trace!(structure = structure.id.get(), "damaged structure is enclosed");
        return None;
    }

    Some(RepairJob {
        target: TargetRef {
            id: structure.id,
            position: structure.position,
        },
        standing,
    })
}
