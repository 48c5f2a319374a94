//! Pure spatial helpers shared by the grid model and every system.

use crate::{CellCoord, Footprint, MAP_SIZE};

/// Returns the candidate closest to `from` by Euclidean distance.
///
/// Ties keep the first candidate seen. An empty slice yields `None`.
#[must_use]
pub fn nearest_position(from: CellCoord, candidates: &[CellCoord]) -> Option<CellCoord> {
    let mut best: Option<(f32, CellCoord)> = None;

    for &candidate in candidates {
        let distance = from.distance(candidate);
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, candidate)),
        }
    }

    best.map(|(_, cell)| cell)
}

/// Iterates every in-bounds tile within Manhattan `radius` of the footprint.
///
/// The scan window is clipped independently on each axis, so a footprint
/// next to a map edge still yields the unclipped part of its range.
pub fn diamond_cells(footprint: Footprint, radius: i32) -> impl Iterator<Item = CellCoord> {
    let radius = radius.max(0);
    let origin = footprint.origin();
    let far = footprint.size().max(1) - 1;

    let min_x = (origin.x() - radius).max(0);
    let max_x = (origin.x() + far + radius).min(MAP_SIZE - 1);
    let min_y = (origin.y() - radius).max(0);
    let max_y = (origin.y() + far + radius).min(MAP_SIZE - 1);

    (min_x..=max_x)
        .flat_map(move |x| (min_y..=max_y).map(move |y| CellCoord::new(x, y)))
        .filter(move |cell| footprint.manhattan_gap(*cell) <= radius)
}
