#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Building placement search over the build grid.
//!
//! A candidate footprint is accepted when every tile is empty, with the
//! builder's own tile counted as empty because it will step aside. The
//! policies only differ in the order in which candidates are visited.

use serde::{Deserialize, Serialize};

use outpost_core::{spatial, CellCoord, Footprint, MAP_SIZE};
use outpost_world::TileGrid;
use tracing::trace;

/// Scan order used to pick a building site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Anti-diagonals moving away from the origin corner, each walked from
    /// the `y` axis toward the `x` axis.
    #[default]
    Corner,
    /// Anti-diagonals moving away from the origin corner, each walked outward
    /// from its midpoint in both directions at once.
    CornerCenter,
    /// Square rings of growing radius around the builder.
    AroundBuilder,
}

/// Accepted building site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Anchor tile of the new structure.
    pub origin: CellCoord,
    /// Open tiles bordering the footprint where a worker can stand to build.
    pub standing: Vec<CellCoord>,
}

/// What to place and how to look for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Tile currently occupied by the builder.
    pub builder: CellCoord,
    /// Side length of the structure.
    pub size: i32,
    /// Scan order.
    pub policy: PlacementPolicy,
    /// First anti-diagonal visited by the corner policies.
    pub from_diagonal: i32,
}

/// Finds the first acceptable site in the policy's scan order.
#[must_use]
pub fn find_placement(grid: &TileGrid, request: PlacementRequest) -> Option<Placement> {
    let found = match request.policy {
        PlacementPolicy::Corner => scan_corner(grid, request),
        PlacementPolicy::CornerCenter => scan_corner_center(grid, request),
        PlacementPolicy::AroundBuilder => scan_around_builder(grid, request),
    };

    if found.is_none() {
        trace!(policy = ?request.policy, size = request.size, "no building site");
    }
    found
}

fn scan_corner(grid: &TileGrid, request: PlacementRequest) -> Option<Placement> {
    for n in request.from_diagonal.max(0)..MAP_SIZE {
        for i in 0..=n {
            if let Some(found) = check_site(grid, request, CellCoord::new(i, n - i)) {
                return Some(found);
            }
        }
    }
    None
}

fn scan_corner_center(grid: &TileGrid, request: PlacementRequest) -> Option<Placement> {
    for n in request.from_diagonal.max(0)..MAP_SIZE {
        let half = n / 2;
        let (mut i, mut j) = (half, half);
        let (mut i2, mut j2) = (half, half);

        while i <= n && j >= 0 && i2 >= 0 && j2 <= n {
            if let Some(found) = check_site(grid, request, CellCoord::new(i, j))
                .or_else(|| check_site(grid, request, CellCoord::new(i2, j2)))
            {
                return Some(found);
            }
            i += 1;
            j -= 1;
            i2 -= 1;
            j2 += 1;
        }
    }
    None
}

fn scan_around_builder(grid: &TileGrid, request: PlacementRequest) -> Option<Placement> {
    let center = request.builder;
    for n in 0..MAP_SIZE {
        for i in center.x() - n..=center.x() + n {
            for j in center.y() - n..=center.y() + n {
                // Interior tiles were already rejected by a smaller ring.
                if (i - center.x()).abs() < n && (j - center.y()).abs() < n {
                    continue;
                }
                if let Some(found) = check_site(grid, request, CellCoord::new(i, j)) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn check_site(grid: &TileGrid, request: PlacementRequest, origin: CellCoord) -> Option<Placement> {
    let size = request.size;
    if origin.x() < 0 || origin.y() < 0 || origin.x() >= MAP_SIZE - size || origin.y() >= MAP_SIZE - size {
        return None;
    }

    let footprint = Footprint::new(origin, size);
    let open = |cell: CellCoord| cell == request.builder || grid.is_empty(cell);
    if !footprint.cells().all(open) {
        return None;
    }

    Some(Placement {
        origin,
        standing: adjacent_open_tiles(grid, footprint, Some(request.builder)),
    })
}

/// Open tiles bordering the footprint.
///
/// Edges are scanned left, right, top, then bottom. `treat_as_open` names a
/// tile that counts as open regardless of the grid, typically the worker
/// asking.
#[must_use]
pub fn adjacent_open_tiles(
    grid: &TileGrid,
    footprint: Footprint,
    treat_as_open: Option<CellCoord>,
) -> Vec<CellCoord> {
    let origin = footprint.origin();
    let size = footprint.size();
    let edges = [
        (origin.offset(-1, 0), (0, 1)),
        (origin.offset(size, 0), (0, 1)),
        (origin.offset(0, -1), (1, 0)),
        (origin.offset(0, size), (1, 0)),
    ];

    edges
        .into_iter()
        .flat_map(|(start, (dx, dy))| (0..size).map(move |k| start.offset(dx * k, dy * k)))
        .filter(|&cell| cell.in_bounds())
        .filter(|&cell| Some(cell) == treat_as_open || grid.is_empty(cell))
        .collect()
}

/// Open tiles where a structure can release a freshly built unit.
#[must_use]
pub fn spawn_points(grid: &TileGrid, footprint: Footprint) -> Vec<CellCoord> {
    adjacent_open_tiles(grid, footprint, None)
}

/// Spawn tile of the structure closest to `rally`.
#[must_use]
pub fn nearest_spawn_point(grid: &TileGrid, footprint: Footprint, rally: CellCoord) -> Option<CellCoord> {
    spatial::nearest_position(rally, &spawn_points(grid, footprint))
}
