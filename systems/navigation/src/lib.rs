#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flood-fill router used for unit movement and nearest-target searches.
//!
//! Every query builds a fresh [`CostGrid`] overlay, seeds it with start and
//! target tiles, and expands breadth-first waves from the starts. Movement
//! runs the fill backwards, from the goal toward the mover, so the mover's
//! next step is simply the neighbour whose wave is one lower than its own.

mod route;

use outpost_core::{CellCoord, MAP_AREA};
use tracing::trace;

pub use route::{nearest_resource, step_toward};

/// Number of waves it takes to clear a destructible tile.
pub const DESTRUCTIBLE_COST: u32 = 8;

/// Per-tile state of a single flood-fill call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathCost {
    /// Unvisited and free.
    Empty,
    /// Unvisited and passable after clearing.
    Destructible,
    /// Never entered.
    Blocked,
    /// Tile the fill is looking for.
    Target,
    /// Target touched by the wave currently being expanded.
    TargetReached,
    /// Distance from the nearest start, in waves.
    Wave(u32),
}

impl PathCost {
    /// Seed tile the expansion starts from.
    pub const START: Self = Self::Wave(0);

    /// Wave value of a visited tile.
    #[must_use]
    pub const fn wave(self) -> Option<u32> {
        match self {
            Self::Wave(wave) => Some(wave),
            _ => None,
        }
    }
}

/// Map-sized path-cost overlay stored column-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostGrid {
    cells: Vec<PathCost>,
}

impl CostGrid {
    /// Creates an overlay with every tile set to `cost`.
    #[must_use]
    pub fn filled(cost: PathCost) -> Self {
        Self {
            cells: vec![cost; MAP_AREA],
        }
    }

    /// Cost stored at the coordinate, or `None` outside the map.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<PathCost> {
        cell.grid_index()
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Wave value at the coordinate, if the tile has been visited.
    #[must_use]
    pub fn wave(&self, cell: CellCoord) -> Option<u32> {
        self.get(cell).and_then(PathCost::wave)
    }

    /// Writes a cost; writes outside the map are dropped.
    pub fn set(&mut self, cell: CellCoord, cost: PathCost) {
        if let Some(slot) = cell.grid_index().and_then(|index| self.cells.get_mut(index)) {
            *slot = cost;
        }
    }
}

/// Expands waves from every start tile until targets are reached.
///
/// Empty neighbours of a tile at wave `w` receive `w + 1`, destructible ones
/// `w + DESTRUCTIBLE_COST`, and adjacent targets are collected. Once the wave
/// that touched a target is exhausted, the touched targets are labelled
/// `w + 1` and returned in grid order. Waves beyond `max_wave` are not
/// expanded. An empty result means no target is reachable within the limit.
pub fn search_path(grid: &mut CostGrid, max_wave: Option<u32>) -> Vec<CellCoord> {
    let mut frontiers: Vec<Vec<usize>> = Vec::new();
    let mut pending = 0_usize;

    for (index, cost) in grid.cells.iter().enumerate() {
        if let PathCost::Wave(wave) = *cost {
            push_frontier(&mut frontiers, wave, index);
            pending += 1;
        }
    }

    let mut wave = 0_u32;
    let mut reached: Vec<usize> = Vec::new();

    while pending > 0 {
        if max_wave.is_some_and(|limit| wave > limit) {
            break;
        }

        let frontier = frontiers
            .get_mut(wave as usize)
            .map(std::mem::take)
            .unwrap_or_default();
        pending -= frontier.len();

        for cell in frontier.into_iter().filter_map(CellCoord::from_grid_index) {
            for neighbor in neighbors(cell) {
                let Some(index) = neighbor.grid_index() else {
                    continue;
                };
                let Some(slot) = grid.cells.get_mut(index) else {
                    continue;
                };

                let step = match *slot {
                    PathCost::Empty => 1,
                    PathCost::Destructible => DESTRUCTIBLE_COST,
                    PathCost::Target => {
                        *slot = PathCost::TargetReached;
                        reached.push(index);
                        continue;
                    }
                    _ => continue,
                };

                *slot = PathCost::Wave(wave + step);
                push_frontier(&mut frontiers, wave + step, index);
                pending += 1;
            }
        }

        if !reached.is_empty() {
            reached.sort_unstable();
            for &index in &reached {
                if let Some(slot) = grid.cells.get_mut(index) {
                    *slot = PathCost::Wave(wave + 1);
                }
            }
            return reached
                .into_iter()
                .filter_map(CellCoord::from_grid_index)
                .collect();
        }

        wave += 1;
    }

    trace!(wave, "flood fill reached no target");
    Vec::new()
}

fn push_frontier(frontiers: &mut Vec<Vec<usize>>, wave: u32, index: usize) {
    let slot = wave as usize;
    if frontiers.len() <= slot {
        frontiers.resize_with(slot + 1, Vec::new);
    }
    if let Some(frontier) = frontiers.get_mut(slot) {
        frontier.push(index);
    }
}

/// Neighbour whose wave is exactly one below `from`'s.
///
/// Candidates are checked in the order +x, +y, -x, -y.
#[must_use]
pub fn next_step(grid: &CostGrid, from: CellCoord) -> Option<CellCoord> {
    let wave = grid.wave(from)?.checked_sub(1)?;
    neighbors(from).find(|&neighbor| grid.wave(neighbor) == Some(wave))
}

/// Follows [`next_step`] from `from` down to a start tile.
///
/// The returned tiles exclude `from` and end on the start. The walk stops
/// early where a destructible tile breaks the one-step descent.
#[must_use]
pub fn trace_path(grid: &CostGrid, from: CellCoord) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut current = from;

    while let Some(next) = next_step(grid, current) {
        path.push(next);
        current = next;
        if grid.wave(next) == Some(0) || path.len() >= MAP_AREA {
            break;
        }
    }

    path
}

fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    [
        cell.offset(1, 0),
        cell.offset(0, 1),
        cell.offset(-1, 0),
        cell.offset(0, -1),
    ]
    .into_iter()
    .filter(CellCoord::in_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> CostGrid {
        CostGrid::filled(PathCost::Empty)
    }

    #[test]
    fn reaches_target_at_manhattan_wave() {
        let mut grid = open_grid();
        grid.set(CellCoord::new(0, 0), PathCost::START);
        grid.set(CellCoord::new(5, 5), PathCost::Target);

        let reached = search_path(&mut grid, None);

        assert_eq!(reached, vec![CellCoord::new(5, 5)]);
        assert_eq!(grid.wave(CellCoord::new(5, 5)), Some(10));
    }

    #[test]
    fn mover_steps_along_x_first() {
        let mover = CellCoord::new(0, 0);
        let mut grid = open_grid();
        grid.set(mover, PathCost::Target);
        grid.set(CellCoord::new(5, 5), PathCost::START);

        assert_eq!(search_path(&mut grid, None), vec![mover]);
        assert_eq!(grid.wave(mover), Some(10));
        assert_eq!(next_step(&grid, mover), Some(CellCoord::new(1, 0)));

        let path = trace_path(&grid, mover);
        assert_eq!(path.len(), 10);
        assert_eq!(path.last(), Some(&CellCoord::new(5, 5)));
    }

    fn corridor(tiles: &[PathCost]) -> CostGrid {
        let mut grid = CostGrid::filled(PathCost::Blocked);
        for (x, cost) in tiles.iter().enumerate() {
            grid.set(CellCoord::new(x as i32, 0), *cost);
        }
        grid
    }

    #[test]
    fn destructible_tile_costs_eight_waves() {
        let mut clear = corridor(&[
            PathCost::START,
            PathCost::Empty,
            PathCost::Empty,
            PathCost::Empty,
            PathCost::Empty,
            PathCost::Target,
        ]);
        let mut cluttered = corridor(&[
            PathCost::START,
            PathCost::Empty,
            PathCost::Destructible,
            PathCost::Empty,
            PathCost::Empty,
            PathCost::Target,
        ]);

        let _ = search_path(&mut clear, None);
        let reached = search_path(&mut cluttered, None);

        let target = CellCoord::new(5, 0);
        assert_eq!(reached, vec![target]);
        assert_eq!(clear.wave(target), Some(5));
        assert_eq!(cluttered.wave(target), Some(5 - 1 + DESTRUCTIBLE_COST));
    }

    #[test]
    fn empty_detour_within_seven_tiles_beats_destructible() {
        // The direct route crosses a destructible tile and would arrive at
        // wave 11; the empty detour is four tiles longer and arrives at 8.
        let mut grid = CostGrid::filled(PathCost::Blocked);
        for x in 0..=4 {
            grid.set(CellCoord::new(x, 0), PathCost::Empty);
            grid.set(CellCoord::new(x, 2), PathCost::Empty);
        }
        grid.set(CellCoord::new(0, 1), PathCost::Empty);
        grid.set(CellCoord::new(4, 1), PathCost::Empty);
        grid.set(CellCoord::new(2, 0), PathCost::Destructible);
        grid.set(CellCoord::new(0, 0), PathCost::START);
        grid.set(CellCoord::new(4, 0), PathCost::Target);

        let _ = search_path(&mut grid, None);
        assert_eq!(grid.wave(CellCoord::new(4, 0)), Some(8));
    }

    #[test]
    fn wave_limit_stops_expansion() {
        let mut grid = open_grid();
        grid.set(CellCoord::new(0, 0), PathCost::START);
        grid.set(CellCoord::new(0, 3), PathCost::Target);

        assert!(search_path(&mut grid.clone(), Some(1)).is_empty());
        assert_eq!(search_path(&mut grid, Some(2)), vec![CellCoord::new(0, 3)]);
    }

    #[test]
    fn walled_off_target_is_not_reached() {
        let mut grid = open_grid();
        grid.set(CellCoord::new(10, 10), PathCost::START);
        grid.set(CellCoord::new(0, 0), PathCost::Target);
        grid.set(CellCoord::new(1, 0), PathCost::Blocked);
        grid.set(CellCoord::new(0, 1), PathCost::Blocked);

        assert!(search_path(&mut grid, None).is_empty());
    }

    #[test]
    fn equally_near_targets_are_returned_in_grid_order() {
        let mut grid = open_grid();
        grid.set(CellCoord::new(10, 10), PathCost::START);
        grid.set(CellCoord::new(10, 12), PathCost::Target);
        grid.set(CellCoord::new(8, 10), PathCost::Target);
        grid.set(CellCoord::new(30, 30), PathCost::Target);

        assert_eq!(
            search_path(&mut grid, None),
            vec![CellCoord::new(8, 10), CellCoord::new(10, 12)]
        );
    }
}
