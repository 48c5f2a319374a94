#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Outpost tactical planner.
//!
//! This crate defines the per-tick boundary between the external simulation
//! and the decision engine. The simulation delivers a [`WorldSnapshot`]
//! describing every visible entity together with the static
//! [`PropertyTable`], the engine plans against it, and answers with an
//! [`ActionMap`] holding at most one action per channel for each owned
//! entity. Coordinates, footprints and the range predicates used by every
//! system live here as well so that all crates agree on their semantics.

mod action;
mod snapshot;
pub mod spatial;

#[cfg(feature = "test_scaffolding")]
pub mod scaffolding;

use serde::{Deserialize, Serialize};

pub use action::{
    ActionMap, AttackAction, AutoAttack, BuildAction, EntityAction, MoveAction, RepairAction,
};
pub use snapshot::{
    AttackProperties, BuildProperties, Entity, EntityProperties, EntityType, Player,
    PropertyTable, RepairProperties, SnapshotError, WorldSnapshot,
};

/// Side length of the square map every grid is sized for.
pub const MAP_SIZE: i32 = 80;

/// Number of tiles in a full map-sized grid.
pub const MAP_AREA: usize = (MAP_SIZE as usize) * (MAP_SIZE as usize);

/// Unique identifier assigned to an entity by the simulation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a participating player.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile.
///
/// Coordinates are signed so that intermediate results such as flee targets
/// can leave the map before being clamped back with [`CellCoord::clamped`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based horizontal index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based vertical index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether the coordinate lies inside the map.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < MAP_SIZE && self.y >= 0 && self.y < MAP_SIZE
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the coordinate pulled back inside the map on both axes.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.x.clamp(0, MAP_SIZE - 1), self.y.clamp(0, MAP_SIZE - 1))
    }

    /// Euclidean distance between two tiles.
    ///
    /// Used for ranking and proximity heuristics; attack and vision ranges use
    /// [`Footprint::is_at_range`] instead.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Dense index used by map-sized grids.
    ///
    /// Grids are stored column-major so that iterating indices visits `x`
    /// in the outer loop and `y` in the inner one.
    #[must_use]
    pub fn grid_index(self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        let side = usize::try_from(MAP_SIZE).ok()?;
        x.checked_mul(side)?.checked_add(y)
    }

    /// Inverse of [`CellCoord::grid_index`].
    #[must_use]
    pub fn from_grid_index(index: usize) -> Option<Self> {
        if index >= MAP_AREA {
            return None;
        }
        let side = usize::try_from(MAP_SIZE).ok()?;
        let x = i32::try_from(index / side).ok()?;
        let y = i32::try_from(index % side).ok()?;
        Some(Self::new(x, y))
    }
}

/// Square block of tiles occupied by an entity, anchored at its top-left tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    origin: CellCoord,
    size: i32,
}

impl Footprint {
    /// Constructs a footprint from its anchor tile and side length.
    #[must_use]
    pub const fn new(origin: CellCoord, size: i32) -> Self {
        Self { origin, size }
    }

    /// Upper-left tile that anchors the footprint.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Side length of the footprint in tiles.
    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Reports whether the tile belongs to the footprint.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= self.origin.x
            && cell.x < self.origin.x + self.size
            && cell.y >= self.origin.y
            && cell.y < self.origin.y + self.size
    }

    /// Iterates every tile of the footprint, `x` outer and `y` inner.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size.max(0);
        (0..size).flat_map(move |dx| (0..size).map(move |dy| origin.offset(dx, dy)))
    }

    /// Smallest Manhattan distance between the tile and any footprint tile.
    #[must_use]
    pub fn manhattan_gap(&self, target: CellCoord) -> i32 {
        let far = self.size.max(1) - 1;
        let gap_x = axis_gap(target.x, self.origin.x, self.origin.x + far);
        let gap_y = axis_gap(target.y, self.origin.y, self.origin.y + far);
        gap_x + gap_y
    }

    /// Attack and vision range test.
    ///
    /// True when some tile of the footprint lies inside the Manhattan disk of
    /// radius `range` around `target`. A negative range never matches.
    #[must_use]
    pub fn is_at_range(&self, target: CellCoord, range: i32) -> bool {
        range >= 0 && self.manhattan_gap(target) <= range
    }
}

fn axis_gap(value: i32, low: i32, high: i32) -> i32 {
    if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0
    }
}

/// Entity selected by a search, reported with its anchor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetRef {
    /// Identifier of the selected entity.
    pub id: EntityId,
    /// Anchor tile of the selected entity.
    pub position: CellCoord,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Footprint, MAP_AREA, MAP_SIZE};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn euclidean_distance_matches_pythagoras() {
        let distance = CellCoord::new(0, 0).distance(CellCoord::new(3, 4));
        assert!((distance - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn grid_index_is_column_major_and_invertible() {
        assert_eq!(CellCoord::new(0, 1).grid_index(), Some(1));
        assert_eq!(
            CellCoord::new(1, 0).grid_index(),
            Some(usize::try_from(MAP_SIZE).expect("positive"))
        );
        assert_eq!(CellCoord::new(-1, 0).grid_index(), None);
        assert_eq!(CellCoord::new(0, MAP_SIZE).grid_index(), None);

        let cell = CellCoord::new(17, 42);
        let index = cell.grid_index().expect("in bounds");
        assert_eq!(CellCoord::from_grid_index(index), Some(cell));
        assert_eq!(CellCoord::from_grid_index(MAP_AREA), None);
    }

    #[test]
    fn clamped_pulls_coordinates_back_inside() {
        assert_eq!(CellCoord::new(-4, 95).clamped(), CellCoord::new(0, MAP_SIZE - 1));
        assert_eq!(CellCoord::new(3, 7).clamped(), CellCoord::new(3, 7));
    }

    #[test]
    fn adjacent_worker_is_within_range_one_but_not_zero() {
        let ally = Footprint::new(CellCoord::new(3, 3), 1);
        let enemy = CellCoord::new(4, 3);
        assert!(ally.is_at_range(enemy, 1));
        assert!(!ally.is_at_range(enemy, 0));
    }

    #[test]
    fn range_counts_every_footprint_tile() {
        let base = Footprint::new(CellCoord::new(10, 10), 5);
        assert!(base.is_at_range(CellCoord::new(16, 14), 2));
        assert!(!base.is_at_range(CellCoord::new(16, 16), 2));
        assert!(base.is_at_range(CellCoord::new(12, 12), 0));
    }

    #[test]
    fn footprint_cells_cover_the_square() {
        let footprint = Footprint::new(CellCoord::new(2, 5), 2);
        let cells: Vec<_> = footprint.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(2, 5),
                CellCoord::new(2, 6),
                CellCoord::new(3, 5),
                CellCoord::new(3, 6),
            ]
        );
        assert!(footprint.contains(CellCoord::new(3, 6)));
        assert!(!footprint.contains(CellCoord::new(4, 6)));
    }
}
