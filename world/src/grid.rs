//! Occupancy grids rebuilt from each processed snapshot.

use serde::{Deserialize, Serialize};

use outpost_core::{spatial, CellCoord, EntityType, Footprint, WorldSnapshot, MAP_AREA};

/// Occupancy state of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Nothing known occupies the tile.
    #[default]
    Empty,
    /// An entity occupies the tile.
    Blocked,
    /// A resource occupies the tile; it can be cleared at a cost.
    Destructible,
}

/// Margins kept clear around owned core structures on the build grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildIndent {
    /// Margin when the whole map is visible.
    pub open: i32,
    /// Margin under fog of war.
    pub fogged: i32,
}

impl Default for BuildIndent {
    fn default() -> Self {
        Self { open: 2, fogged: 1 }
    }
}

/// Which of the two per-tick grids a rebuild targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GridLayer {
    /// Pathing grid: plain footprints.
    World,
    /// Placement grid: owned core structures inflated by a margin.
    Build(BuildIndent),
}

/// Dense map-sized tile grid stored column-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid with every tile empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![Tile::Empty; MAP_AREA],
        }
    }

    /// Tile stored at the coordinate, or `None` outside the map.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Tile> {
        cell.grid_index()
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the coordinate is inside the map and empty.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.get(cell) == Some(Tile::Empty)
    }

    /// Writes a tile; writes outside the map are dropped.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(slot) = cell.grid_index().and_then(|index| self.cells.get_mut(index)) {
            *slot = tile;
        }
    }

    /// Iterates every tile together with its coordinate, `x` outer and `y` inner.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| CellCoord::from_grid_index(index).map(|cell| (cell, *tile)))
    }

    fn stamp(&mut self, footprint: Footprint, tile: Tile) {
        for cell in footprint.cells() {
            self.set(cell, tile);
        }
    }

    /// Rebuilds the grid from the snapshot.
    ///
    /// Without fog the grid starts empty. Under fog, remembered destructible
    /// tiles survive unless an owned entity currently sees them, so resources
    /// outside vision stay on the map.
    pub(crate) fn rebuild(&mut self, snapshot: &WorldSnapshot, layer: GridLayer) {
        if snapshot.fog_of_war {
            for tile in &mut self.cells {
                if *tile != Tile::Destructible {
                    *tile = Tile::Empty;
                }
            }

            for entity in snapshot.my_entities() {
                let sight = snapshot.props(entity.entity_type).sight_range;
                for cell in spatial::diamond_cells(snapshot.footprint(entity), sight) {
                    self.set(cell, Tile::Empty);
                }
            }
        } else {
            self.cells.fill(Tile::Empty);
        }

        for entity in &snapshot.entities {
            let footprint = snapshot.footprint(entity);
            match layer {
                GridLayer::Build(indent)
                    if snapshot.is_mine(entity) && entity.entity_type.is_core_structure() =>
                {
                    let margin = structure_margin(snapshot, footprint, entity.entity_type, indent);
                    let inflated = Footprint::new(
                        footprint.origin().offset(-margin, -margin),
                        footprint.size() + margin * 2,
                    );
                    self.stamp(inflated, Tile::Blocked);
                }
                _ if entity.entity_type == EntityType::Resource => {
                    self.stamp(footprint, Tile::Destructible);
                }
                _ => self.stamp(footprint, Tile::Blocked),
            }
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

fn structure_margin(
    snapshot: &WorldSnapshot,
    footprint: Footprint,
    kind: EntityType,
    indent: BuildIndent,
) -> i32 {
    if !snapshot.fog_of_war {
        return indent.open;
    }

    let origin = footprint.origin();
    let size = footprint.size();
    let flush = (origin.x() == 0 && origin.y() == 0)
        || (origin.x() == 0 && origin.y() > size)
        || (origin.y() == 0 && origin.x() > size + 1);

    if kind == EntityType::House && flush {
        0
    } else {
        indent.fogged
    }
}
