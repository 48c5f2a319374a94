//! Own-unit occupancy across the two most recent processed ticks.

use outpost_core::{CellCoord, EntityId, WorldSnapshot, MAP_AREA};

/// Which owned unit stood on each tile at the previous and current tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnitOccupancy {
    previous: Vec<Option<EntityId>>,
    current: Vec<Option<EntityId>>,
}

impl UnitOccupancy {
    pub(crate) fn new() -> Self {
        Self {
            previous: vec![None; MAP_AREA],
            current: vec![None; MAP_AREA],
        }
    }

    /// Shifts the current layer into the past and records the snapshot's units.
    pub(crate) fn advance(&mut self, snapshot: &WorldSnapshot) {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.fill(None);

        for unit in snapshot
            .my_entities()
            .filter(|entity| entity.entity_type.is_unit())
        {
            if let Some(slot) = unit
                .position
                .grid_index()
                .and_then(|index| self.current.get_mut(index))
            {
                *slot = Some(unit.id);
            }
        }
    }

    /// Reports whether the tile's occupant differs between the two ticks.
    pub(crate) fn has_changed(&self, cell: CellCoord) -> bool {
        cell.grid_index().is_some_and(|index| {
            self.previous.get(index) != self.current.get(index)
        })
    }
}
