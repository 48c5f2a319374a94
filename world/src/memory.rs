//! Positions of enemies that have dropped out of sight.

use outpost_core::{CellCoord, EntityId, EntityType, WorldSnapshot, MAP_SIZE};
use tracing::debug;

/// Remembered enemy sightings and guessed enemy spawn corners.
///
/// Both lists are keyed by position and never hold duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyMemory {
    sightings: Vec<CellCoord>,
    spawns: Vec<CellCoord>,
    seeded: bool,
}

impl EnemyMemory {
    /// Creates an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known positions of hostile entities, oldest first.
    #[must_use]
    pub fn sightings(&self) -> &[CellCoord] {
        &self.sightings
    }

    /// Corners where an enemy base is still suspected.
    #[must_use]
    pub fn spawns(&self) -> &[CellCoord] {
        &self.spawns
    }

    /// Seeds the spawn guesses once per game.
    ///
    /// The far corner is always suspected; the two side corners join it when
    /// more than one opponent is playing.
    pub fn seed_spawns(&mut self, player_count: usize) {
        if self.seeded {
            return;
        }
        self.seeded = true;

        let far = MAP_SIZE - 1;
        if player_count > 2 {
            self.push_spawn(CellCoord::new(far, 0));
            self.push_spawn(CellCoord::new(0, far));
        }
        self.push_spawn(CellCoord::new(far, far));
    }

    fn push_spawn(&mut self, cell: CellCoord) {
        if !self.spawns.contains(&cell) {
            self.spawns.push(cell);
        }
    }

    /// Remembers a hostile position unless it is already known.
    pub fn record_sighting(&mut self, cell: CellCoord) {
        if !self.sightings.contains(&cell) {
            self.sightings.push(cell);
        }
    }

    /// Forgets sightings that an owned entity can see and no hostile occupies.
    ///
    /// Returns the number of forgotten positions.
    pub fn prune_sightings(&mut self, snapshot: &WorldSnapshot) -> usize {
        let before = self.sightings.len();
        self.sightings.retain(|&cell| {
            let observed = snapshot.my_entities().any(|entity| {
                let sight = snapshot.props(entity.entity_type).sight_range;
                snapshot.footprint(entity).is_at_range(cell, sight)
            });
            let occupied = snapshot.hostile_entities().any(|enemy| enemy.position == cell);
            !observed || occupied
        });

        let pruned = before - self.sightings.len();
        if pruned > 0 {
            debug!(pruned, remaining = self.sightings.len(), "forgot enemy sightings");
        }
        pruned
    }

    /// Forgets spawn guesses that lie within sight of an owned entity's anchor.
    ///
    /// Returns the number of forgotten positions.
    pub fn prune_spawns(&mut self, snapshot: &WorldSnapshot) -> usize {
        let before = self.spawns.len();
        self.spawns.retain(|&cell| {
            !snapshot.my_entities().any(|entity| {
                let sight = snapshot.props(entity.entity_type).sight_range as f32;
                entity.position.distance(cell) <= sight
            })
        });

        let pruned = before - self.spawns.len();
        if pruned > 0 {
            debug!(pruned, remaining = self.spawns.len(), "discarded enemy spawn guesses");
        }
        pruned
    }

    /// Records every visible hostile entity except turrets.
    pub fn record_visible(&mut self, snapshot: &WorldSnapshot) {
        for enemy in snapshot.hostile_entities() {
            if enemy.entity_type != EntityType::Turret {
                self.record_sighting(enemy.position);
            }
        }
    }

    /// Spawn guess assigned to a unit, spreading units across guesses.
    ///
    /// With a single guess every unit shares it; otherwise the parity of the
    /// identifier picks between the first two.
    #[must_use]
    pub fn spawn_for(&self, id: EntityId) -> Option<CellCoord> {
        match self.spawns.as_slice() {
            [] => None,
            [only] => Some(*only),
            many => many.get((id.get() % 2) as usize).copied(),
        }
    }
}
