//! Per-tick aggregates derived from a snapshot.

use std::collections::BTreeMap;

use outpost_core::{CellCoord, EntityType, WorldSnapshot};

/// Counters the decision rules consult on every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickFrame {
    resources: i32,
    population_used: i32,
    population_max: i32,
    counts: BTreeMap<EntityType, usize>,
    troops: usize,
    resources_on_map: usize,
    base_size: i32,
    troop_ratio: f32,
}

impl TickFrame {
    /// Aggregates the snapshot.
    ///
    /// `troop_ratio` becomes the effective troop share target only once a
    /// melee or ranged base exists; before that every unit slot goes to workers.
    #[must_use]
    pub fn from_snapshot(snapshot: &WorldSnapshot, troop_ratio: f32) -> Self {
        let mut frame = Self {
            resources: snapshot.my_resources(),
            population_used: 0,
            population_max: 0,
            counts: BTreeMap::new(),
            troops: 0,
            resources_on_map: snapshot.resources().count(),
            base_size: 0,
            troop_ratio: 0.0,
        };

        let home = CellCoord::new(0, 0);
        let mut base_reach = 0.0_f32;

        for entity in snapshot.my_entities() {
            let kind = entity.entity_type;
            let properties = snapshot.props(kind);

            *frame.counts.entry(kind).or_insert(0) += 1;
            frame.population_used += properties.population_use;
            frame.population_max += properties.population_provide;

            if properties.is_troop_like() {
                frame.troops += 1;
            }

            if kind.is_production() || kind == EntityType::House {
                base_reach = base_reach.max(home.distance(entity.position));
            }
        }

        frame.base_size = base_reach as i32;
        if frame.has_troop_base() {
            frame.troop_ratio = troop_ratio;
        }

        frame
    }

    /// Resources available for spending.
    #[must_use]
    pub fn resources(&self) -> i32 {
        self.resources
    }

    /// Population consumed by owned units.
    #[must_use]
    pub fn population_used(&self) -> i32 {
        self.population_used
    }

    /// Population capacity provided by owned structures.
    #[must_use]
    pub fn population_max(&self) -> i32 {
        self.population_max
    }

    /// Number of owned entities of the kind.
    #[must_use]
    pub fn count(&self, kind: EntityType) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of owned combat units.
    #[must_use]
    pub fn troops(&self) -> usize {
        self.troops
    }

    /// Number of visible resource entities.
    #[must_use]
    pub fn resources_on_map(&self) -> usize {
        self.resources_on_map
    }

    /// Radius of the home region around the origin.
    #[must_use]
    pub fn base_size(&self) -> i32 {
        self.base_size
    }

    /// Effective share of population that should go to troops.
    #[must_use]
    pub fn troop_ratio(&self) -> f32 {
        self.troop_ratio
    }

    /// Share of the population cap taken by `count` units.
    ///
    /// A zero cap counts as fully used.
    #[must_use]
    pub fn population_share(&self, count: usize) -> f32 {
        if self.population_max <= 0 {
            return 1.0;
        }
        count as f32 / self.population_max as f32
    }

    /// Share of the population cap taken by troops.
    #[must_use]
    pub fn troop_share(&self) -> f32 {
        self.population_share(self.troops)
    }

    /// Share of the population cap taken by workers.
    #[must_use]
    pub fn worker_share(&self) -> f32 {
        self.population_share(self.count(EntityType::Worker))
    }

    /// Reports whether a melee or ranged base exists.
    #[must_use]
    pub fn has_troop_base(&self) -> bool {
        self.count(EntityType::MeleeBase) > 0 || self.count(EntityType::RangedBase) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::scaffolding::SnapshotBuilder;

    #[test]
    fn aggregates_population_and_counts() {
        let mut builder = SnapshotBuilder::new();
        builder.resources(120);
        let _ = builder.mine(EntityType::WorkerBase, 5, 5);
        let _ = builder.mine(EntityType::House, 0, 12);
        let _ = builder.mine(EntityType::Worker, 11, 5);
        let _ = builder.mine(EntityType::Worker, 11, 6);
        let _ = builder.mine(EntityType::RangedUnit, 20, 20);
        let _ = builder.hostile(EntityType::Worker, 70, 70);
        let _ = builder.resource(40, 40);

        let frame = TickFrame::from_snapshot(&builder.build(), 0.4);

        assert_eq!(frame.resources(), 120);
        assert_eq!(frame.population_used(), 3);
        assert_eq!(frame.population_max(), 10);
        assert_eq!(frame.count(EntityType::Worker), 2);
        assert_eq!(frame.count(EntityType::MeleeBase), 0);
        assert_eq!(frame.troops(), 1);
        assert_eq!(frame.resources_on_map(), 1);
        assert_eq!(frame.base_size(), 12);
        assert!(!frame.has_troop_base());
        assert_eq!(frame.troop_ratio(), 0.0);
        assert!((frame.worker_share() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn troop_ratio_applies_once_a_troop_base_exists() {
        let mut builder = SnapshotBuilder::new();
        let _ = builder.mine(EntityType::RangedBase, 10, 10);
        let frame = TickFrame::from_snapshot(&builder.build(), 0.4);
        assert!(frame.has_troop_base());
        assert!((frame.troop_ratio() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_population_cap_reads_as_full() {
        let frame = TickFrame::from_snapshot(&SnapshotBuilder::new().build(), 0.4);
        assert_eq!(frame.population_share(0), 1.0);
    }
}
