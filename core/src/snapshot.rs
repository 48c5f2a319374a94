//! World snapshot delivered by the simulation once per tick.

use std::{collections::HashMap, ops::Index};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, EntityId, Footprint, PlayerId, MAP_SIZE};

/// Fixed enumeration of entity kinds known to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Passive barrier structure.
    Wall,
    /// Structure that raises the population cap.
    House,
    /// Production structure spawning workers.
    WorkerBase,
    /// Unit able to gather, build and repair.
    Worker,
    /// Production structure spawning melee units.
    MeleeBase,
    /// Short-range combat unit.
    MeleeUnit,
    /// Production structure spawning ranged units.
    RangedBase,
    /// Long-range combat unit.
    RangedUnit,
    /// Neutral harvestable tile.
    Resource,
    /// Static defensive structure.
    Turret,
}

impl EntityType {
    /// Every entity kind, in table order.
    pub const ALL: [EntityType; 10] = [
        Self::Wall,
        Self::House,
        Self::WorkerBase,
        Self::Worker,
        Self::MeleeBase,
        Self::MeleeUnit,
        Self::RangedBase,
        Self::RangedUnit,
        Self::Resource,
        Self::Turret,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::House => 1,
            Self::WorkerBase => 2,
            Self::Worker => 3,
            Self::MeleeBase => 4,
            Self::MeleeUnit => 5,
            Self::RangedBase => 6,
            Self::RangedUnit => 7,
            Self::Resource => 8,
            Self::Turret => 9,
        }
    }

    /// Structures that spawn units.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::WorkerBase | Self::MeleeBase | Self::RangedBase)
    }

    /// Structures that get a movement margin on the build grid and may be repaired.
    #[must_use]
    pub const fn is_core_structure(self) -> bool {
        self.is_production() || matches!(self, Self::House | Self::Turret)
    }

    /// Mobile combat units.
    #[must_use]
    pub const fn is_troop(self) -> bool {
        matches!(self, Self::MeleeUnit | Self::RangedUnit)
    }

    /// Every mobile unit, workers included.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        self.is_troop() || matches!(self, Self::Worker)
    }
}

/// Attack capability of an entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProperties {
    /// Manhattan reach of an attack, measured from any footprint tile.
    pub attack_range: i32,
    /// Damage dealt per tick.
    pub damage: i32,
    /// Whether attacking a resource harvests it.
    pub collect_resource: bool,
}

/// Construction capability of an entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProperties {
    /// Kinds this entity may construct or spawn.
    pub options: Vec<EntityType>,
    /// Health a freshly started structure begins with, if not full.
    #[serde(default)]
    pub init_health: Option<i32>,
}

/// Repair capability of an entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairProperties {
    /// Kinds this entity may repair.
    pub valid_targets: Vec<EntityType>,
    /// Health restored per tick.
    pub power: i32,
}

/// Static per-kind properties supplied once per game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProperties {
    /// Side length of the square footprint.
    pub size: i32,
    /// Score awarded for building one.
    pub build_score: i32,
    /// Score awarded for destroying one.
    pub destroy_score: i32,
    /// Whether the entity can move.
    pub can_move: bool,
    /// Population consumed.
    pub population_use: i32,
    /// Population capacity provided.
    pub population_provide: i32,
    /// Health when fully built or repaired.
    pub max_health: i32,
    /// Resource cost of the first instance.
    pub initial_cost: i32,
    /// Manhattan vision radius, measured from any footprint tile.
    pub sight_range: i32,
    /// Resource yield per point of health removed.
    pub resource_per_health: i32,
    /// Construction capability, if any.
    #[serde(default)]
    pub build: Option<BuildProperties>,
    /// Attack capability, if any.
    #[serde(default)]
    pub attack: Option<AttackProperties>,
    /// Repair capability, if any.
    #[serde(default)]
    pub repair: Option<RepairProperties>,
}

impl EntityProperties {
    /// Attack range, or `None` for kinds that cannot attack.
    #[must_use]
    pub fn attack_range(&self) -> Option<i32> {
        self.attack.as_ref().map(|attack| attack.attack_range)
    }

    /// Movable attackers that neither build nor repair.
    #[must_use]
    pub fn is_troop_like(&self) -> bool {
        self.can_move && self.attack.is_some() && self.build.is_none() && self.repair.is_none()
    }
}

/// Complete property table, indexable by [`EntityType`].
///
/// A table can only be built when every kind has an entry, so lookups never
/// fail once a snapshot has been decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<EntityType, EntityProperties>",
    into = "HashMap<EntityType, EntityProperties>"
)]
pub struct PropertyTable {
    entries: Vec<EntityProperties>,
}

impl PropertyTable {
    /// Builds a table by asking `properties` for every kind.
    pub fn from_fn(mut properties: impl FnMut(EntityType) -> EntityProperties) -> Self {
        Self {
            entries: EntityType::ALL.iter().map(|&kind| properties(kind)).collect(),
        }
    }

    /// Properties of the provided kind.
    #[must_use]
    pub fn get(&self, kind: EntityType) -> &EntityProperties {
        &self.entries[kind.index()]
    }
}

impl Index<EntityType> for PropertyTable {
    type Output = EntityProperties;

    fn index(&self, kind: EntityType) -> &Self::Output {
        self.get(kind)
    }
}

impl TryFrom<HashMap<EntityType, EntityProperties>> for PropertyTable {
    type Error = SnapshotError;

    fn try_from(mut map: HashMap<EntityType, EntityProperties>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(EntityType::ALL.len());
        for kind in EntityType::ALL {
            let properties = map
                .remove(&kind)
                .ok_or(SnapshotError::MissingProperties(kind))?;
            entries.push(properties);
        }
        Ok(Self { entries })
    }
}

impl From<PropertyTable> for HashMap<EntityType, EntityProperties> {
    fn from(table: PropertyTable) -> Self {
        EntityType::ALL.into_iter().zip(table.entries).collect()
    }
}

/// Single entity as observed this tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier that stays stable for the entity's lifetime.
    pub id: EntityId,
    /// Owning player; `None` for neutral entities such as resources.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    /// Kind of the entity.
    pub entity_type: EntityType,
    /// Top-left tile of the footprint.
    pub position: CellCoord,
    /// Current health.
    pub health: i32,
}

/// Per-player counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Identifier of the player.
    pub id: PlayerId,
    /// Current score.
    pub score: i32,
    /// Resources available for spending.
    pub resource: i32,
}

/// Everything the engine may see on one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Player the engine is controlling.
    pub my_id: PlayerId,
    /// Side length of the map.
    pub map_size: i32,
    /// Whether only tiles within own sight are reported.
    pub fog_of_war: bool,
    /// Index of the current tick.
    pub current_tick: u32,
    /// Counters of every player.
    pub players: Vec<Player>,
    /// Every visible entity, in simulation order.
    pub entities: Vec<Entity>,
    /// Static property table.
    pub properties: PropertyTable,
}

impl WorldSnapshot {
    /// Checks the invariants every system relies on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.map_size != MAP_SIZE {
            return Err(SnapshotError::UnsupportedMapSize {
                expected: MAP_SIZE,
                found: self.map_size,
            });
        }

        if self.me().is_none() {
            return Err(SnapshotError::UnknownPlayer(self.my_id));
        }

        for entity in &self.entities {
            let footprint = self.footprint(entity);
            let far = footprint.origin().offset(footprint.size() - 1, footprint.size() - 1);
            if !footprint.origin().in_bounds() || !far.in_bounds() {
                return Err(SnapshotError::OutOfBounds {
                    entity: entity.id,
                    position: entity.position,
                });
            }
        }

        Ok(())
    }

    /// Properties of the provided kind.
    #[must_use]
    pub fn props(&self, kind: EntityType) -> &EntityProperties {
        &self.properties[kind]
    }

    /// Footprint occupied by the entity.
    #[must_use]
    pub fn footprint(&self, entity: &Entity) -> Footprint {
        Footprint::new(entity.position, self.props(entity.entity_type).size)
    }

    /// Counters of the controlled player.
    #[must_use]
    pub fn me(&self) -> Option<&Player> {
        self.players.iter().find(|player| player.id == self.my_id)
    }

    /// Resources available to the controlled player.
    #[must_use]
    pub fn my_resources(&self) -> i32 {
        self.me().map_or(0, |player| player.resource)
    }

    /// Reports whether the controlled player owns the entity.
    #[must_use]
    pub fn is_mine(&self, entity: &Entity) -> bool {
        entity.player_id == Some(self.my_id)
    }

    /// Reports whether another player owns the entity.
    #[must_use]
    pub fn is_hostile(&self, entity: &Entity) -> bool {
        matches!(entity.player_id, Some(owner) if owner != self.my_id)
    }

    /// Entities owned by the controlled player, in snapshot order.
    pub fn my_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| self.is_mine(entity))
    }

    /// Entities owned by other players, in snapshot order.
    pub fn hostile_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| self.is_hostile(entity))
    }

    /// Visible resource entities.
    pub fn resources(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.entity_type == EntityType::Resource)
    }
}

/// Snapshot contents that contradict the fixed engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The map does not match the grid size the engine is built for.
    #[error("unsupported map size {found}, expected {expected}")]
    UnsupportedMapSize {
        /// Supported side length.
        expected: i32,
        /// Side length reported by the snapshot.
        found: i32,
    },
    /// An entity footprint extends beyond the map.
    #[error("entity {entity:?} at {position:?} extends beyond the map")]
    OutOfBounds {
        /// Offending entity.
        entity: EntityId,
        /// Anchor reported for it.
        position: CellCoord,
    },
    /// The property table lacks an entry for an entity kind.
    #[error("property table has no entry for {0:?}")]
    MissingProperties(EntityType),
    /// The controlled player is absent from the player list.
    #[error("player {0:?} is not part of the snapshot")]
    UnknownPlayer(PlayerId),
}
