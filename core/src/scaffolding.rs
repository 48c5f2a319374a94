//! Helpers for assembling realistic snapshots in tests.

use crate::{
    AttackProperties, BuildProperties, CellCoord, Entity, EntityId, EntityProperties, EntityType,
    Player, PlayerId, PropertyTable, RepairProperties, WorldSnapshot, MAP_SIZE,
};

/// Property table matching the stock game rules.
#[must_use]
pub fn standard_properties() -> PropertyTable {
    PropertyTable::from_fn(|kind| match kind {
        EntityType::Wall => structure(1, 50, 10, 2, 0),
        EntityType::House => structure(3, 50, 50, 5, 5),
        EntityType::WorkerBase => producer(EntityType::Worker),
        EntityType::MeleeBase => producer(EntityType::MeleeUnit),
        EntityType::RangedBase => producer(EntityType::RangedUnit),
        EntityType::Worker => EntityProperties {
            build: Some(BuildProperties {
                options: vec![
                    EntityType::House,
                    EntityType::WorkerBase,
                    EntityType::MeleeBase,
                    EntityType::RangedBase,
                    EntityType::Wall,
                    EntityType::Turret,
                ],
                init_health: Some(5),
            }),
            attack: Some(AttackProperties {
                attack_range: 1,
                damage: 1,
                collect_resource: true,
            }),
            repair: Some(RepairProperties {
                valid_targets: vec![
                    EntityType::House,
                    EntityType::WorkerBase,
                    EntityType::MeleeBase,
                    EntityType::RangedBase,
                    EntityType::Wall,
                    EntityType::Turret,
                ],
                power: 1,
            }),
            ..unit(10, 10)
        },
        EntityType::MeleeUnit => EntityProperties {
            attack: Some(AttackProperties {
                attack_range: 1,
                damage: 5,
                collect_resource: false,
            }),
            ..unit(50, 20)
        },
        EntityType::RangedUnit => EntityProperties {
            attack: Some(AttackProperties {
                attack_range: 5,
                damage: 5,
                collect_resource: false,
            }),
            ..unit(10, 30)
        },
        EntityType::Resource => EntityProperties {
            resource_per_health: 1,
            ..structure(1, 30, 0, 0, 0)
        },
        EntityType::Turret => EntityProperties {
            attack: Some(AttackProperties {
                attack_range: 5,
                damage: 5,
                collect_resource: false,
            }),
            ..structure(2, 100, 50, 10, 0)
        },
    })
}

fn structure(size: i32, max_health: i32, cost: i32, sight: i32, provide: i32) -> EntityProperties {
    EntityProperties {
        size,
        build_score: max_health,
        destroy_score: max_health,
        can_move: false,
        population_use: 0,
        population_provide: provide,
        max_health,
        initial_cost: cost,
        sight_range: sight,
        resource_per_health: 0,
        build: None,
        attack: None,
        repair: None,
    }
}

fn producer(spawns: EntityType) -> EntityProperties {
    EntityProperties {
        build: Some(BuildProperties {
            options: vec![spawns],
            init_health: None,
        }),
        ..structure(5, 300, 500, 5, 5)
    }
}

fn unit(max_health: i32, cost: i32) -> EntityProperties {
    EntityProperties {
        can_move: true,
        population_use: 1,
        ..structure(1, max_health, cost, 10, 0)
    }
}

/// Incrementally assembles a [`WorldSnapshot`] on the standard 80x80 map.
///
/// The controlled player and a single opponent exist from the start. Entities
/// receive sequential identifiers starting at 1 and full health unless stated
/// otherwise.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    my_id: PlayerId,
    opponent: PlayerId,
    fog_of_war: bool,
    current_tick: u32,
    players: Vec<Player>,
    entities: Vec<Entity>,
    properties: PropertyTable,
    next_id: u32,
}

impl SnapshotBuilder {
    /// Creates a builder controlling player 1 against player 2.
    #[must_use]
    pub fn new() -> Self {
        let my_id = PlayerId::new(1);
        let opponent = PlayerId::new(2);
        Self {
            my_id,
            opponent,
            fog_of_war: false,
            current_tick: 0,
            players: vec![player(my_id), player(opponent)],
            entities: Vec::new(),
            properties: standard_properties(),
            next_id: 1,
        }
    }

    /// Identifier of the controlled player.
    #[must_use]
    pub fn my_id(&self) -> PlayerId {
        self.my_id
    }

    /// Identifier of the default opponent.
    #[must_use]
    pub fn opponent(&self) -> PlayerId {
        self.opponent
    }

    /// Enables or disables fog of war.
    pub fn fog_of_war(&mut self, enabled: bool) {
        self.fog_of_war = enabled;
    }

    /// Sets the tick index.
    pub fn tick(&mut self, tick: u32) {
        self.current_tick = tick;
    }

    /// Sets the resources held by the controlled player.
    pub fn resources(&mut self, amount: i32) {
        let my_id = self.my_id;
        if let Some(me) = self.players.iter_mut().find(|player| player.id == my_id) {
            me.resource = amount;
        }
    }

    /// Adds another opponent to the player roster.
    pub fn extra_player(&mut self, id: u32) {
        self.players.push(player(PlayerId::new(id)));
    }

    /// Adds a full-health entity owned by the controlled player.
    pub fn mine(&mut self, kind: EntityType, x: i32, y: i32) -> EntityId {
        let owner = self.my_id;
        self.add(Some(owner), kind, CellCoord::new(x, y), None)
    }

    /// Adds a full-health entity owned by the default opponent.
    pub fn hostile(&mut self, kind: EntityType, x: i32, y: i32) -> EntityId {
        let owner = self.opponent;
        self.add(Some(owner), kind, CellCoord::new(x, y), None)
    }

    /// Adds a neutral resource tile.
    pub fn resource(&mut self, x: i32, y: i32) -> EntityId {
        self.add(None, EntityType::Resource, CellCoord::new(x, y), None)
    }

    /// Adds an entity with explicit owner and health.
    pub fn add(
        &mut self,
        owner: Option<PlayerId>,
        kind: EntityType,
        position: CellCoord,
        health: Option<i32>,
    ) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        let health = health.unwrap_or(self.properties[kind].max_health);
        self.entities.push(Entity {
            id,
            player_id: owner,
            entity_type: kind,
            position,
            health,
        });
        id
    }

    /// Moves an already added entity.
    pub fn relocate(&mut self, id: EntityId, x: i32, y: i32) {
        if let Some(entity) = self.entities.iter_mut().find(|entity| entity.id == id) {
            entity.position = CellCoord::new(x, y);
        }
    }

    /// Removes an already added entity.
    pub fn remove(&mut self, id: EntityId) {
        self.entities.retain(|entity| entity.id != id);
    }

    /// Produces the snapshot.
    #[must_use]
    pub fn build(&self) -> WorldSnapshot {
        WorldSnapshot {
            my_id: self.my_id,
            map_size: MAP_SIZE,
            fog_of_war: self.fog_of_war,
            current_tick: self.current_tick,
            players: self.players.clone(),
            entities: self.entities.clone(),
            properties: self.properties.clone(),
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn player(id: PlayerId) -> Player {
    Player {
        id,
        score: 0,
        resource: 0,
    }
}
