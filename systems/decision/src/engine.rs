//! Per-tick driver turning snapshots into action maps.

use outpost_core::{ActionMap, EntityAction, SnapshotError, WorldSnapshot};
use outpost_world::{observe, Observation, TickFrame, WorldState};
use thiserror::Error;
use tracing::{debug, info};

use crate::roles::role_for;
use crate::{StrategyConfig, TickContext};

/// Failure to answer a snapshot.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The snapshot breaks the engine's assumptions about the game.
    #[error("rejected snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Owns the planner state for one game and answers each tick.
#[derive(Clone, Debug)]
pub struct Engine {
    config: StrategyConfig,
    world: WorldState,
}

impl Engine {
    /// Creates an engine with an empty world.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        let world = WorldState::new(config.build_indent);
        Self { config, world }
    }

    /// Tunables the engine was created with.
    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Planner state after the last processed snapshot.
    #[must_use]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Decides the tick's action for every owned entity.
    ///
    /// Entities without a role, and entities whose rules all decline, receive
    /// an idle entry. Delivering the same tick twice recomputes the answer from
    /// the unchanged world.
    pub fn decide(&mut self, snapshot: &WorldSnapshot) -> Result<ActionMap, EngineError> {
        snapshot.validate()?;

        if observe(&mut self.world, snapshot) == Observation::AlreadyProcessed {
            debug!(tick = snapshot.current_tick, "tick already observed");
        }

        let frame = TickFrame::from_snapshot(snapshot, self.config.troop_ratio);
        info!(
            tick = snapshot.current_tick,
            entities = snapshot.my_entities().count(),
            resources = frame.resources(),
            population = frame.population_used(),
            population_cap = frame.population_max(),
            "deciding tick"
        );

        let ctx = TickContext::new(snapshot, &self.world, &frame, &self.config);
        let mut actions = ActionMap::new();

        for entity in snapshot.my_entities() {
            let decision = role_for(entity.entity_type)
                .and_then(|role| role.decide(&ctx, entity).map(|(rule, action)| (role.name(), rule, action)));

            let action = match decision {
                Some((role, rule, action)) => {
                    debug!(entity = entity.id.get(), role, rule, "selected behaviour");
                    action
                }
                None => EntityAction::idle(),
            };
            let _ = actions.insert(entity.id, action);
        }

        Ok(actions)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}
