//! Tunables of the rule engine.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use outpost_system_placement::PlacementPolicy;
use outpost_system_targeting::EngagementRules;
use outpost_world::BuildIndent;

/// Every tunable consulted by the role rules.
///
/// Missing keys in a TOML file keep their default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Margins kept clear around own structures on the build grid.
    pub build_indent: BuildIndent,
    /// Closer workers tolerated before a worker skips a repair or build job.
    pub repair_crew_size: usize,
    /// Reach of a worker fighting back against enemy workers and bases.
    pub worker_skirmish_range: i32,
    /// Reach of the threat check that makes workers flee, and of the escort
    /// check that keeps them from skirmishing.
    pub worker_flee_range: i32,
    /// Reach of a worker looking for damaged structures.
    pub worker_repair_range: i32,
    /// Resources needed before a lone worker starts repairing.
    pub repair_min_resources: i32,
    /// Reach of a troop hunting enemy workers.
    pub troop_hunt_worker_range: i32,
    /// Reach of a ranged unit hunting enemy bases.
    pub troop_hunt_base_range: i32,
    /// Enemy troops within this radius protect their workers from hunters.
    pub troop_guard_range: i32,
    /// Reach of the retreat heuristic.
    pub engagement_range: i32,
    /// Weights and hold distances of the retreat heuristic.
    pub engagement: EngagementRules,
    /// Share of the population cap reserved for troops once a troop base exists.
    pub troop_ratio: f32,
    /// Site search used for houses.
    pub house_placement: PlacementPolicy,
    /// Site search used for ranged bases.
    pub ranged_base_placement: PlacementPolicy,
    /// Site search used for worker bases.
    pub worker_base_placement: PlacementPolicy,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            build_indent: BuildIndent::default(),
            repair_crew_size: 5,
            worker_skirmish_range: 4,
            worker_flee_range: 7,
            worker_repair_range: 20,
            repair_min_resources: 50,
            troop_hunt_worker_range: 5,
            troop_hunt_base_range: 5,
            troop_guard_range: 10,
            engagement_range: 7,
            engagement: EngagementRules::default(),
            troop_ratio: 0.4,
            house_placement: PlacementPolicy::Corner,
            ranged_base_placement: PlacementPolicy::Corner,
            worker_base_placement: PlacementPolicy::Corner,
        }
    }
}

/// Failure to load a [`StrategyConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read strategy config {path}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The contents are not valid TOML for the config.
    #[error("failed to parse strategy config")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its accepted range.
    #[error("invalid strategy config value for `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// Accepted range.
        reason: &'static str,
    },
}

impl StrategyConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects values the rules cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.troop_ratio) {
            return Err(ConfigError::Invalid {
                field: "troop_ratio",
                reason: "must lie in [0, 1)",
            });
        }

        let ranges = [
            ("build_indent.open", self.build_indent.open),
            ("build_indent.fogged", self.build_indent.fogged),
            ("worker_skirmish_range", self.worker_skirmish_range),
            ("worker_flee_range", self.worker_flee_range),
            ("worker_repair_range", self.worker_repair_range),
            ("repair_min_resources", self.repair_min_resources),
            ("troop_hunt_worker_range", self.troop_hunt_worker_range),
            ("troop_hunt_base_range", self.troop_hunt_base_range),
            ("troop_guard_range", self.troop_guard_range),
            ("engagement_range", self.engagement_range),
            ("engagement.hold.ranged_vs_ranged", self.engagement.hold.ranged_vs_ranged),
            ("engagement.hold.ranged_vs_melee", self.engagement.hold.ranged_vs_melee),
            ("engagement.hold.melee_vs_ranged", self.engagement.hold.melee_vs_ranged),
            ("engagement.hold.melee_vs_melee", self.engagement.hold.melee_vs_melee),
        ];
        if let Some(&(field, _)) = ranges.iter().find(|(_, value)| *value < 0) {
            return Err(ConfigError::Invalid {
                field,
                reason: "must not be negative",
            });
        }

        Ok(())
    }
}
