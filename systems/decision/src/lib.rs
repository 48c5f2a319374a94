#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rule engine choosing one action per owned entity each tick.
//!
//! [`Engine`] folds the snapshot into its [`outpost_world::WorldState`], then
//! hands every owned entity to the role registered for its kind. Roles are
//! ordered rule lists evaluated against a shared, read-only [`TickContext`].

mod config;
mod context;
mod engine;
pub mod roles;

pub use config::{ConfigError, StrategyConfig};
pub use context::TickContext;
pub use engine::{Engine, EngineError};
