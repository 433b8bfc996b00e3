//! Deterministic race simulation
//!
//! All race gameplay lives here. This module must stay pure:
//! - Time only enters through `advance(dt)`
//! - Randomness only through the session's `SpawnSource`
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::steer;
pub use collision::{at_player, passed_player};
pub use difficulty::Difficulty;
pub use scoring::{RaceReward, Score, compute_reward, hit_penalty, penalty_tenths};
pub use spawner::{SpawnSource, Spawner};
pub use state::{
    Collectible, CollectibleKind, LaneChange, Obstacle, ObstacleKind, RaceEvent, RaceOutcome,
    RacePhase, RaceSession, RouteSelection,
};
pub use tick::advance;
