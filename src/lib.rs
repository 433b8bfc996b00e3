//! Zenith Racer - a lane-dodging arcade racer across a map of stages
//!
//! Core modules:
//! - `catalog`: Static stage definitions (zones, difficulty, base rewards)
//! - `route`: Route choices offered before each race
//! - `sim`: Deterministic race simulation (phases, spawning, collisions, scoring)
//! - `progress`: Player progress, unlock rules, persistence lifecycle
//! - `persistence`: Storage interface and JSON encoding for saved progress
//! - `platform`: Browser storage backend and keyboard mapping
//! - `game`: Stage selection and race orchestration for the host

pub mod catalog;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod route;
pub mod settings;
pub mod sim;

pub use catalog::{Rewards, STAGES, Stage, Zone};
pub use error::{RaceError, StorageError};
pub use game::{Game, StageAccess};
pub use progress::{PlayerProgress, ProgressStore};
pub use route::{ROUTE_CHOICES, RouteChoice, Tier};
pub use settings::{ControlScheme, Settings};

/// Game configuration constants
pub mod consts {
    /// Number of lanes on the track
    pub const LANES: u8 = 3;
    /// Lane the player starts in (middle)
    pub const START_LANE: u8 = LANES / 2;

    /// Nominal simulation ticks per second (one display frame at 60 Hz)
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Longest sub-step the engine takes when integrating movement
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND;

    /// Race duration in whole seconds
    pub const RACE_DURATION_SECS: u32 = 60;
    /// Countdown starts here and steps down once per second
    pub const COUNTDOWN_FROM: u8 = 3;

    /// Distance from the player to the far edge where entities spawn
    pub const TRACK_LENGTH: f32 = 600.0;
    /// An entity within this distance of the player, in the same lane, collides
    pub const HIT_ZONE_RADIUS: f32 = 40.0;

    /// Collectibles spawn on a fixed interval regardless of route
    pub const COLLECTIBLE_INTERVAL_MS: f32 = 2500.0;
    /// Chance that a spawned collectible is a coin (otherwise a boost)
    pub const COIN_PROBABILITY: f64 = 0.7;
    /// Coins added per coin pickup
    pub const COIN_VALUE: u32 = 10;

    /// Boost multiplies the route speed, capped at MAX_SCROLL_SPEED
    pub const BOOST_FACTOR: f32 = 1.5;
    pub const MAX_SCROLL_SPEED: f32 = 10.0;
    /// Seconds a boost lasts
    pub const BOOST_DURATION_SECS: f32 = 3.0;

    /// Each hit removes this many tenths of the final reward
    pub const HIT_PENALTY_TENTHS: u32 = 1;

    /// Advertised price of the premium unlock (euro cents)
    pub const PREMIUM_PRICE_CENTS: u32 = 100;
}
