//! Route risk to race difficulty

use serde::{Deserialize, Serialize};

use crate::route::Tier;

/// Spawn pacing and scroll speed for one race
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Milliseconds between obstacle spawns
    pub spawn_interval_ms: f32,
    /// Track units per nominal tick
    pub scroll_speed: f32,
}

impl Difficulty {
    pub fn for_risk(risk: Tier) -> Self {
        let (spawn_interval_ms, scroll_speed) = match risk {
            Tier::Low => (1800.0, 4.0),
            Tier::Medium => (1200.0, 5.0),
            Tier::High => (800.0, 7.0),
        };
        Self {
            spawn_interval_ms,
            scroll_speed,
        }
    }
}
