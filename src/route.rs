//! Route choices
//!
//! Picked once per race before the countdown. The risk tier sets the race
//! difficulty; the reward tier sets the payout multiplier.

use serde::{Deserialize, Serialize};

use crate::error::RaceError;

/// Low / medium / high tier used for both risk and reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }

    /// Payout multiplier in tenths (1.0 / 1.2 / 1.5) when used as a reward tier
    pub fn reward_multiplier_tenths(&self) -> u32 {
        match self {
            Tier::Low => 10,
            Tier::Medium => 12,
            Tier::High => 15,
        }
    }
}

/// A route the player can take through a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteChoice {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub risk: Tier,
    pub reward: Tier,
}

/// The three routes offered before every race
pub static ROUTE_CHOICES: [RouteChoice; 3] = [
    RouteChoice {
        id: "safe",
        name: "Scenic Route",
        description: "A longer but safer path with beautiful views.",
        risk: Tier::Low,
        reward: Tier::Low,
    },
    RouteChoice {
        id: "balanced",
        name: "Main Road",
        description: "The standard path. Moderate challenges ahead.",
        risk: Tier::Medium,
        reward: Tier::Medium,
    },
    RouteChoice {
        id: "risky",
        name: "Shortcut",
        description: "Dangerous but fast. High rewards for the brave!",
        risk: Tier::High,
        reward: Tier::High,
    },
];

impl RouteChoice {
    /// Resolve a route id, failing on anything not in [`ROUTE_CHOICES`]
    pub fn from_id(id: &str) -> Result<&'static RouteChoice, RaceError> {
        ROUTE_CHOICES
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| RaceError::UnknownRoute(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_lookup() {
        assert_eq!(RouteChoice::from_id("risky").unwrap().reward, Tier::High);
        assert_eq!(RouteChoice::from_id("safe").unwrap().risk, Tier::Low);
        assert_eq!(
            RouteChoice::from_id("teleport"),
            Err(RaceError::UnknownRoute("teleport".to_string()))
        );
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(Tier::Low.reward_multiplier_tenths(), 10);
        assert_eq!(Tier::Medium.reward_multiplier_tenths(), 12);
        assert_eq!(Tier::High.reward_multiplier_tenths(), 15);
        assert_eq!(Tier::High.as_str(), "high");
    }
}
