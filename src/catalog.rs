//! Stage catalog
//!
//! Twenty stages in play order. Stage `n + 1` opens once stage `n` is
//! completed; the last stage additionally requires the premium unlock.

use serde::{Deserialize, Serialize};

use crate::route::Tier;
use crate::sim::scoring::{Score, compute_reward};

/// Thematic zone a stage belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Ocean,
    Forest,
    Volcanic,
    Mystical,
    Ice,
    Desert,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Ocean => "ocean",
            Zone::Forest => "forest",
            Zone::Volcanic => "volcanic",
            Zone::Mystical => "mystical",
            Zone::Ice => "ice",
            Zone::Desert => "desert",
        }
    }

    /// Map/card icon
    pub fn icon(&self) -> &'static str {
        match self {
            Zone::Ocean => "🌊",
            Zone::Forest => "🌳",
            Zone::Volcanic => "🌋",
            Zone::Mystical => "✨",
            Zone::Ice => "❄️",
            Zone::Desert => "🏜️",
        }
    }
}

/// Base rewards for finishing a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub coins: u32,
    pub experience: u32,
}

/// A playable stage (immutable catalog entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub zone: Zone,
    /// 1 (easiest) to 5
    pub difficulty: u8,
    pub requires_payment: bool,
    pub rewards: Rewards,
}

impl Stage {
    /// Best possible rewards: highest reward tier and no hits.
    ///
    /// In-race coin pickups come on top of this.
    pub fn max_rewards(&self) -> Rewards {
        let best = compute_reward(self.rewards, Tier::High, Score::default());
        Rewards {
            coins: best.coins,
            experience: best.experience,
        }
    }
}

const fn stage(
    id: u32,
    name: &'static str,
    zone: Zone,
    description: &'static str,
    difficulty: u8,
    coins: u32,
    experience: u32,
) -> Stage {
    Stage {
        id,
        name,
        description,
        zone,
        difficulty,
        requires_payment: false,
        rewards: Rewards { coins, experience },
    }
}

/// All stages, ordered by id
pub static STAGES: [Stage; 20] = [
    stage(1, "Coral Shores", Zone::Ocean,
        "Begin your journey on the crystalline beaches where waves dance with light.", 1, 50, 100),
    stage(2, "Tide Pools", Zone::Ocean,
        "Navigate through mystical tide pools filled with bioluminescent creatures.", 1, 75, 150),
    stage(3, "Kelp Highway", Zone::Ocean,
        "Race through towering kelp forests with swift currents.", 2, 100, 200),
    stage(4, "Emerald Canopy", Zone::Forest,
        "Enter the ancient forest where trees touch the clouds.", 2, 120, 250),
    stage(5, "Bioluminescent Grove", Zone::Forest,
        "A magical forest that glows with ethereal light.", 2, 150, 300),
    stage(6, "Root Labyrinth", Zone::Forest,
        "Navigate the massive root systems of the World Tree.", 3, 175, 350),
    stage(7, "Ember Fields", Zone::Volcanic,
        "Cross the smoldering plains where fire meets earth.", 3, 200, 400),
    stage(8, "Lava Rapids", Zone::Volcanic,
        "Race alongside rivers of molten rock.", 3, 225, 450),
    stage(9, "Obsidian Peaks", Zone::Volcanic,
        "Climb the glass mountains under ash-filled skies.", 4, 250, 500),
    stage(10, "Spirit Falls", Zone::Mystical,
        "Discover the waterfalls where spirits gather.", 3, 275, 550),
    stage(11, "Crystal Caverns", Zone::Mystical,
        "Explore caves filled with singing crystals.", 4, 300, 600),
    stage(12, "Floating Islands", Zone::Mystical,
        "Race across islands that drift in the sky.", 4, 325, 650),
    stage(13, "Frost Valley", Zone::Ice,
        "Enter the frozen lands where ice sculptures come alive.", 4, 350, 700),
    stage(14, "Aurora Path", Zone::Ice,
        "Follow the dancing lights across frozen lakes.", 4, 375, 750),
    stage(15, "Glacier Run", Zone::Ice,
        "Navigate treacherous ice formations at high speed.", 5, 400, 800),
    stage(16, "Golden Dunes", Zone::Desert,
        "Race across endless waves of golden sand.", 4, 425, 850),
    stage(17, "Oasis Temple", Zone::Desert,
        "Discover the hidden temple in the heart of the desert.", 4, 450, 900),
    stage(18, "Sandstorm Valley", Zone::Desert,
        "Battle through fierce sandstorms to reach the end.", 5, 475, 950),
    stage(19, "Ancient Ruins", Zone::Mystical,
        "The final trial before the ultimate challenge.", 5, 500, 1000),
    Stage {
        requires_payment: true,
        ..stage(20, "The Nexus", Zone::Mystical,
            "Where all paths converge. The ultimate destination awaits.", 5, 1000, 2000)
    },
];

/// Look up a stage by id
pub fn stage_by_id(id: u32) -> Option<&'static Stage> {
    // Ids are contiguous from 1
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    STAGES.get(index).filter(|s| s.id == id)
}

/// The first stage, always unlocked
pub fn first_stage() -> &'static Stage {
    &STAGES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous() {
        for (i, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.id as usize, i + 1);
            assert!((1..=5).contains(&stage.difficulty));
        }
    }

    #[test]
    fn test_only_last_stage_requires_payment() {
        let paid: Vec<u32> = STAGES
            .iter()
            .filter(|s| s.requires_payment)
            .map(|s| s.id)
            .collect();
        assert_eq!(paid, vec![20]);
    }

    #[test]
    fn test_stage_lookup() {
        assert_eq!(stage_by_id(1).map(|s| s.name), Some("Coral Shores"));
        assert_eq!(stage_by_id(20).map(|s| s.zone), Some(Zone::Mystical));
        assert!(stage_by_id(0).is_none());
        assert!(stage_by_id(21).is_none());
    }

    #[test]
    fn test_max_rewards() {
        let max = stage_by_id(1).unwrap().max_rewards();
        assert_eq!(max, Rewards { coins: 75, experience: 150 });
    }

    #[test]
    fn test_zone_names_match_serde() {
        for zone in [Zone::Ocean, Zone::Forest, Zone::Volcanic, Zone::Mystical, Zone::Ice, Zone::Desert] {
            let json = serde_json::to_string(&zone).unwrap();
            assert_eq!(json, format!("\"{}\"", zone.as_str()));
        }
    }

    #[test]
    fn test_max_rewards_round_half_up() {
        // 25 * 1.5 = 37.5
        let stage = Stage {
            rewards: Rewards { coins: 25, experience: 1 },
            ..*first_stage()
        };
        assert_eq!(stage.max_rewards(), Rewards { coins: 38, experience: 2 });
    }
}
