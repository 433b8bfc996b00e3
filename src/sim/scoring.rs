//! In-race score and end-of-race reward

use serde::{Deserialize, Serialize};

use crate::catalog::Rewards;
use crate::consts::HIT_PENALTY_TENTHS;
use crate::route::Tier;

/// Running score for a session (both counters only ever grow)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub coins_collected: u32,
    pub hits: u32,
}

/// Coins and experience paid out for a finished race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceReward {
    pub coins: u32,
    pub experience: u32,
}

/// Tenths of the reward kept after `hits` collisions (10 = all of it).
///
/// Floors at zero; ten or more hits forfeit the whole reward.
pub fn penalty_tenths(hits: u32) -> u32 {
    10u32.saturating_sub(hits.saturating_mul(HIT_PENALTY_TENTHS))
}

/// Fraction of the reward kept after `hits` collisions
pub fn hit_penalty(hits: u32) -> f64 {
    f64::from(penalty_tenths(hits)) / 10.0
}

/// Compute the payout for a finished race.
///
/// Multiplier and penalty are both whole tenths, so the product is exact in
/// hundredths and rounds half up.
pub fn compute_reward(base: Rewards, reward_tier: Tier, score: Score) -> RaceReward {
    let hundredths =
        u64::from(reward_tier.reward_multiplier_tenths()) * u64::from(penalty_tenths(score.hits));
    let scale = |amount: u32| {
        let rounded = (u64::from(amount) * hundredths + 50) / 100;
        u32::try_from(rounded).unwrap_or(u32::MAX)
    };

    RaceReward {
        coins: scale(base.coins.saturating_add(score.coins_collected)),
        experience: scale(base.experience),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Rewards = Rewards {
        coins: 50,
        experience: 100,
    };

    #[test]
    fn test_high_tier_with_two_hits() {
        let reward = compute_reward(
            BASE,
            Tier::High,
            Score {
                coins_collected: 30,
                hits: 2,
            },
        );
        assert_eq!(reward, RaceReward { coins: 96, experience: 120 });
    }

    #[test]
    fn test_clean_runs_per_tier() {
        let score = Score::default();
        assert_eq!(
            compute_reward(BASE, Tier::Low, score),
            RaceReward { coins: 50, experience: 100 }
        );
        assert_eq!(
            compute_reward(BASE, Tier::Medium, score),
            RaceReward { coins: 60, experience: 120 }
        );
        assert_eq!(
            compute_reward(BASE, Tier::High, score),
            RaceReward { coins: 75, experience: 150 }
        );
    }

    #[test]
    fn test_exact_halves_round_up() {
        // (50 + 60) * 1.5 * 0.7 = 115.5, 100 * 1.5 * 0.7 = 105
        let reward = compute_reward(
            BASE,
            Tier::High,
            Score {
                coins_collected: 60,
                hits: 3,
            },
        );
        assert_eq!(reward, RaceReward { coins: 116, experience: 105 });

        // 85 * 1.0 * 0.7 = 59.5
        let reward = compute_reward(
            Rewards {
                coins: 85,
                experience: 85,
            },
            Tier::Low,
            Score {
                coins_collected: 0,
                hits: 3,
            },
        );
        assert_eq!(reward, RaceReward { coins: 60, experience: 60 });
    }

    #[test]
    fn test_reward_matches_exact_formula() {
        for base in [50u32, 75, 85, 125, 1000] {
            for collected in (0..=200).step_by(10) {
                for hits in 0..=10 {
                    for (tier, tenths) in [(Tier::Low, 10), (Tier::Medium, 12), (Tier::High, 15)] {
                        let reward = compute_reward(
                            Rewards {
                                coins: base,
                                experience: base,
                            },
                            tier,
                            Score {
                                coins_collected: collected,
                                hits,
                            },
                        );
                        // Exact value in hundredths; the payout is the nearest whole
                        // coin with halves going up
                        let n = u64::from(base + collected) * tenths * u64::from(10 - hits);
                        let paid = u64::from(reward.coins) * 100;
                        assert!(n + 50 >= paid && n < paid + 50, "{n} paid as {paid}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_huge_totals_saturate() {
        let reward = compute_reward(
            Rewards {
                coins: u32::MAX,
                experience: u32::MAX,
            },
            Tier::High,
            Score {
                coins_collected: u32::MAX,
                hits: 0,
            },
        );
        assert_eq!(reward.coins, u32::MAX);
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        assert_eq!(penalty_tenths(4), 6);
        assert_eq!(hit_penalty(0), 1.0);
        assert_eq!(hit_penalty(3), 0.7);
        assert_eq!(hit_penalty(10), 0.0);
        assert_eq!(hit_penalty(25), 0.0);

        for hits in [10, 11, 50, u32::MAX] {
            let reward = compute_reward(
                BASE,
                Tier::High,
                Score {
                    coins_collected: 500,
                    hits,
                },
            );
            assert_eq!(reward, RaceReward::default());
        }
    }
}
