//! Idle/demo mode steering
//!
//! Picks a lane change for the player: get out of the way of the nearest
//! obstacle bearing down on the current lane, otherwise drift toward the
//! nearest coin. Pure function of the session, so it stays deterministic.

use super::state::{CollectibleKind, LaneChange, RaceSession};
use crate::consts::*;

/// Obstacles closer than this trigger evasive steering
const LOOKAHEAD: f32 = 220.0;

/// Lane change the autopilot would make this frame, if any
pub fn steer<R>(session: &RaceSession<R>) -> Option<LaneChange> {
    let lane = session.player_lane();

    if lane_threatened(session, lane) {
        // Prefer a clear neighbour; stay put if both sides are blocked
        let left = lane.checked_sub(1).filter(|&l| !lane_threatened(session, l));
        let right = Some(lane + 1)
            .filter(|&l| l < LANES)
            .filter(|&l| !lane_threatened(session, l));
        return match (left, right) {
            (Some(_), _) => Some(LaneChange::Left),
            (None, Some(_)) => Some(LaneChange::Right),
            (None, None) => None,
        };
    }

    // Chase the closest coin still ahead of us
    let target = session
        .collectibles()
        .iter()
        .filter(|c| c.kind == CollectibleKind::Coin && c.distance >= 0.0)
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let next_lane = if target.lane < lane {
        lane - 1
    } else if target.lane > lane {
        lane + 1
    } else {
        return None;
    };
    if lane_threatened(session, next_lane) {
        return None;
    }
    if next_lane < lane {
        Some(LaneChange::Left)
    } else {
        Some(LaneChange::Right)
    }
}

fn lane_threatened<R>(session: &RaceSession<R>, lane: u8) -> bool {
    session
        .obstacles()
        .iter()
        .any(|o| o.lane == lane && o.distance >= -HIT_ZONE_RADIUS && o.distance <= LOOKAHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Collectible, Obstacle, ObstacleKind, RacePhase};
    use crate::sim::tick::advance;

    fn racing() -> RaceSession {
        let mut session = RaceSession::new(1, 3).unwrap();
        session.begin().unwrap();
        session.choose_route("safe").unwrap();
        session.phase = RacePhase::Racing;
        session
    }

    fn obstacle(id: u32, lane: u8, distance: f32) -> Obstacle {
        Obstacle {
            id,
            lane,
            distance,
            kind: ObstacleKind::Barrier,
        }
    }

    #[test]
    fn test_dodges_obstacle_in_lane() {
        let mut session = racing();
        session.obstacles.push(obstacle(1, 1, 100.0));
        assert_eq!(steer(&session), Some(LaneChange::Left));

        session.obstacles.push(obstacle(2, 0, 150.0));
        assert_eq!(steer(&session), Some(LaneChange::Right));

        session.obstacles.push(obstacle(3, 2, 120.0));
        assert_eq!(steer(&session), None);
    }

    #[test]
    fn test_ignores_far_obstacles() {
        let mut session = racing();
        session.obstacles.push(obstacle(1, 1, 500.0));
        assert_eq!(steer(&session), None);
    }

    #[test]
    fn test_chases_coins() {
        let mut session = racing();
        session.collectibles.push(Collectible {
            id: 9,
            lane: 2,
            distance: 300.0,
            kind: CollectibleKind::Coin,
            collected: false,
        });
        assert_eq!(steer(&session), Some(LaneChange::Right));
    }

    #[test]
    fn test_autopilot_avoids_lone_obstacle() {
        let mut session = racing();
        session.obstacles.push(obstacle(1, 1, 300.0));
        for _ in 0..120 {
            if let Some(change) = steer(&session) {
                session.change_lane(change);
            }
            advance(&mut session, crate::consts::SIM_DT);
        }
        assert_eq!(session.score().hits, 0);
    }
}
