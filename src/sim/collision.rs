//! Lane-based collision detection and response

use super::state::{CollectibleKind, RaceEvent, RaceSession};
use crate::consts::*;

/// True when something in `lane` at `distance` overlaps the player
#[inline]
pub fn at_player(lane: u8, distance: f32, player_lane: u8) -> bool {
    lane == player_lane && distance.abs() <= HIT_ZONE_RADIUS
}

/// True once an entity has scrolled past the player and can no longer collide
#[inline]
pub fn passed_player(distance: f32) -> bool {
    distance < -HIT_ZONE_RADIUS
}

/// Resolve collisions for the current positions.
///
/// Colliding entities are removed in the same pass, so each one scores once.
pub(crate) fn resolve<R>(session: &mut RaceSession<R>) {
    let player_lane = session.player_lane;

    // Obstacles: one hit each
    let mut hit_ids = Vec::new();
    session.obstacles.retain(|o| {
        if at_player(o.lane, o.distance, player_lane) {
            hit_ids.push(o.id);
            false
        } else {
            true
        }
    });
    for id in hit_ids {
        session.score.hits += 1;
        log::debug!("Obstacle {} hit (total hits {})", id, session.score.hits);
        session.events.push(RaceEvent::ObstacleHit { id });
    }

    // Collectibles: mark, apply, then drop everything consumed
    let mut picked = Vec::new();
    for c in session.collectibles.iter_mut() {
        if !c.collected && at_player(c.lane, c.distance, player_lane) {
            c.collected = true;
            picked.push((c.id, c.kind));
        }
    }
    session.collectibles.retain(|c| !c.collected);

    for (id, kind) in picked {
        match kind {
            CollectibleKind::Coin => {
                session.score.coins_collected += COIN_VALUE;
                session.events.push(RaceEvent::CoinCollected {
                    id,
                    value: COIN_VALUE,
                });
            }
            CollectibleKind::Boost => {
                if let Some(difficulty) = session.difficulty {
                    session.speed =
                        (difficulty.scroll_speed * BOOST_FACTOR).min(MAX_SCROLL_SPEED);
                }
                // A second boost refreshes the timer
                session.boost_remaining = BOOST_DURATION_SECS;
                log::debug!("Boost {} collected, speed {}", id, session.speed);
                session.events.push(RaceEvent::BoostCollected { id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_player() {
        assert!(at_player(1, 0.0, 1));
        assert!(at_player(1, HIT_ZONE_RADIUS, 1));
        assert!(at_player(1, -HIT_ZONE_RADIUS, 1));
        assert!(!at_player(1, HIT_ZONE_RADIUS + 0.1, 1));
        assert!(!at_player(0, 0.0, 1));
    }

    #[test]
    fn test_passed_player() {
        assert!(!passed_player(0.0));
        assert!(!passed_player(-HIT_ZONE_RADIUS));
        assert!(passed_player(-HIT_ZONE_RADIUS - 0.5));
    }
}
