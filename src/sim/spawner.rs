//! Obstacle and collectible spawning
//!
//! Both timers measure from the previous spawn, so a long frame delays the
//! next spawn instead of producing a burst.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{
    Collectible, CollectibleKind, Obstacle, ObstacleKind, RaceEvent, RaceSession,
};
use crate::consts::*;

/// Randomness consumed by the spawner.
///
/// Sessions use a seeded [`Pcg32`]; tests can script exact sequences.
pub trait SpawnSource {
    /// Uniform lane in `0..lanes`
    fn lane(&mut self, lanes: u8) -> u8;
    /// Uniform index in `0..len` (decorative variety)
    fn pick(&mut self, len: usize) -> usize;
    /// Uniform value in `[0, 1)`
    fn roll(&mut self) -> f64;
}

impl SpawnSource for Pcg32 {
    fn lane(&mut self, lanes: u8) -> u8 {
        self.random_range(0..lanes)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn roll(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Time since each kind of entity last spawned
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spawner {
    pub since_obstacle_ms: f32,
    pub since_collectible_ms: f32,
}

/// Run both spawn timers for one sub-step of `dt_ms` milliseconds
pub(crate) fn run<R: SpawnSource>(session: &mut RaceSession<R>, dt_ms: f32) {
    let Some(difficulty) = session.difficulty else {
        return;
    };

    session.spawner.since_obstacle_ms += dt_ms;
    if session.spawner.since_obstacle_ms >= difficulty.spawn_interval_ms {
        session.spawner.since_obstacle_ms = 0.0;
        spawn_obstacle(session);
    }

    session.spawner.since_collectible_ms += dt_ms;
    if session.spawner.since_collectible_ms >= COLLECTIBLE_INTERVAL_MS {
        session.spawner.since_collectible_ms = 0.0;
        spawn_collectible(session);
    }
}

/// Spawn one obstacle at the far edge in a random lane
pub fn spawn_obstacle<R: SpawnSource>(session: &mut RaceSession<R>) {
    let lane = session.source.lane(LANES);
    let kind = ObstacleKind::ALL[session.source.pick(ObstacleKind::ALL.len())];
    let id = session.next_entity_id();

    log::debug!("Obstacle {} ({:?}) spawned in lane {}", id, kind, lane);
    session.obstacles.push(Obstacle {
        id,
        lane,
        distance: TRACK_LENGTH,
        kind,
    });
    session.events.push(RaceEvent::ObstacleSpawned { id, lane });
}

/// Spawn one coin or boost at the far edge in a random lane
pub fn spawn_collectible<R: SpawnSource>(session: &mut RaceSession<R>) {
    let lane = session.source.lane(LANES);
    let kind = if session.source.roll() < COIN_PROBABILITY {
        CollectibleKind::Coin
    } else {
        CollectibleKind::Boost
    };
    let id = session.next_entity_id();

    log::debug!("Collectible {} ({:?}) spawned in lane {}", id, kind, lane);
    session.collectibles.push(Collectible {
        id,
        lane,
        distance: TRACK_LENGTH,
        kind,
        collected: false,
    });
    session
        .events
        .push(RaceEvent::CollectibleSpawned { id, lane, kind });
}
