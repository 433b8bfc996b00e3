//! Race session state and core simulation types
//!
//! Everything a single race attempt owns lives here. A session is created for
//! one stage, driven by [`super::tick::advance`] and player commands, and
//! consumed when the host leaves the result screen or aborts.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::scoring::{RaceReward, Score};
use super::spawner::{SpawnSource, Spawner};
use crate::catalog::{Stage, stage_by_id};
use crate::consts::*;
use crate::error::RaceError;
use crate::route::RouteChoice;

/// Current phase of a race session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Stage intro, waiting for the player to start
    Intro,
    /// Waiting for a route choice
    Choice,
    /// 3, 2, 1, go
    Countdown,
    /// Active racing
    Racing,
    /// Race over, reward computed
    Result,
}

/// Direction of a single lane change input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneChange {
    Left,
    Right,
}

/// Obstacle look (gameplay identical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Barrier,
    Rock,
    OilSlick,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] =
        [ObstacleKind::Barrier, ObstacleKind::Rock, ObstacleKind::OilSlick];
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: u8,
    /// Distance ahead of the player (negative once passed)
    pub distance: f32,
    pub kind: ObstacleKind,
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Boost,
}

/// A pickup scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub lane: u8,
    pub distance: f32,
    pub kind: CollectibleKind,
    pub collected: bool,
}

/// Something the host may want to show or play a sound for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Countdown number shown (3, 2, 1)
    Countdown(u8),
    /// Countdown finished, racing starts
    Go,
    ObstacleSpawned { id: u32, lane: u8 },
    CollectibleSpawned { id: u32, lane: u8, kind: CollectibleKind },
    ObstacleHit { id: u32 },
    CoinCollected { id: u32, value: u32 },
    BoostCollected { id: u32 },
    BoostEnded,
    /// A whole second elapsed; seconds left on the clock
    ClockTick(u32),
    Finished(RaceReward),
}

/// Route selection to be recorded in the player's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSelection {
    pub stage_id: u32,
    pub choice_id: &'static str,
}

/// Final result handed back when the session is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceOutcome {
    pub stage_id: u32,
    pub choice_id: &'static str,
    pub score: Score,
    pub reward: RaceReward,
}

/// Countdown progress (whole seconds shown so far)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Countdown {
    pub remaining: u8,
    pub elapsed: f32,
}

/// One race attempt
#[derive(Debug, Clone)]
pub struct RaceSession<R = Pcg32> {
    pub(crate) stage: &'static Stage,
    pub(crate) phase: RacePhase,
    pub(crate) route: Option<&'static RouteChoice>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) player_lane: u8,
    /// Sorted by id (spawn order)
    pub(crate) obstacles: Vec<Obstacle>,
    /// Sorted by id (spawn order)
    pub(crate) collectibles: Vec<Collectible>,
    pub(crate) time_remaining: u32,
    /// Fraction of the current race second already elapsed
    pub(crate) clock_elapsed: f32,
    pub(crate) countdown: Countdown,
    pub(crate) score: Score,
    pub(crate) speed: f32,
    pub(crate) boost_remaining: f32,
    pub(crate) spawner: Spawner,
    pub(crate) reward: Option<RaceReward>,
    pub(crate) events: Vec<RaceEvent>,
    pub(crate) source: R,
    next_id: u32,
}

impl RaceSession<Pcg32> {
    /// Create a session for a stage with a seeded RNG
    pub fn new(stage_id: u32, seed: u64) -> Result<Self, RaceError> {
        Self::with_source(stage_id, Pcg32::seed_from_u64(seed))
    }
}

impl<R> RaceSession<R> {
    /// Create a session with a caller-provided random source
    pub fn with_source(stage_id: u32, source: R) -> Result<Self, RaceError> {
        let stage = stage_by_id(stage_id).ok_or(RaceError::UnknownStage(stage_id))?;
        log::info!("Race session created for stage {} ({})", stage.id, stage.name);

        Ok(Self {
            stage,
            phase: RacePhase::Intro,
            route: None,
            difficulty: None,
            player_lane: START_LANE,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            time_remaining: RACE_DURATION_SECS,
            clock_elapsed: 0.0,
            countdown: Countdown {
                remaining: COUNTDOWN_FROM,
                elapsed: 0.0,
            },
            score: Score::default(),
            speed: 0.0,
            boost_remaining: 0.0,
            spawner: Spawner::default(),
            reward: None,
            events: Vec::new(),
            source,
            next_id: 1,
        })
    }

    /// Leave the intro screen and show the route choices
    pub fn begin(&mut self) -> Result<(), RaceError> {
        self.expect_phase(RacePhase::Intro, "begin")?;
        self.phase = RacePhase::Choice;
        Ok(())
    }

    /// Lock in a route and start the countdown.
    ///
    /// Unknown route ids are rejected and the session stays in `Choice`.
    pub fn choose_route(&mut self, route_id: &str) -> Result<RouteSelection, RaceError> {
        self.expect_phase(RacePhase::Choice, "choose a route")?;
        let route = RouteChoice::from_id(route_id)?;
        let difficulty = Difficulty::for_risk(route.risk);

        self.route = Some(route);
        self.difficulty = Some(difficulty);
        self.speed = difficulty.scroll_speed;
        self.phase = RacePhase::Countdown;
        self.countdown = Countdown {
            remaining: COUNTDOWN_FROM,
            elapsed: 0.0,
        };
        self.events.push(RaceEvent::Countdown(COUNTDOWN_FROM));

        log::info!(
            "Stage {}: route '{}' chosen (spawn every {} ms, speed {})",
            self.stage.id,
            route.id,
            difficulty.spawn_interval_ms,
            difficulty.scroll_speed
        );

        Ok(RouteSelection {
            stage_id: self.stage.id,
            choice_id: route.id,
        })
    }

    /// Move one lane left or right. Ignored outside of racing; clamped at the edges.
    pub fn change_lane(&mut self, change: LaneChange) {
        if self.phase != RacePhase::Racing {
            return;
        }
        self.player_lane = match change {
            LaneChange::Left => self.player_lane.saturating_sub(1),
            LaneChange::Right => (self.player_lane + 1).min(LANES - 1),
        };
    }

    /// Consume a finished session and return its outcome.
    ///
    /// Returns `None` if the race has not reached the result screen.
    pub fn finish(self) -> Option<RaceOutcome> {
        let reward = self.reward?;
        let route = self.route?;
        Some(RaceOutcome {
            stage_id: self.stage.id,
            choice_id: route.id,
            score: self.score,
            reward,
        })
    }

    /// Drop the session without producing an outcome
    pub fn abort(self) {
        log::info!(
            "Race on stage {} aborted during {:?}",
            self.stage.id,
            self.phase
        );
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn expect_phase(&self, expected: RacePhase, action: &'static str) -> Result<(), RaceError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RaceError::UnexpectedPhase {
                action,
                phase: self.phase,
            })
        }
    }

    pub fn stage(&self) -> &'static Stage {
        self.stage
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn route(&self) -> Option<&'static RouteChoice> {
        self.route
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn player_lane(&self) -> u8 {
        self.player_lane
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_remaining > 0.0
    }

    /// Countdown number currently shown (only meaningful in `Countdown`)
    pub fn countdown_value(&self) -> u8 {
        self.countdown.remaining
    }

    /// Computed reward, once the race has reached `Result`
    pub fn reward(&self) -> Option<RaceReward> {
        self.reward
    }
}

impl<R: SpawnSource> RaceSession<R> {
    /// Advance the simulation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        super::tick::advance(self, dt);
    }
}
