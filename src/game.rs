//! Stage selection and race orchestration
//!
//! The host talks to [`Game`]: pick a stage from the map, run the race it
//! opens, and apply the outcome to the player's progress. Access checks
//! happen before a session exists, so a locked or unpaid stage never reaches
//! the race view.

use rand_pcg::Pcg32;

use crate::catalog::{Stage, stage_by_id};
use crate::consts::PREMIUM_PRICE_CENTS;
use crate::error::RaceError;
use crate::persistence::ProgressStorage;
use crate::progress::ProgressStore;
use crate::sim::{LaneChange, RaceEvent, RaceOutcome, RacePhase, RaceSession, RouteSelection};

/// What selecting a stage on the map leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAccess {
    /// Open the race view
    Ready,
    /// Previous stage not completed yet
    Locked,
    /// Premium stage, show the payment prompt
    PaymentRequired { price_cents: u32 },
}

/// Progress plus the race currently on screen
#[derive(Debug)]
pub struct Game<S: ProgressStorage> {
    progress: ProgressStore<S>,
    race: Option<RaceSession<Pcg32>>,
}

impl<S: ProgressStorage> Game<S> {
    /// Load progress from `storage` and start on the map
    pub fn new(storage: S) -> Self {
        Self {
            progress: ProgressStore::load(storage),
            race: None,
        }
    }

    /// Decide what happens when the player picks a stage
    pub fn select_stage(&self, stage_id: u32) -> Result<StageAccess, RaceError> {
        let stage = stage_by_id(stage_id).ok_or(RaceError::UnknownStage(stage_id))?;
        Ok(self.access(stage))
    }

    fn access(&self, stage: &Stage) -> StageAccess {
        if self.progress.is_locked(stage) {
            StageAccess::Locked
        } else if !self.progress.can_access(stage) {
            StageAccess::PaymentRequired {
                price_cents: PREMIUM_PRICE_CENTS,
            }
        } else {
            StageAccess::Ready
        }
    }

    /// Open the race view for an accessible stage.
    ///
    /// Any race already on screen is dropped without a result.
    pub fn start_race(&mut self, stage_id: u32, seed: u64) -> Result<(), RaceError> {
        match self.select_stage(stage_id)? {
            StageAccess::Ready => {}
            access => {
                log::info!("Stage {} not available: {:?}", stage_id, access);
                return Err(RaceError::StageUnavailable {
                    id: stage_id,
                    access,
                });
            }
        }

        if let Some(previous) = self.race.take() {
            previous.abort();
        }
        self.race = Some(RaceSession::new(stage_id, seed)?);
        Ok(())
    }

    /// Intro -> route choice
    pub fn begin_race(&mut self) -> Result<(), RaceError> {
        self.race_mut()?.begin()
    }

    /// Lock in a route and remember it for the stage
    pub fn choose_route(&mut self, route_id: &str) -> Result<RouteSelection, RaceError> {
        let selection = self.race_mut()?.choose_route(route_id)?;
        self.progress
            .record_choice(selection.stage_id, selection.choice_id);
        Ok(selection)
    }

    /// Forward a lane change; no-op without a race
    pub fn change_lane(&mut self, change: LaneChange) {
        if let Some(race) = self.race.as_mut() {
            race.change_lane(change);
        }
    }

    /// Advance the race on screen by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if let Some(race) = self.race.as_mut() {
            race.advance(dt);
        }
    }

    /// Events emitted by the race since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        self.race
            .as_mut()
            .map(RaceSession::drain_events)
            .unwrap_or_default()
    }

    /// Leave the result screen, crediting the reward.
    ///
    /// Fails without touching the race if it has not reached its result yet.
    pub fn finish_race(&mut self) -> Result<RaceOutcome, RaceError> {
        let phase = self.race_mut()?.phase();
        if phase != RacePhase::Result {
            return Err(RaceError::UnexpectedPhase {
                action: "finish the race",
                phase,
            });
        }
        let outcome = self
            .race
            .take()
            .and_then(RaceSession::finish)
            .ok_or(RaceError::NoActiveRace)?;

        self.progress.complete_stage(
            outcome.stage_id,
            outcome.reward.coins,
            outcome.reward.experience,
        )?;
        Ok(outcome)
    }

    /// Back to the map with nothing credited
    pub fn abort_race(&mut self) {
        if let Some(race) = self.race.take() {
            race.abort();
        }
    }

    /// Called once the external payment has gone through
    pub fn unlock_paid_content(&mut self) {
        self.progress.unlock_paid_content();
    }

    pub fn reset_progress(&mut self) {
        self.abort_race();
        self.progress.reset_progress();
    }

    pub fn race(&self) -> Option<&RaceSession<Pcg32>> {
        self.race.as_ref()
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    fn race_mut(&mut self) -> Result<&mut RaceSession<Pcg32>, RaceError> {
        self.race.as_mut().ok_or(RaceError::NoActiveRace)
    }
}
