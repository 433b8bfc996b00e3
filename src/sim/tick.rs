//! Variable timestep simulation tick
//!
//! The host calls [`advance`] once per display frame with the real elapsed
//! time. Movement is integrated in sub-steps no longer than [`SIM_DT`] so a
//! slow frame cannot carry an obstacle through the hit zone unseen.

use super::collision::{self, passed_player};
use super::scoring::compute_reward;
use super::spawner::{self, SpawnSource};
use super::state::{RaceEvent, RacePhase, RaceSession};
use crate::consts::*;

/// Advance the session by `dt` seconds
pub fn advance<R: SpawnSource>(session: &mut RaceSession<R>, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    match session.phase {
        RacePhase::Countdown => tick_countdown(session, dt),
        RacePhase::Racing => {
            let num_steps = (dt / SIM_DT).ceil().max(1.0) as u32;
            let step_dt = dt / num_steps as f32;
            for _ in 0..num_steps {
                step(session, step_dt);
                if session.phase != RacePhase::Racing {
                    break;
                }
            }
        }
        // Player-paced or terminal
        RacePhase::Intro | RacePhase::Choice | RacePhase::Result => {}
    }
}

/// Step the countdown one whole second at a time so every number is shown
fn tick_countdown<R>(session: &mut RaceSession<R>, dt: f32) {
    session.countdown.elapsed += dt;
    while session.countdown.elapsed >= 1.0 {
        session.countdown.elapsed -= 1.0;
        session.countdown.remaining = session.countdown.remaining.saturating_sub(1);

        if session.countdown.remaining == 0 {
            session.events.push(RaceEvent::Go);
            start_racing(session);
            return;
        }
        session
            .events
            .push(RaceEvent::Countdown(session.countdown.remaining));
    }
}

fn start_racing<R>(session: &mut RaceSession<R>) {
    session.phase = RacePhase::Racing;
    session.time_remaining = RACE_DURATION_SECS;
    session.clock_elapsed = 0.0;
    log::info!("Stage {}: racing", session.stage.id);
}

/// One racing sub-step
fn step<R: SpawnSource>(session: &mut RaceSession<R>, dt: f32) {
    // Move everything toward the player
    let travel = session.speed * dt * TICKS_PER_SECOND;
    for obstacle in &mut session.obstacles {
        obstacle.distance -= travel;
    }
    for collectible in &mut session.collectibles {
        collectible.distance -= travel;
    }

    collision::resolve(session);

    // Anything past the player is gone for good
    session.obstacles.retain(|o| !passed_player(o.distance));
    session.collectibles.retain(|c| !passed_player(c.distance));

    tick_boost(session, dt);
    spawner::run(session, dt * 1000.0);
    tick_clock(session, dt);
}

fn tick_boost<R>(session: &mut RaceSession<R>, dt: f32) {
    if session.boost_remaining <= 0.0 {
        return;
    }
    session.boost_remaining -= dt;
    if session.boost_remaining <= 0.0 {
        session.boost_remaining = 0.0;
        if let Some(difficulty) = session.difficulty {
            session.speed = difficulty.scroll_speed;
        }
        session.events.push(RaceEvent::BoostEnded);
    }
}

/// The race clock drops once per whole second, independent of step size
fn tick_clock<R>(session: &mut RaceSession<R>, dt: f32) {
    session.clock_elapsed += dt;
    while session.clock_elapsed >= 1.0 && session.time_remaining > 0 {
        session.clock_elapsed -= 1.0;
        session.time_remaining -= 1;
        session.events.push(RaceEvent::ClockTick(session.time_remaining));
    }

    if session.time_remaining == 0 {
        finish_race(session);
    }
}

fn finish_race<R>(session: &mut RaceSession<R>) {
    let Some(route) = session.route else {
        return;
    };
    let reward = compute_reward(session.stage.rewards, route.reward, session.score);

    session.phase = RacePhase::Result;
    session.obstacles.clear();
    session.collectibles.clear();
    session.reward = Some(reward);
    session.events.push(RaceEvent::Finished(reward));

    log::info!(
        "Stage {} finished: {} coins collected, {} hits -> +{} coins, +{} xp",
        session.stage.id,
        session.score.coins_collected,
        session.score.hits,
        reward.coins,
        reward.experience
    );
}
