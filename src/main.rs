//! Zenith Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element};

    use zenith_racer::consts::*;
    use zenith_racer::game::{Game, StageAccess};
    use zenith_racer::platform::{KeyAction, LocalStorage, map_key};
    use zenith_racer::route::ROUTE_CHOICES;
    use zenith_racer::settings::Settings;
    use zenith_racer::sim::{RaceEvent, RacePhase, steer};

    /// Host state shared by the frame loop and event callbacks
    struct App {
        game: Game<LocalStorage>,
        settings: Settings,
        /// Autopilot drives the car
        idle_mode: bool,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(settings: Settings) -> Self {
            Self {
                game: Game::new(LocalStorage),
                settings,
                idle_mode: false,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Open the race view for a stage picked on the map
        fn select_stage(&mut self, stage_id: u32) {
            match self.game.select_stage(stage_id) {
                Ok(StageAccess::Ready) => {
                    let seed = js_sys::Date::now() as u64;
                    if let Err(e) = self.game.start_race(stage_id, seed) {
                        log::warn!("Could not start stage {}: {}", stage_id, e);
                    }
                }
                Ok(StageAccess::PaymentRequired { price_cents }) => {
                    show_payment_prompt(stage_id, price_cents);
                }
                Ok(StageAccess::Locked) => {}
                Err(e) => log::warn!("{}", e),
            }
        }

        fn handle_key(&mut self, action: KeyAction) {
            let phase = self.game.race().map(|r| r.phase());
            let result = match (action, phase) {
                (KeyAction::ToggleIdle, _) => {
                    self.idle_mode = !self.idle_mode;
                    log::info!("Idle mode: {}", self.idle_mode);
                    Ok(())
                }
                (KeyAction::Start, None) => {
                    let stage_id = self.game.progress().current_stage_data().id;
                    self.select_stage(stage_id);
                    Ok(())
                }
                (KeyAction::Start, Some(RacePhase::Intro)) => self.game.begin_race(),
                (KeyAction::Start, Some(RacePhase::Result)) => self.game.finish_race().map(|o| {
                    log::info!(
                        "Stage {} cleared: +{} coins, +{} XP",
                        o.stage_id,
                        o.reward.coins,
                        o.reward.experience
                    );
                }),
                (KeyAction::Route(id), Some(RacePhase::Choice)) => {
                    self.game.choose_route(id).map(|_| ())
                }
                (KeyAction::Lane(change), Some(RacePhase::Racing)) if !self.idle_mode => {
                    self.game.change_lane(change);
                    Ok(())
                }
                (KeyAction::Abort, Some(_)) => {
                    self.game.abort_race();
                    Ok(())
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                log::warn!("{}", e);
            }
        }

        /// Run the simulation for one display frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);

            if self.idle_mode {
                if let Some(change) = self.game.race().and_then(steer) {
                    self.game.change_lane(change);
                }
            }
            self.game.advance(dt);

            for event in self.game.drain_events() {
                match event {
                    RaceEvent::Finished(reward) => {
                        log::info!("Race over: {} coins, {} XP", reward.coins, reward.experience)
                    }
                    RaceEvent::ObstacleHit { id } => log::debug!("Hit obstacle {}", id),
                    _ => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            let progress = self.game.progress();
            set("#map-coins .hud-value", &progress.progress().total_coins.to_string());
            set(
                "#map-completion .hud-value",
                &format!("{:.0}%", progress.completion_percentage()),
            );
            show("hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set("#hud-fps .hud-value", &self.fps.to_string());
            }

            let Some(race) = self.game.race() else {
                show("map", true);
                show("race", false);
                for status in progress.stage_statuses() {
                    let selector = format!("[data-stage=\"{}\"]", status.stage.id);
                    if let Some(el) = document.query_selector(&selector).ok().flatten() {
                        let class = if status.is_completed {
                            "stage completed"
                        } else if status.can_access {
                            "stage open"
                        } else if status.is_locked {
                            "stage locked"
                        } else {
                            "stage premium"
                        };
                        let _ = el.set_attribute("class", class);
                    }
                }
                return;
            };
            show("map", false);
            show("race", true);

            let phase = race.phase();
            show("intro", phase == RacePhase::Intro);
            show("choice", phase == RacePhase::Choice);
            show("countdown", phase == RacePhase::Countdown);
            show("result", phase == RacePhase::Result);

            let stage = race.stage();
            set("#stage-name", stage.name);
            set("#stage-zone", &format!("{} {}", stage.zone.icon(), stage.zone.as_str()));
            set(
                "#stage-max-coins",
                &format!("Up to {} coins", stage.max_rewards().coins),
            );
            if phase == RacePhase::Choice {
                for route in ROUTE_CHOICES.iter() {
                    set(
                        &format!("#route-{} .route-name", route.id),
                        &format!(
                            "{} (risk {}, reward {})",
                            route.name,
                            route.risk.as_str(),
                            route.reward.as_str()
                        ),
                    );
                }
            }
            set("#countdown", &race.countdown_value().to_string());
            set("#hud-time .hud-value", &race.time_remaining().to_string());
            set("#hud-coins .hud-value", &race.score().coins_collected.to_string());
            set("#hud-hits .hud-value", &race.score().hits.to_string());
            set("#hud-lane .hud-value", &(race.player_lane() + 1).to_string());

            if let Some(el) = document.get_element_by_id("hud-boost") {
                let class = match (race.is_boosted(), self.settings.reduced_motion) {
                    (true, false) => "hud-item boost-flash",
                    (true, true) => "hud-item",
                    (false, _) => "hud-item hidden",
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(reward) = race.reward() {
                set("#result-coins", &reward.coins.to_string());
                set("#result-xp", &reward.experience.to_string());
            }
        }
    }

    fn show_payment_prompt(stage_id: u32, price_cents: u32) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("payment-price") {
            el.set_text_content(Some(&format!(
                "{}.{:02} €",
                price_cents / 100,
                price_cents % 100
            )));
        }
        if let Some(el) = document.get_element_by_id("payment") {
            let _ = el.set_attribute("data-stage", &stage_id.to_string());
            let _ = el.set_attribute("class", "");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Zenith Racer starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        log::info!("Controls: {}", settings.controls.as_str());
        // Write back so missing fields land in storage with their defaults
        settings.save();
        let app = Rc::new(RefCell::new(App::new(settings)));

        setup_input_handlers(&document, app.clone());
        setup_auto_abort(&document, app.clone());

        request_animation_frame(app);

        log::info!("Zenith Racer running!");
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                if let Some(action) = map_key(&event.key(), &a.settings) {
                    event.prevent_default();
                    a.handle_key(action);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Stage markers on the map and the payment prompt
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                let mut a = app.borrow_mut();

                if target.id() == "pay-button" {
                    // The gateway is outside the game; reaching here means it succeeded
                    a.game.unlock_paid_content();
                    let stage = web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id("payment"))
                        .and_then(|el| {
                            let _ = el.set_attribute("class", "hidden");
                            el.get_attribute("data-stage")
                        })
                        .and_then(|s| s.parse().ok());
                    if let Some(stage_id) = stage {
                        a.select_stage(stage_id);
                    }
                    return;
                }

                let stage = target
                    .closest("[data-stage]")
                    .ok()
                    .flatten()
                    .and_then(|el| el.get_attribute("data-stage"))
                    .and_then(|s| s.parse::<u32>().ok());
                if let Some(stage_id) = stage {
                    if a.game.race().is_none() {
                        a.select_stage(stage_id);
                    }
                }
            });
            let _ =
                document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop the race when the tab goes away (no partial rewards)
    fn setup_auto_abort(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut a = app.borrow_mut();
                if a.settings.abort_when_hidden && a.game.race().is_some() {
                    a.game.abort_race();
                    log::info!("Race aborted (tab hidden)");
                }
                // Don't count the hidden time as one huge frame
                a.last_time = 0.0;
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), zenith_racer::RaceError> {
    env_logger::init();
    log::info!("Zenith Racer (native) starting...");
    log::info!("Headless autopilot run - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot plays through the opening stages with in-memory progress
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use zenith_racer::consts::SIM_DT;
    use zenith_racer::game::{Game, StageAccess};
    use zenith_racer::persistence::MemoryStorage;
    use zenith_racer::route::ROUTE_CHOICES;
    use zenith_racer::sim::{RacePhase, steer};
    use zenith_racer::{RaceError, STAGES};

    /// Stages the demo attempts
    const DEMO_STAGES: u32 = 5;

    pub fn run(seed: u64) -> Result<(), RaceError> {
        let mut game = Game::new(MemoryStorage::new());

        for (stage, route) in STAGES
            .iter()
            .take(DEMO_STAGES as usize)
            .zip(ROUTE_CHOICES.iter().cycle())
        {
            if game.select_stage(stage.id)? != StageAccess::Ready {
                break;
            }
            game.start_race(stage.id, seed.wrapping_add(u64::from(stage.id)))?;
            game.begin_race()?;
            game.choose_route(route.id)?;

            while game.race().map(|r| r.phase()) != Some(RacePhase::Result) {
                if let Some(change) = game.race().and_then(steer) {
                    game.change_lane(change);
                }
                game.advance(SIM_DT);
            }

            let outcome = game.finish_race()?;
            println!(
                "{:>2} {:<20} {:<9} coins {:>3} hits {:>2} -> +{} coins +{} XP",
                stage.id,
                stage.name,
                route.id,
                outcome.score.coins_collected,
                outcome.score.hits,
                outcome.reward.coins,
                outcome.reward.experience
            );
        }

        let progress = game.progress();
        println!(
            "Total: {} coins, {} XP, {:.0}% complete",
            progress.progress().total_coins,
            progress.progress().total_experience,
            progress.completion_percentage()
        );
        Ok(())
    }
}
