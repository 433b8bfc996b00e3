//! Keyboard mapping
//!
//! Translates `KeyboardEvent.key` values into game commands. Lane keys
//! depend on the player's control scheme; everything else is fixed.

use crate::settings::Settings;
use crate::sim::LaneChange;

/// Command a key press stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Lane(LaneChange),
    /// Leave the intro (or replay from the result screen)
    Start,
    /// Pick a route by id
    Route(&'static str),
    Abort,
    ToggleIdle,
}

/// Map a `KeyboardEvent.key` to its action, if any
pub fn map_key(key: &str, settings: &Settings) -> Option<KeyAction> {
    let controls = settings.controls;
    match key {
        "ArrowLeft" if controls.arrows() => Some(KeyAction::Lane(LaneChange::Left)),
        "ArrowRight" if controls.arrows() => Some(KeyAction::Lane(LaneChange::Right)),
        "a" | "A" if controls.wasd() => Some(KeyAction::Lane(LaneChange::Left)),
        "d" | "D" if controls.wasd() => Some(KeyAction::Lane(LaneChange::Right)),
        "Enter" | " " => Some(KeyAction::Start),
        "1" => Some(KeyAction::Route("safe")),
        "2" => Some(KeyAction::Route("balanced")),
        "3" => Some(KeyAction::Route("risky")),
        "Escape" => Some(KeyAction::Abort),
        "i" | "I" => Some(KeyAction::ToggleIdle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteChoice;
    use crate::settings::ControlScheme;

    fn with_controls(controls: ControlScheme) -> Settings {
        Settings {
            controls,
            ..Settings::default()
        }
    }

    #[test]
    fn test_lane_keys_follow_scheme() {
        let arrows = with_controls(ControlScheme::Arrows);
        assert_eq!(
            map_key("ArrowLeft", &arrows),
            Some(KeyAction::Lane(LaneChange::Left))
        );
        assert_eq!(map_key("d", &arrows), None);

        let wasd = with_controls(ControlScheme::Wasd);
        assert_eq!(map_key("D", &wasd), Some(KeyAction::Lane(LaneChange::Right)));
        assert_eq!(map_key("ArrowRight", &wasd), None);

        let both = with_controls(ControlScheme::Both);
        assert!(map_key("a", &both).is_some());
        assert!(map_key("ArrowLeft", &both).is_some());
    }

    #[test]
    fn test_route_keys_name_real_routes() {
        let settings = Settings::default();
        for key in ["1", "2", "3"] {
            let Some(KeyAction::Route(id)) = map_key(key, &settings) else {
                panic!("{key} should pick a route");
            };
            assert!(RouteChoice::from_id(id).is_ok());
        }
    }

    #[test]
    fn test_fixed_keys() {
        let settings = Settings::default();
        assert_eq!(map_key(" ", &settings), Some(KeyAction::Start));
        assert_eq!(map_key("Escape", &settings), Some(KeyAction::Abort));
        assert_eq!(map_key("i", &settings), Some(KeyAction::ToggleIdle));
        assert_eq!(map_key("q", &settings), None);
    }
}
