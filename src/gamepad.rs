use log::info;

use crate::input::{GamepadSource, NoGamepads};

// Buttons in the "standard" layout order: 0 south face button, 12-15 d-pad.
pub const STANDARD_BUTTON_COUNT: usize = 16;

/// Stick reading with y pointing down, as the game expects. Backends report
/// y up.
pub fn stick_axes(x: f32, y_up: f32) -> [f32; 2] {
    [x, -y_up]
}

#[cfg(feature = "gamepad")]
mod backend {
    use gilrs::{Axis, Button, Gilrs};

    use super::{STANDARD_BUTTON_COUNT, stick_axes};
    use crate::input::{GamepadSource, GamepadState};

    const BUTTONS: [Button; STANDARD_BUTTON_COUNT] = [
        Button::South,
        Button::East,
        Button::West,
        Button::North,
        Button::LeftTrigger,
        Button::RightTrigger,
        Button::LeftTrigger2,
        Button::RightTrigger2,
        Button::Select,
        Button::Start,
        Button::LeftThumb,
        Button::RightThumb,
        Button::DPadUp,
        Button::DPadDown,
        Button::DPadLeft,
        Button::DPadRight,
    ];

    pub struct GilrsGamepads {
        pub(super) gilrs: Gilrs,
    }

    impl GamepadSource for GilrsGamepads {
        fn poll(&mut self) -> Vec<GamepadState> {
            // Pumping events refreshes the cached pad state.
            while self.gilrs.next_event().is_some() {}
            self.gilrs
                .gamepads()
                .filter(|(_, pad)| pad.is_connected())
                .map(|(_, pad)| GamepadState {
                    axes: stick_axes(pad.value(Axis::LeftStickX), pad.value(Axis::LeftStickY)),
                    buttons: BUTTONS.iter().map(|&button| pad.is_pressed(button)).collect(),
                })
                .collect()
        }
    }

}

/// The connected pads, or none when the build or the platform has no gamepad support.
pub fn open_gamepads() -> Box<dyn GamepadSource> {
    #[cfg(feature = "gamepad")]
    {
        match gilrs::Gilrs::new() {
            Ok(gilrs) => {
                info!("Gamepad support enabled, {} pads connected", gilrs.gamepads().count());
                return Box::new(backend::GilrsGamepads { gilrs });
            }
            Err(e) => log::warn!("Gamepad support unavailable: {}", e),
        }
    }
    #[cfg(not(feature = "gamepad"))]
    {
        info!("Built without the gamepad feature, gamepads disabled");
    }
    Box::new(NoGamepads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::input::{GamepadState, InputAggregator};

    #[test]
    fn stick_up_steers_up() {
        let pad = GamepadState { axes: stick_axes(0.0, 0.9), buttons: vec![false; STANDARD_BUTTON_COUNT] };
        let keys = pad.keys(GAMEPAD_THRESHOLD);
        assert!(keys.up && !keys.down);
    }

    #[test]
    fn threshold_is_configurable() {
        let pad = GamepadState { axes: stick_axes(0.35, 0.0), buttons: vec![false; STANDARD_BUTTON_COUNT] };
        let mut strict = InputAggregator::new(None);
        strict.apply_gamepads(std::slice::from_ref(&pad));
        assert!(!strict.keys().right);

        let mut loose = InputAggregator::new(None).with_gamepad_threshold(0.3);
        assert!(loose.apply_gamepads(std::slice::from_ref(&pad)));
        assert!(loose.keys().right);
    }
}
