use bevy::input::{keyboard::KeyCode, mouse::MouseButton, ButtonInput};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use super::controls;
use super::input;

/// Whether mouse input should steer the camera. Headless apps have no cursor to grab.
pub fn is_grabbed(cursor_options: Option<&CursorOptions>) -> bool {
    cursor_options.is_none_or(|cursor_options| cursor_options.grab_mode == CursorGrabMode::Locked)
}

pub struct Plugin;

impl Plugin {
    fn grab_cursor(mut query: Query<&mut CursorOptions, With<PrimaryWindow>>) {
        let Ok(mut cursor_options) = query.single_mut() else {
            return;
        };
        cursor_options.grab_mode = CursorGrabMode::Locked;
        cursor_options.visible = false;
        debug!("Cursor grabbed");
    }

    fn ungrab_cursor(mut query: Query<&mut CursorOptions, With<PrimaryWindow>>) {
        let Ok(mut cursor_options) = query.single_mut() else {
            return;
        };
        cursor_options.grab_mode = CursorGrabMode::None;
        cursor_options.visible = true;
        debug!("Cursor released");
    }

    fn toggle_cursor(
        controls: Res<controls::Controls>,
        keyboard_input: Res<ButtonInput<KeyCode>>,
        mouse_input: Option<Res<ButtonInput<MouseButton>>>,
        query: Query<&mut CursorOptions, With<PrimaryWindow>>,
    ) {
        let buttons = controls::Buttons {
            keyboard: &keyboard_input,
            mouse: mouse_input.as_deref(),
        };

        if buttons.just_pressed(&controls.release_cursor) {
            Self::ungrab_cursor(query);
        } else if buttons.just_pressed(&controls.grab_cursor) {
            Self::grab_cursor(query);
        }
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, Self::grab_cursor)
            .add_systems(Update, Self::toggle_cursor.after(input::ReadInputs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_locked_cursor_counts_as_grabbed() {
        let locked = CursorOptions {
            grab_mode: CursorGrabMode::Locked,
            ..Default::default()
        };
        let released = CursorOptions {
            grab_mode: CursorGrabMode::None,
            ..Default::default()
        };
        assert!(is_grabbed(Some(&locked)));
        assert!(!is_grabbed(Some(&released)));
        assert!(is_grabbed(None));
    }
}
