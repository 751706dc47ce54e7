use bevy::input::{keyboard::KeyCode, mouse::MouseButton, ButtonInput as Pressed};
use bevy::prelude::*;

#[derive(Resource, Debug)]
pub struct Controls {
    pub move_forward: Vec<ButtonInput>,
    pub move_backward: Vec<ButtonInput>,
    pub strafe_left: Vec<ButtonInput>,
    pub strafe_right: Vec<ButtonInput>,
    pub move_up: Vec<ButtonInput>,
    pub move_down: Vec<ButtonInput>,
    pub sprint: Vec<ButtonInput>,
    pub release_cursor: Vec<ButtonInput>,
    pub grab_cursor: Vec<ButtonInput>,
}

impl Controls {
    pub fn new() -> Self {
        Controls {
            move_forward: vec![
                ButtonInput::Keyboard(KeyCode::KeyW),
                ButtonInput::Keyboard(KeyCode::ArrowUp),
                ButtonInput::Mouse(MouseButton::Left),
            ],
            move_backward: vec![
                ButtonInput::Keyboard(KeyCode::KeyS),
                ButtonInput::Keyboard(KeyCode::ArrowDown),
                ButtonInput::Mouse(MouseButton::Right),
            ],
            strafe_left: vec![
                ButtonInput::Keyboard(KeyCode::KeyA),
                ButtonInput::Keyboard(KeyCode::ArrowLeft),
            ],
            strafe_right: vec![
                ButtonInput::Keyboard(KeyCode::KeyD),
                ButtonInput::Keyboard(KeyCode::ArrowRight),
            ],
            move_up: vec![ButtonInput::Keyboard(KeyCode::KeyR)],
            move_down: vec![ButtonInput::Keyboard(KeyCode::KeyF)],
            sprint: vec![
                ButtonInput::Keyboard(KeyCode::ShiftLeft),
                ButtonInput::Keyboard(KeyCode::ShiftRight),
            ],
            release_cursor: vec![ButtonInput::Keyboard(KeyCode::Escape)],
            grab_cursor: vec![ButtonInput::Mouse(MouseButton::Left)],
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

/// Snapshot of the keyboard and mouse button state for one frame.
pub struct Buttons<'a> {
    pub keyboard: &'a Pressed<KeyCode>,
    pub mouse: Option<&'a Pressed<MouseButton>>,
}

impl Buttons<'_> {
    pub fn pressed(&self, bindings: &[ButtonInput]) -> bool {
        bindings.iter().any(|binding| match *binding {
            ButtonInput::Keyboard(key_code) => self.keyboard.pressed(key_code),
            ButtonInput::Mouse(mouse_button) => self
                .mouse
                .is_some_and(|mouse| mouse.pressed(mouse_button)),
        })
    }

    pub fn just_pressed(&self, bindings: &[ButtonInput]) -> bool {
        bindings.iter().any(|binding| match *binding {
            ButtonInput::Keyboard(key_code) => self.keyboard.just_pressed(key_code),
            ButtonInput::Mouse(mouse_button) => self
                .mouse
                .is_some_and(|mouse| mouse.just_pressed(mouse_button)),
        })
    }

    pub fn just_released(&self, bindings: &[ButtonInput]) -> bool {
        bindings.iter().any(|binding| match *binding {
            ButtonInput::Keyboard(key_code) => self.keyboard.just_released(key_code),
            ButtonInput::Mouse(mouse_button) => self
                .mouse
                .is_some_and(|mouse| mouse.just_released(mouse_button)),
        })
    }
}

pub struct Plugin;

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Controls::new());
    }
}
