use crate::{controls, cursor};
use bevy::ecs::message::{Message, MessageWriter};
use bevy::input::{keyboard::KeyCode, mouse::MouseButton, ButtonInput};
use bevy::prelude::*;
use bevy::window::{CursorOptions, PrimaryWindow};

#[derive(Message, Clone, Copy, Default, Debug, PartialEq)]
pub struct Input {
    pub forward: f32,
    pub strafe: f32,
    pub lift: f32,
}

impl Input {
    pub fn from_buttons(controls: &controls::Controls, buttons: &controls::Buttons) -> Self {
        let axis = |positive: &[controls::ButtonInput], negative: &[controls::ButtonInput]| {
            let mut value = 0.0;
            if buttons.pressed(positive) {
                value += 1.0;
            }
            if buttons.pressed(negative) {
                value -= 1.0;
            }
            value
        };

        Self {
            forward: axis(&controls.move_forward[..], &controls.move_backward[..]),
            strafe: axis(&controls.strafe_right[..], &controls.strafe_left[..]),
            lift: axis(&controls.move_up[..], &controls.move_down[..]),
        }
    }
}

pub struct Plugin;

impl Plugin {
    fn process_inputs(
        controls: Res<controls::Controls>,
        keyboard_input: Res<ButtonInput<KeyCode>>,
        mouse_input: Option<Res<ButtonInput<MouseButton>>>,
        query_cursor: Query<&CursorOptions, With<PrimaryWindow>>,
        mut input_message_writer: MessageWriter<Input>,
    ) {
        // A click that grabs the cursor is not a request to move.
        let buttons = controls::Buttons {
            keyboard: &keyboard_input,
            mouse: mouse_input
                .as_deref()
                .filter(|_| cursor::is_grabbed(query_cursor.single().ok())),
        };

        input_message_writer.write(Input::from_buttons(&controls, &buttons));
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_message::<Input>()
            .add_systems(Update, Self::process_inputs.in_set(super::ReadInputs));
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::MessageReader;
    use bevy::window::CursorGrabMode;

    use super::*;

    #[derive(Resource, Default)]
    struct LastInput(Option<Input>);

    fn record_input(mut last: ResMut<LastInput>, mut reader: MessageReader<Input>) {
        if let Some(input) = reader.read().last() {
            last.0 = Some(*input);
        }
    }

    fn click_app(grab_mode: CursorGrabMode) -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<LastInput>()
            .insert_resource(controls::Controls::new())
            .add_plugins(Plugin)
            .add_systems(Update, record_input.after(super::super::ReadInputs));
        app.world_mut().spawn((
            PrimaryWindow,
            CursorOptions {
                grab_mode,
                ..Default::default()
            },
        ));
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app
    }

    #[test]
    fn click_on_released_cursor_does_not_move() {
        let mut app = click_app(CursorGrabMode::None);
        app.update();
        let input = app.world().resource::<LastInput>().0.unwrap();
        assert_eq!(input.forward, 0.0);
    }

    #[test]
    fn click_on_grabbed_cursor_moves_forward() {
        let mut app = click_app(CursorGrabMode::Locked);
        app.update();
        let input = app.world().resource::<LastInput>().0.unwrap();
        assert_eq!(input.forward, 1.0);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let controls = controls::Controls::new();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyS);
        keyboard.press(KeyCode::KeyD);
        keyboard.press(KeyCode::KeyF);

        let input = Input::from_buttons(
            &controls,
            &controls::Buttons {
                keyboard: &keyboard,
                mouse: None,
            },
        );
        assert_eq!(
            input,
            Input {
                forward: 0.0,
                strafe: 1.0,
                lift: -1.0,
            }
        );
    }
}
