use bevy::ecs::message::MessageReader;
use bevy::input::{keyboard::KeyCode, mouse::MouseButton, ButtonInput};
use bevy::prelude::*;

use super::controls;
use super::input;
use super::viewpoint;
use crate::config::ControllerConfig;

/// Free-flying movement for the first-person camera.
#[derive(Component, Debug)]
pub struct Flight {
    pub base_speed: f32,
    pub sprint_speed: f32,
    /// Units per second. Switches between the base and sprint speed.
    pub movement_speed: f32,
    pub action: Action,
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub forward: f32,
    pub strafe: f32,
    pub lift: f32,
}

impl Flight {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            base_speed: config.base_speed,
            sprint_speed: config.sprint_speed,
            movement_speed: config.base_speed,
            action: Action::default(),
        }
    }
}

impl Action {
    pub fn from_input(movement_input: &input::movement::Input) -> Self {
        // Maps the movement coordinates to a circle (from a square).
        Self {
            forward: movement_input.forward
                * f32::sqrt(1.0 - movement_input.strafe.powi(2) / 2.0),
            strafe: movement_input.strafe
                * f32::sqrt(1.0 - movement_input.forward.powi(2) / 2.0),
            lift: movement_input.lift,
        }
    }

    /// Direction of travel when looking along `rotation`.
    pub fn direction(&self, rotation: Quat) -> Vec3 {
        let forward = rotation * -Vec3::Z;
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        forward * self.forward + right * self.strafe + up * self.lift
    }
}

pub struct Plugin;

impl Plugin {
    fn toggle_sprint(
        controls: Res<controls::Controls>,
        keyboard_input: Res<ButtonInput<KeyCode>>,
        mouse_input: Option<Res<ButtonInput<MouseButton>>>,
        mut query_flights: Query<&mut Flight>,
    ) {
        let buttons = controls::Buttons {
            keyboard: &keyboard_input,
            mouse: mouse_input.as_deref(),
        };
        let pressed = buttons.just_pressed(&controls.sprint);
        let released = buttons.just_released(&controls.sprint);

        for mut flight in query_flights.iter_mut() {
            if pressed {
                flight.movement_speed = flight.sprint_speed;
            } else if released {
                flight.movement_speed = flight.base_speed;
            }
        }
    }

    fn read_movement_inputs(
        mut query_flights: Query<&mut Flight>,
        mut movement_input_reader: MessageReader<input::movement::Input>,
    ) {
        let Some(movement_input) = movement_input_reader.read().last() else {
            return;
        };

        for mut flight in query_flights.iter_mut() {
            flight.action = Action::from_input(movement_input);
        }
    }

    fn fly(
        time: Res<Time>,
        mut query_flights: Query<(&mut Transform, &Flight, &viewpoint::Viewpoint)>,
    ) {
        // Camera movement follows wall-clock time, unlike the orbits.
        let time_delta = time.delta_secs();

        for (mut transform, flight, viewpoint) in query_flights.iter_mut() {
            transform.rotation = viewpoint.rotation;
            transform.translation +=
                flight.action.direction(viewpoint.rotation) * flight.movement_speed * time_delta;
        }
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                Self::toggle_sprint,
                Self::read_movement_inputs,
                Self::fly,
            )
                .chain()
                .after(input::ReadInputs)
                .after(viewpoint::UpdateViewpoint),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprint_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Time>()
            .insert_resource(controls::Controls::new())
            .add_message::<input::movement::Input>()
            .add_plugins(Plugin);
        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Flight::new(&ControllerConfig::default()),
                viewpoint::Viewpoint::default(),
            ))
            .id();
        (app, entity)
    }

    fn movement_speed(app: &App, entity: Entity) -> f32 {
        app.world().get::<Flight>(entity).unwrap().movement_speed
    }

    #[test]
    fn shift_toggles_sprint() {
        let (mut app, entity) = sprint_app();
        app.update();
        assert_eq!(movement_speed(&app, entity), 20.0);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ShiftLeft);
        app.update();
        assert_eq!(movement_speed(&app, entity), 100.0);

        // Holding the key keeps the sprint speed.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();
        assert_eq!(movement_speed(&app, entity), 100.0);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(KeyCode::ShiftLeft);
        app.update();
        assert_eq!(movement_speed(&app, entity), 20.0);
    }

    #[test]
    fn forward_follows_the_view() {
        let action = Action {
            forward: 1.0,
            strafe: 0.0,
            lift: 0.0,
        };
        let direction = action.direction(Quat::IDENTITY);
        assert!((direction - Vec3::NEG_Z).length() < 1e-6);

        let turned = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let direction = action.direction(turned);
        assert!((direction - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn diagonal_input_is_not_faster() {
        let action = Action::from_input(&input::movement::Input {
            forward: 1.0,
            strafe: 1.0,
            lift: 0.0,
        });
        let speed = action.direction(Quat::IDENTITY).length();
        assert!((speed - 1.0).abs() < 1e-6, "speed {speed}");
    }

    #[test]
    fn movement_uses_wall_clock_delta() {
        let (mut app, entity) = sprint_app();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(std::time::Duration::from_millis(500));
        app.world_mut().write_message(input::movement::Input {
            forward: 1.0,
            strafe: 0.0,
            lift: 0.0,
        });
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert!((transform.translation - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
    }
}
