use bevy::ecs::message::MessageReader;
use bevy::math::{EulerRot, Quat, Vec2};
use bevy::prelude::*;
use bevy::window::{CursorOptions, PrimaryWindow, WindowResized};

use super::{cursor, input};
use crate::config::ControllerConfig;

/// Radians turned when the mouse crosses the full viewport height at a look speed of 1.
const LOOK_GAIN: f32 = 10.0;

#[derive(Component, Default, Debug)]
pub struct Viewpoint {
    pub rotation: Quat,
    pub pitch: f32,
    pub yaw: f32,
}

impl Viewpoint {
    pub fn turn(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw = f32::rem_euclid(self.yaw - delta.x * sensitivity, std::f32::consts::TAU);
        self.pitch = f32::clamp(
            self.pitch - delta.y * sensitivity,
            -std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
        );
        self.rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
    }
}

#[derive(Resource, Debug)]
pub struct Look {
    pub look_speed: f32,
    pub viewport_height: f32,
}

impl Look {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            look_speed: config.look_speed,
            viewport_height: 720.0,
        }
    }

    /// Radians per pixel of mouse movement.
    pub fn sensitivity(&self) -> f32 {
        self.look_speed * LOOK_GAIN / self.viewport_height.max(1.0)
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateViewpoint;

pub struct Plugin;

impl Plugin {
    fn update_viewpoint(
        look: Res<Look>,
        query_cursor: Query<&CursorOptions, With<PrimaryWindow>>,
        mut query_viewpoints: Query<&mut Viewpoint>,
        mut mouse_motion_delta_reader: MessageReader<input::mouse_motion::Delta>,
    ) {
        let Some(mouse_motion_delta) = mouse_motion_delta_reader.read().last() else {
            return;
        };
        if !cursor::is_grabbed(query_cursor.single().ok()) {
            return;
        }

        for mut viewpoint in query_viewpoints.iter_mut() {
            viewpoint.turn(mouse_motion_delta.0, look.sensitivity());
        }
    }

    fn seed_viewport(mut look: ResMut<Look>, query_window: Query<&Window, With<PrimaryWindow>>) {
        let Ok(window) = query_window.single() else {
            return;
        };
        look.viewport_height = window.height();
    }

    fn handle_resize(mut look: ResMut<Look>, mut resized_reader: MessageReader<WindowResized>) {
        if let Some(resized) = resized_reader.read().last() {
            debug!("Viewport resized to {}x{}", resized.width, resized.height);
            look.viewport_height = resized.height;
        }
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, Self::seed_viewport).add_systems(
            Update,
            (Self::handle_resize, Self::update_viewpoint)
                .chain()
                .in_set(UpdateViewpoint)
                .after(input::ReadInputs),
        );
    }
}

#[cfg(test)]
mod tests {
    use bevy::window::CursorGrabMode;

    use super::*;

    fn look_app() -> App {
        let mut app = App::new();
        app.add_message::<WindowResized>()
            .add_message::<input::mouse_motion::Delta>()
            .insert_resource(Look::new(&ControllerConfig::default()))
            .add_plugins(Plugin);
        app
    }

    #[test]
    fn pitch_is_clamped() {
        let mut viewpoint = Viewpoint::default();
        viewpoint.turn(Vec2::new(0.0, -10_000.0), 0.01);
        assert_eq!(viewpoint.pitch, std::f32::consts::FRAC_PI_2);
        viewpoint.turn(Vec2::new(0.0, 50_000.0), 0.01);
        assert_eq!(viewpoint.pitch, -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn yaw_stays_within_a_turn() {
        let mut viewpoint = Viewpoint::default();
        for _ in 0..100 {
            viewpoint.turn(Vec2::new(-37.0, 0.0), 0.05);
            assert!((0.0..std::f32::consts::TAU).contains(&viewpoint.yaw));
        }
    }

    #[test]
    fn taller_viewport_turns_slower_per_pixel() {
        let mut look = Look::new(&ControllerConfig::default());
        let small = look.sensitivity();
        look.viewport_height = 1440.0;
        assert!((look.sensitivity() - small / 2.0).abs() < 1e-9);
    }

    #[test]
    fn resize_updates_viewport_height() {
        let mut app = look_app();

        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 1920.0,
            height: 1080.0,
        });
        app.update();

        assert_eq!(app.world().resource::<Look>().viewport_height, 1080.0);
    }

    #[test]
    fn viewport_height_starts_from_the_window() {
        let mut app = look_app();
        let mut window = Window::default();
        window.resolution.set(1920.0, 1080.0);
        app.world_mut().spawn((window, PrimaryWindow));
        app.update();

        assert_eq!(app.world().resource::<Look>().viewport_height, 1080.0);
    }

    #[test]
    fn mouse_turns_only_while_cursor_is_grabbed() {
        let mut app = look_app();
        let window = app
            .world_mut()
            .spawn((
                PrimaryWindow,
                CursorOptions {
                    grab_mode: CursorGrabMode::None,
                    ..Default::default()
                },
            ))
            .id();
        let camera = app.world_mut().spawn(Viewpoint::default()).id();

        app.world_mut()
            .write_message(input::mouse_motion::Delta(Vec2::new(40.0, 0.0)));
        app.update();
        assert_eq!(app.world().get::<Viewpoint>(camera).unwrap().yaw, 0.0);

        app.world_mut()
            .get_mut::<CursorOptions>(window)
            .unwrap()
            .grab_mode = CursorGrabMode::Locked;
        app.world_mut()
            .write_message(input::mouse_motion::Delta(Vec2::new(40.0, 0.0)));
        app.update();
        assert_ne!(app.world().get::<Viewpoint>(camera).unwrap().yaw, 0.0);
    }
}
