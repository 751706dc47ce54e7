use bevy::prelude::*;

pub mod mouse_motion;
pub mod movement;

/// Systems that turn raw device input into messages.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadInputs;

pub struct Plugin;

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(movement::Plugin);
        app.add_plugins(mouse_motion::Plugin);
    }
}
