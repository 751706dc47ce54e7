use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

/// Raw mouse movement in pixels, summed over one frame.
#[derive(Message, Default, Debug)]
pub struct Delta(pub bevy::math::Vec2);

pub struct Plugin;

impl Plugin {
    fn process_inputs(
        mut mouse_motion_reader: MessageReader<MouseMotion>,
        mut delta_writer: MessageWriter<Delta>,
    ) {
        let mut delta = bevy::math::Vec2::ZERO;
        for motion in mouse_motion_reader.read() {
            delta += motion.delta;
        }

        delta_writer.write(Delta(delta));
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_message::<Delta>()
            .add_systems(Update, Self::process_inputs.in_set(super::ReadInputs));
    }
}
