use std::f32::consts::FRAC_PI_2;

use bevy::asset::AssetLoadFailedEvent;
use bevy::ecs::message::MessageReader;
use bevy::light::NotShadowCaster;
use bevy::mesh::{MeshBuilder, Meshable, VertexAttributeValues};
use bevy::prelude::*;

use crate::config::{Appearance, SolarSystemConfig};
use crate::flight;
use crate::orbit::{BaseOrientation, BodyHandle, SolarSystem};
use crate::viewpoint;

/// Tilt of a ring's plane away from the orbital plane.
const RING_TILT: f32 = std::f32::consts::PI / 12.0;
const VIEW_DISTANCE: f32 = 12000.0;

/// Flat ring on the horizontal plane whose texture runs from the inner edge outwards.
pub fn ring_mesh(inner_radius: f32, outer_radius: f32) -> Mesh {
    let mut mesh = Annulus::new(inner_radius, outer_radius)
        .mesh()
        .resolution(64)
        .build()
        .rotated_by(Quat::from_rotation_x(-FRAC_PI_2));

    let uvs = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => ring_uvs(positions, inner_radius),
        _ => return mesh,
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}

pub fn ring_uvs(positions: &[[f32; 3]], inner_radius: f32) -> Vec<[f32; 2]> {
    positions
        .iter()
        .map(|position| {
            let u = if Vec3::from_array(*position).length() < inner_radius + 1.0 {
                0.0
            } else {
                1.0
            };
            [u, 1.0]
        })
        .collect()
}

pub fn failure_message(failure: &AssetLoadFailedEvent<Image>) -> String {
    format!("Failed to load texture {}: {}", failure.path, failure.error)
}

pub struct Plugin;

impl Plugin {
    fn setup(
        mut commands: Commands,
        mut meshes: ResMut<Assets<Mesh>>,
        mut materials: ResMut<Assets<StandardMaterial>>,
        asset_server: Res<AssetServer>,
        config: Res<SolarSystemConfig>,
        solar_system: Res<SolarSystem>,
    ) {
        let mut spawned = 0;

        for (index, (body_config, body)) in config
            .bodies
            .iter()
            .zip(solar_system.bodies())
            .enumerate()
        {
            let Some(appearance) = &body_config.appearance else {
                continue;
            };
            let transform = Transform::from_translation(body.position());
            let handle = BodyHandle(index);
            let name = Name::new(body.name.clone());

            match appearance {
                Appearance::Star { size, texture } => {
                    let sphere = meshes.add(Sphere::new(*size).mesh().uv(64, 32));
                    commands.spawn((
                        name,
                        handle,
                        transform,
                        Mesh3d(sphere),
                        // The light sits inside the star.
                        NotShadowCaster,
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color_texture: Some(asset_server.load(texture.clone())),
                            unlit: true,
                            ..default()
                        })),
                    ));
                }
                Appearance::Sphere { size, texture } => {
                    let sphere = meshes.add(Sphere::new(*size).mesh().uv(64, 32));
                    commands.spawn((
                        name,
                        handle,
                        transform,
                        Mesh3d(sphere),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color_texture: Some(asset_server.load(texture.clone())),
                            perceptual_roughness: 1.0,
                            ..default()
                        })),
                    ));
                }
                Appearance::Ring {
                    inner_radius,
                    outer_radius,
                    texture,
                } => {
                    let base_orientation = Quat::from_rotation_x(RING_TILT);
                    commands.spawn((
                        name,
                        handle,
                        transform.with_rotation(base_orientation),
                        BaseOrientation(base_orientation),
                        Mesh3d(meshes.add(ring_mesh(*inner_radius, *outer_radius))),
                        MeshMaterial3d(materials.add(StandardMaterial {
                            base_color_texture: Some(asset_server.load(texture.clone())),
                            alpha_mode: AlphaMode::Blend,
                            double_sided: true,
                            cull_mode: None,
                            unlit: true,
                            ..default()
                        })),
                    ));
                }
            }
            spawned += 1;
        }

        commands.spawn((
            Name::new("Light"),
            PointLight {
                intensity: 4.0e12,
                range: VIEW_DISTANCE,
                shadows_enabled: true,
                ..default()
            },
            Transform::default(),
        ));

        commands.spawn((
            Name::new("Camera"),
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 75f32.to_radians(),
                near: 0.1,
                far: VIEW_DISTANCE,
                ..default()
            }),
            Transform::from_xyz(80.0, 0.0, 5.0),
            viewpoint::Viewpoint::default(),
            flight::Flight::new(&config.controller),
        ));

        info!("Spawned {spawned} bodies");
    }

    fn report_failed_textures(mut failures: MessageReader<AssetLoadFailedEvent<Image>>) {
        for failure in failures.read() {
            warn!("{}", failure_message(failure));
        }
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, Self::setup)
            .add_systems(Update, Self::report_failed_textures);
    }
}
