use std::f64::consts::TAU;

use bevy::prelude::*;
use itertools::Itertools;

use crate::config::{PhaseWrap, SolarSystemConfig};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub orbital_radius: f32,
    /// Radians added to the self rotation every tick. Negative spins backwards.
    pub rotation_rate: f64,
    /// Radians added to the orbital phase every tick.
    pub orbital_rate: f64,
    /// Kept in double precision so small per-tick rates are not rounded away.
    pub orbital_phase: f64,
    pub self_rotation: f64,
    /// Index of the body this one orbits, if it is a satellite.
    pub parent: Option<usize>,
    position: Vec3,
}

impl Body {
    /// World position as of the last tick. Only ever derived from the orbital phase.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Offset from the orbit center, on the horizontal plane.
    pub fn local_offset(&self) -> Vec3 {
        circle_point(self.orbital_radius, self.orbital_phase)
    }

    /// Spin around the vertical axis, reduced to one turn for single-precision transforms.
    pub fn spin(&self) -> f32 {
        self.self_rotation.rem_euclid(TAU) as f32
    }
}

pub fn circle_point(radius: f32, phase: f64) -> Vec3 {
    let radius = f64::from(radius);
    Vec3::new((radius * phase.cos()) as f32, 0.0, (radius * phase.sin()) as f32)
}

/// Number of `advance` calls since the bodies were created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    pub ticks: u64,
}

#[derive(Resource, Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    origin: Vec3,
    wrap: PhaseWrap,
    clock: SimulationClock,
}

impl SolarSystem {
    pub fn from_config(config: &SolarSystemConfig) -> Result<Self, ConfigError> {
        if let Some(name) = config.bodies.iter().map(|body| &body.name).duplicates().next() {
            return Err(ConfigError::DuplicateBody(name.clone()));
        }

        let mut bodies: Vec<Body> = Vec::with_capacity(config.bodies.len());
        for body in &config.bodies {
            if !body.orbital_radius.is_finite() || body.orbital_radius < 0.0 {
                return Err(ConfigError::InvalidRadius {
                    body: body.name.clone(),
                    radius: body.orbital_radius,
                });
            }
            for rate in [body.orbital_rate, body.rotation_rate] {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(ConfigError::InvalidRate {
                        body: body.name.clone(),
                        rate,
                    });
                }
            }
            if !body.initial_phase.is_finite() {
                return Err(ConfigError::InvalidPhase {
                    body: body.name.clone(),
                    phase: body.initial_phase,
                });
            }

            let parent = match &body.parent {
                None => None,
                Some(parent) => match bodies.iter().position(|known| &known.name == parent) {
                    Some(index) => Some(index),
                    None if config.bodies.iter().any(|other| &other.name == parent) => {
                        return Err(ConfigError::ParentAfterSatellite {
                            body: body.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                    None => {
                        return Err(ConfigError::UnknownParent {
                            body: body.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                },
            };

            bodies.push(Body {
                name: body.name.clone(),
                orbital_radius: body.orbital_radius,
                rotation_rate: body.spin.sign() * body.rotation_rate,
                orbital_rate: body.orbital_rate,
                orbital_phase: body.initial_phase,
                self_rotation: 0.0,
                parent,
                position: Vec3::ZERO,
            });
        }

        let mut system = Self {
            bodies,
            origin: config.origin(),
            wrap: config.wrap,
            clock: SimulationClock::default(),
        };
        system.update_positions();
        Ok(system)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|body| body.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|body| body.name == name)
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    /// Moves every body forward by one tick.
    pub fn advance(&mut self) {
        for body in self.bodies.iter_mut() {
            body.orbital_phase += body.orbital_rate;
        }

        // All phases are wrapped before any position is derived from them.
        for body in self.bodies.iter_mut() {
            body.orbital_phase = wrap_phase(body.orbital_phase, self.wrap);
        }

        for body in self.bodies.iter_mut() {
            body.self_rotation += body.rotation_rate;
        }

        self.update_positions();
        self.clock.ticks += 1;
    }

    fn update_positions(&mut self) {
        for index in 0..self.bodies.len() {
            let center = match self.bodies[index].parent {
                Some(parent) => self.bodies[parent].position,
                None => self.origin,
            };
            let body = &mut self.bodies[index];
            body.position = center + body.local_offset();
        }
    }
}

pub fn wrap_phase(phase: f64, wrap: PhaseWrap) -> f64 {
    if phase < TAU {
        return phase;
    }
    match wrap {
        PhaseWrap::Reset => 0.0,
        PhaseWrap::Modulo => phase.rem_euclid(TAU),
    }
}

/// Links a rendered entity to a body in [`SolarSystem`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandle(pub usize);

/// Fixed orientation applied before the body's spin around the vertical axis.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BaseOrientation(pub Quat);

pub struct Plugin;

impl Plugin {
    fn advance_bodies(mut solar_system: ResMut<SolarSystem>) {
        solar_system.advance();
    }

    fn sync_transforms(
        solar_system: Res<SolarSystem>,
        mut query: Query<(&BodyHandle, &mut Transform, Option<&BaseOrientation>)>,
    ) {
        for (handle, mut transform, base_orientation) in query.iter_mut() {
            let Some(body) = solar_system.bodies().get(handle.0) else {
                continue;
            };
            let base = base_orientation.map_or(Quat::IDENTITY, |orientation| orientation.0);

            transform.translation = body.position();
            transform.rotation = base * Quat::from_rotation_y(body.spin());
        }
    }
}

impl bevy::app::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (Self::advance_bodies, Self::sync_transforms)
                .chain()
                .run_if(resource_exists::<SolarSystem>),
        );
    }
}
