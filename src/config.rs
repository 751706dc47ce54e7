//! Body table and controller settings, stored as RON.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_PATH: &str = "assets/solar_system.ron";

#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolarSystemConfig {
    /// Center of every top-level orbit.
    pub origin: [f32; 3],
    pub wrap: PhaseWrap,
    /// Satellites must be listed after their parent.
    pub bodies: Vec<BodyConfig>,
    pub controller: ControllerConfig,
}

/// What happens to an orbital phase once it reaches a full revolution.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhaseWrap {
    /// Drop back to exactly zero, discarding the overshoot.
    #[default]
    Reset,
    /// Subtract a full revolution, keeping the overshoot.
    Modulo,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Spin {
    #[default]
    Prograde,
    Retrograde,
}

impl Spin {
    pub fn sign(self) -> f64 {
        match self {
            Spin::Prograde => 1.0,
            Spin::Retrograde => -1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub orbital_radius: f32,
    /// Radians added to the orbital phase every tick.
    pub orbital_rate: f64,
    #[serde(default)]
    pub initial_phase: f64,
    /// Magnitude of the radians added to the self rotation every tick.
    pub rotation_rate: f64,
    #[serde(default)]
    pub spin: Spin,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub appearance: Option<Appearance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Appearance {
    /// Self-lit sphere that is not shaded by the scene light.
    Star { size: f32, texture: String },
    Sphere { size: f32, texture: String },
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        texture: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub base_speed: f32,
    pub sprint_speed: f32,
    pub look_speed: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_speed: 20.0,
            sprint_speed: 100.0,
            look_speed: 0.2,
        }
    }
}

impl BodyConfig {
    fn planet(
        name: &str,
        orbital_radius: f32,
        orbital_rate: f64,
        rotation_rate: f64,
        size: f32,
        texture: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            orbital_radius,
            orbital_rate,
            initial_phase: 0.0,
            rotation_rate,
            spin: Spin::Prograde,
            parent: None,
            appearance: Some(Appearance::Sphere {
                size,
                texture: format!("textures/{texture}"),
            }),
        }
    }

    fn orbiting(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    fn self_lit(mut self) -> Self {
        if let Some(Appearance::Sphere { size, texture }) = self.appearance.take() {
            self.appearance = Some(Appearance::Star { size, texture });
        }
        self
    }

    fn retrograde(mut self) -> Self {
        self.spin = Spin::Retrograde;
        self
    }
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        let bodies = vec![
            BodyConfig::planet("Sun", 0.0, 0.0, 0.001, 80.0, "2k_sun.jpg").self_lit(),
            BodyConfig::planet("Mercury", 150.0, 0.002, 0.00035, 2.28, "2k_mercury.jpg"),
            BodyConfig::planet(
                "Venus",
                280.0,
                0.000584,
                0.00005,
                5.64,
                "2k_venus_atmosphere.jpg",
            )
            .retrograde(),
            BodyConfig::planet("Earth", 390.0, 0.000365, 0.001, 6.0, "2k_earth_daymap.jpg"),
            BodyConfig::planet("Moon", 10.0, 0.01, 0.0, 1.0, "2k_moon.jpg").orbiting("Earth"),
            BodyConfig::planet("Mars", 585.0, 0.000182, 0.00095, 3.18, "2k_mars.jpg"),
            BodyConfig::planet("Jupiter", 1950.0, 0.000047, 0.002, 66.0, "2k_jupiter.jpg"),
            BodyConfig::planet("Saturn", 3705.0, 0.000022, 0.0015, 54.0, "2k_saturn.jpg"),
            BodyConfig {
                name: "Saturn Ring".to_string(),
                orbital_radius: 0.0,
                orbital_rate: 0.0,
                initial_phase: 0.0,
                rotation_rate: 0.1,
                spin: Spin::Prograde,
                parent: Some("Saturn".to_string()),
                appearance: Some(Appearance::Ring {
                    inner_radius: 3.0,
                    outer_radius: 100.0,
                    texture: "textures/rings2.png".to_string(),
                }),
            },
            BodyConfig::planet("Uranus", 7410.0, 0.00001, 0.0012, 24.0, "2k_uranus.jpg"),
            BodyConfig::planet("Neptune", 11700.0, 0.000001, 0.0013, 18.0, "2k_neptune.jpg"),
        ];

        Self {
            origin: [-30.0, 0.0, 0.0],
            wrap: PhaseWrap::Reset,
            bodies,
            controller: ControllerConfig::default(),
        }
    }
}

impl SolarSystemConfig {
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Reads the config at `path`, falling back to the built-in table when no file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "No config at {}, using the built-in body table",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = Self::from_ron(&contents)?;
        info!(
            "Loaded {} bodies from {}",
            config.bodies.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }
}
