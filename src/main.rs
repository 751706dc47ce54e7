use std::path::Path;

use bevy::prelude::*;

mod config;
mod controls;
mod cursor;
mod error;
mod flight;
mod input;
mod orbit;
mod scene;
mod viewpoint;

use config::SolarSystemConfig;
use error::ConfigError;
use orbit::SolarSystem;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "solar system".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }));

    // Loaded after the log plugin so problems show up in the log.
    let (config, solar_system) = match load(Path::new(config::CONFIG_PATH)) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("Ignoring {}: {err}", config::CONFIG_PATH);
            let config = SolarSystemConfig::default();
            let solar_system = SolarSystem::from_config(&config)
                .expect("built-in body table is valid");
            (config, solar_system)
        }
    };

    app.insert_resource(viewpoint::Look::new(&config.controller))
        .insert_resource(config)
        .insert_resource(solar_system)
        .add_plugins(cursor::Plugin)
        .add_plugins(controls::Plugin)
        .add_plugins(input::Plugin)
        .add_plugins(viewpoint::Plugin)
        .add_plugins(flight::Plugin)
        .add_plugins(orbit::Plugin)
        .add_plugins(scene::Plugin);

    app.run();
}

fn load(path: &Path) -> Result<(SolarSystemConfig, SolarSystem), ConfigError> {
    let config = SolarSystemConfig::load_or_default(path)?;
    let solar_system = SolarSystem::from_config(&config)?;
    Ok((config, solar_system))
}
