/// Errors that can occur when loading or validating the solar system configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("body `{0}` is defined more than once")]
    DuplicateBody(String),

    #[error("body `{body}` orbits unknown parent `{parent}`")]
    UnknownParent { body: String, parent: String },

    /// Parents must come first so their position is already updated when a satellite is placed.
    #[error("body `{body}` is listed before its parent `{parent}`")]
    ParentAfterSatellite { body: String, parent: String },

    #[error("body `{body}` has invalid orbital radius {radius}")]
    InvalidRadius { body: String, radius: f32 },

    #[error("body `{body}` has invalid rate {rate}")]
    InvalidRate { body: String, rate: f64 },

    #[error("body `{body}` has invalid initial phase {phase}")]
    InvalidPhase { body: String, phase: f64 },
}
