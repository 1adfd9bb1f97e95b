use thiserror::Error;

/// Result alias used across the core crate
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while configuring or driving a simulation.
///
/// Physics degeneracies (coincident blocks, non-positive mass) are not
/// errors: they surface as non-finite state instead.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A force source name that does not map to any key
    #[error("unknown force key '{0}'")]
    UnknownForceKey(String),

    /// An input name that does not map to a direction
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    /// A color string that is not `#rrggbb`
    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SimError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
