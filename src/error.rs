use thiserror::Error;

/// Failures surfaced by the container control facade.
///
/// `NotFound` and `Runtime` are kept apart so callers can branch on the
/// kind instead of inspecting error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("container not found: {name}")]
    NotFound { name: String },

    #[error("{message}")]
    Runtime { message: String },
}

impl ControlError {
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    BindFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {details}")]
    Serve { details: String },
}

#[derive(Error, Debug)]
pub enum McControlError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Container control error: {0}")]
    Control(#[from] ControlError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("System error: {message}")]
    System { message: String },
}

impl McControlError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, McControlError>;
