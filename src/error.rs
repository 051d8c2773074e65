use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required key '{field}' in [{section}]")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    #[error("invalid value for '{field}' in [{section}]: {reason}")]
    InvalidValue {
        section: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    /// Every problem found while validating the enabled sections.
    #[error("{}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

impl ConfigError {
    pub(crate) fn missing(section: &'static str, field: &'static str) -> Self {
        Self::MissingField { section, field }
    }

    pub(crate) fn invalid(section: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            section,
            field,
            reason: reason.into(),
        }
    }

    /// Flatten into the individual problems, for callers that match on them.
    pub fn problems(&self) -> Vec<&ConfigError> {
        match self {
            Self::Invalid(errors) => errors.iter().flat_map(ConfigError::problems).collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The remote side could not be reached or answered with an error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote side answered, but not with what we expected.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other condition that should abort the current module attempt.
    #[error("{0}")]
    Fault(String),
}

impl Error {
    /// Errors a module absorbs locally by skipping the current cycle.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Protocol(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Protocol(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
