//! Error types for the harness, one enum per concern.

use serde_json::Value;

/// Transport-level failure while talking to the service under test.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A response did not look the way the contract says it should.
#[derive(Debug, thiserror::Error)]
pub enum AssertionFailure {
    #[error("expected status {expected}, got {actual}")]
    Status { expected: String, actual: u16 },

    #[error("response body does not contain expected shape\n  expected: {expected}\n  actual:   {actual}")]
    ShapeMismatch { expected: Value, actual: Value },

    #[error("field `{field}` mismatch: expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: Value,
        actual: Value,
    },

    #[error("response has no usable `id`: {body}")]
    MissingId { body: Value },
}

/// Why a single scenario failed. Never fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// An earlier scenario did not produce the state this one needs.
    #[error("missing precondition: {0}")]
    MissingState(&'static str),
}

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Top-level error of the binary, mapped to a process exit code.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Probe(#[from] ProbeError),

    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// | Code | Meaning                    |
    /// |------|----------------------------|
    /// | 1    | scenario failure / general |
    /// | 2    | configuration error        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Probe(_) | Self::JsonSerialize(_) | Self::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        let err = CliError::from(ConfigError::FileNotFound {
            path: "missing.toml".into(),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn status_failure_reports_both_values() {
        let err = AssertionFailure::Status {
            expected: "201".into(),
            actual: 500,
        };
        assert_eq!(err.to_string(), "expected status 201, got 500");
    }

    #[test]
    fn missing_state_is_distinct_from_assertion() {
        let err = ScenarioError::MissingState("no company was created");
        assert!(matches!(err, ScenarioError::MissingState(_)));
        assert_eq!(
            err.to_string(),
            "missing precondition: no company was created"
        );
    }
}
