//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal at startup: the process must exit before any
/// certificate is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured file path does not point at an existing file.
    #[error("config file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    /// An override environment variable held a value of the wrong type.
    #[error("environment variable {var} must be a {expected}, got '{value}'")]
    InvalidEnvValue {
        var: String,
        expected: &'static str,
        value: String,
    },

    /// The renewal schedule is required; without it there is nothing to run.
    #[error("globals.renewal_cron must be set to a cron expression")]
    MissingRenewalCron,

    /// A configured command mode is outside the allow-list.
    #[error("unknown cmd '{cmd}' in {scope} (options: 'certonly', 'run')")]
    UnknownCommand { cmd: String, scope: String },

    /// File parsing or deserialization failure from the config layer.
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}
