//! Error types for argument building and certbot execution.

use std::path::PathBuf;

use thiserror::Error;

/// A flag generator could not resolve a required value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    /// Certbot's automation mode refuses to run without a contact email.
    #[error("email is required but was not resolved from configuration")]
    MissingEmail,
}

/// An authenticator lookup or argument build failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The requested challenge method is not registered. Lists every
    /// registered name so the operator can spot typos without reading code.
    #[error("unknown authenticator '{name}' requested (known: {})", .known.join(", "))]
    Unknown { name: String, known: Vec<String> },

    #[error("authenticator 'webroot' requires webroot_path to be specified")]
    MissingWebrootPath,

    #[error("authenticator 'dns-cloudflare' requires cloudflare_credentials_path to be specified")]
    MissingCloudflareCredentials,

    #[error(
        "authenticator 'dns-duckdns' requires duckdns_token in configuration \
         or the DUCKDNS_TOKEN environment variable"
    )]
    MissingDuckDnsToken,

    #[error("authenticator '{provider}' requires dns_propagation_seconds to be specified")]
    MissingPropagationSeconds { provider: String },
}

/// Building the argument vector for one certificate failed.
///
/// These are per-certificate: the initial batch logs them and moves on to
/// the next certificate rather than aborting.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("at least one domain is required")]
    NoDomains,

    #[error("unknown cmd '{0}' (options: 'certonly', 'run')")]
    UnknownCommand(String),

    #[error("flag generator '{generator}' failed for domains {domains:?}: {source}")]
    Flag {
        generator: &'static str,
        domains: Vec<String>,
        #[source]
        source: FlagError,
    },

    #[error("authenticator '{name}' failed for domains {domains:?}: {source}")]
    Authenticator {
        name: String,
        domains: Vec<String>,
        #[source]
        source: AuthError,
    },
}

/// Locating or executing the certbot binary failed.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("certbot path configuration is empty")]
    EmptyPath,

    #[error("certbot executable '{0}' not found in PATH and does not exist")]
    NotFound(String),

    #[error("certbot path '{}' is not executable", .0.display())]
    NotExecutable(PathBuf),

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Exit code is -1 when the process was terminated without one.
    #[error("command execution failed (exit code {code}, stderr: {stderr})")]
    CommandFailed { code: i32, stderr: String },
}
