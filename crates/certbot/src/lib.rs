//! Certbot argument building and process execution.
//!
//! The core pipeline: resolved configuration flows through the ordered
//! [`flags::FlagRegistry`] and the name-keyed
//! [`authenticators::AuthenticatorRegistry`] into the
//! [`builder::ArgsBuilder`], which produces the exact argument vector the
//! [`runner::CertbotRunner`] hands to the external certbot executable.
//! [`batch::run_initial_batch`] drives one build-and-execute pass over every
//! configured certificate at startup.
//!
//! Registries are constructed once at process start (the `standard()` sets,
//! extended via `register` where needed) and threaded explicitly into the
//! builder; there is no hidden global registration.

pub mod authenticators;
pub mod batch;
pub mod builder;
pub mod error;
pub mod flags;
pub mod resolve;
pub mod runner;

pub use authenticators::{validate_config_authenticators, Authenticator, AuthenticatorRegistry};
pub use batch::{run_initial_batch, BatchOutcome};
pub use builder::ArgsBuilder;
pub use error::{AuthError, BuildError, FlagError, RunnerError};
pub use flags::{FlagGenerator, FlagRegistry};
pub use runner::{validate_certbot_path, CertbotRunner};
