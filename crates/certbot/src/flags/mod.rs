//! Flag generators and their ordered registry.
//!
//! Each generator contributes zero or more certbot arguments based on the
//! resolved configuration. Registration order determines output order, so
//! two builds over the same configuration always produce the same vector.

mod common;
mod custom_args;
mod initial_run;

pub use common::{AgreeTosFlag, EmailFlag, KeyTypeFlag, NoEffEmailFlag, StagingFlag};
pub use custom_args::CustomArgsFlag;
pub use initial_run::InitialRunFlag;

use certman_config::{Certificate, Globals};

use crate::error::FlagError;

/// One independent contributor of certbot command-line arguments.
///
/// Generators are stateless: they read the certificate and global settings
/// on every call and hold nothing between requests, so a single instance is
/// reused across every certificate in a run.
pub trait FlagGenerator: Send + Sync {
    /// Stable identifier used in error context.
    fn name(&self) -> &'static str;

    /// Produce this generator's arguments, or fail if a value it requires
    /// could not be resolved from configuration.
    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError>;
}

/// Ordered collection of flag generators.
pub struct FlagRegistry {
    generators: Vec<Box<dyn FlagGenerator>>,
}

impl FlagRegistry {
    /// Empty registry; use [`FlagRegistry::standard`] for the stock set.
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// The stock generators, in the order their output appears on the
    /// command line.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(EmailFlag));
        registry.register(Box::new(AgreeTosFlag));
        registry.register(Box::new(StagingFlag));
        registry.register(Box::new(NoEffEmailFlag));
        registry.register(Box::new(KeyTypeFlag));
        registry.register(Box::new(InitialRunFlag));
        registry.register(Box::new(CustomArgsFlag));
        registry
    }

    /// Append a generator. Its output follows everything registered before it.
    pub fn register(&mut self, generator: Box<dyn FlagGenerator>) {
        self.generators.push(generator);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn FlagGenerator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new()
    }
}
