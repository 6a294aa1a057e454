//! Challenge-method strategies and their name-keyed registry.
//!
//! An authenticator produces the certbot arguments that prove control of a
//! domain for one challenge method: the file-based `webroot` method or a
//! DNS-provider API plugin. Names are matched case-insensitively.

mod cloudflare;
mod duckdns;
mod webroot;

use std::collections::BTreeMap;

pub use cloudflare::CloudflareAuthenticator;
pub use duckdns::DuckDnsAuthenticator;
pub use webroot::WebrootAuthenticator;

use certman_config::{Certificate, Config, Globals};

use crate::error::AuthError;
use crate::resolve;

/// One challenge-method strategy.
///
/// Implementations are stateless and reused across every certificate in a
/// run.
pub trait Authenticator: Send + Sync {
    /// Produce the arguments proving domain control, or fail if required
    /// method-specific configuration is missing.
    fn build_args(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, AuthError>;
}

impl std::fmt::Debug for dyn Authenticator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Authenticator")
    }
}

/// Name-keyed authenticator registry.
///
/// Backed by a `BTreeMap` so the "known names" listing in lookup errors is
/// always in the same order.
pub struct AuthenticatorRegistry {
    entries: BTreeMap<String, Box<dyn Authenticator>>,
}

impl AuthenticatorRegistry {
    /// Empty registry; use [`AuthenticatorRegistry::standard`] for the
    /// stock set.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The stock authenticators: `webroot`, `dns-cloudflare`, `dns-duckdns`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("webroot", Box::new(WebrootAuthenticator));
        registry.register("dns-cloudflare", Box::new(CloudflareAuthenticator));
        registry.register("dns-duckdns", Box::new(DuckDnsAuthenticator));
        registry
    }

    /// Register an authenticator under `name` (lowercased). Registering a
    /// duplicate name replaces the previous entry with a warning.
    pub fn register(&mut self, name: &str, authenticator: Box<dyn Authenticator>) {
        let normalized = name.to_ascii_lowercase();
        if self
            .entries
            .insert(normalized.clone(), authenticator)
            .is_some()
        {
            tracing::warn!(
                name = %normalized,
                "authenticator already registered, replacing"
            );
        }
    }

    /// Look up an authenticator by name, case-insensitively. An unknown name
    /// fails with an error listing every registered name.
    pub fn get(&self, name: &str) -> Result<&dyn Authenticator, AuthError> {
        let normalized = name.to_ascii_lowercase();
        self.entries
            .get(&normalized)
            .map(|a| a.as_ref())
            .ok_or_else(|| AuthError::Unknown {
                name: normalized,
                known: self.names(),
            })
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl Default for AuthenticatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Startup check: every authenticator the configuration can resolve to must
/// be registered. Unknown names are fatal before any certificate is touched,
/// rather than surfacing one at a time during the batch.
pub fn validate_config_authenticators(
    config: &Config,
    registry: &AuthenticatorRegistry,
) -> Result<(), AuthError> {
    for cert in &config.certificates {
        let name = resolve::authenticator_name(cert, &config.globals);
        registry.get(name)?;
    }
    Ok(())
}

/// Shared propagation-wait handling for DNS provider plugins.
///
/// Resolution is certificate over global over the provider's compiled-in
/// default (`None` when the provider requires an explicit value). A resolved
/// value greater than zero emits `--dns-<provider>-propagation-seconds <n>`;
/// zero or negative emits nothing, deferring to the tool's built-in wait.
pub(crate) fn propagation_args(
    provider: &str,
    cert: &Certificate,
    globals: &Globals,
    default: Option<i64>,
) -> Result<Vec<String>, AuthError> {
    let resolved = resolve::integer(
        cert.common.dns_propagation_seconds,
        globals.common.dns_propagation_seconds,
    )
    .or(default);

    match resolved {
        None => Err(AuthError::MissingPropagationSeconds {
            provider: provider.to_string(),
        }),
        Some(seconds) if seconds > 0 => Ok(vec![
            format!("--dns-{provider}-propagation-seconds"),
            seconds.to_string(),
        ]),
        Some(_) => Ok(Vec::new()),
    }
}
