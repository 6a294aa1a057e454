//! DuckDNS DNS-01 challenge plugin.

use certman_config::{Certificate, Globals};

use crate::error::AuthError;
use crate::resolve;

use super::{propagation_args, Authenticator};

const PROVIDER: &str = "duckdns";

/// Environment fallback for the API token.
const TOKEN_ENV_VAR: &str = "DUCKDNS_TOKEN";

/// Propagation wait applied when the configuration does not set one.
const DEFAULT_PROPAGATION_SECONDS: i64 = 60;

/// DNS-01 via the DuckDNS API. The token comes from configuration
/// (`duckdns_token`, certificate over global) or the `DUCKDNS_TOKEN`
/// environment variable.
pub struct DuckDnsAuthenticator;

impl Authenticator for DuckDnsAuthenticator {
    fn build_args(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, AuthError> {
        let configured = resolve::string(
            cert.common.duckdns_token.as_deref(),
            globals.common.duckdns_token.as_deref(),
        )
        .map(str::to_string);
        let token = configured
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()))
            .ok_or(AuthError::MissingDuckDnsToken)?;

        let mut args = vec![
            "--authenticator".to_string(),
            "dns-duckdns".to_string(),
            "--dns-duckdns-token".to_string(),
            token,
        ];
        args.extend(propagation_args(
            PROVIDER,
            cert,
            globals,
            Some(DEFAULT_PROPAGATION_SECONDS),
        )?);
        Ok(args)
    }
}
