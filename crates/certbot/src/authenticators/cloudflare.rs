//! Cloudflare DNS-01 challenge plugin.

use certman_config::{Certificate, Globals};

use crate::error::AuthError;
use crate::resolve;

use super::{propagation_args, Authenticator};

const PROVIDER: &str = "cloudflare";

/// DNS-01 via the Cloudflare API. Requires a credentials file path and an
/// explicit propagation wait (no compiled-in default for this provider).
pub struct CloudflareAuthenticator;

impl Authenticator for CloudflareAuthenticator {
    fn build_args(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, AuthError> {
        let credentials = resolve::string(
            cert.common.cloudflare_credentials_path.as_deref(),
            globals.common.cloudflare_credentials_path.as_deref(),
        )
        .ok_or(AuthError::MissingCloudflareCredentials)?;

        let mut args = vec![
            "--authenticator".to_string(),
            "dns-cloudflare".to_string(),
            "--dns-cloudflare-credentials".to_string(),
            credentials.to_string(),
        ];
        args.extend(propagation_args(PROVIDER, cert, globals, None)?);
        Ok(args)
    }
}
