//! File-based webroot challenge.

use certman_config::{Certificate, Globals};

use crate::error::AuthError;
use crate::resolve;

use super::Authenticator;

/// Proves domain control by placing challenge files under a served
/// directory. Requires `webroot_path` on the certificate or globally.
pub struct WebrootAuthenticator;

impl Authenticator for WebrootAuthenticator {
    fn build_args(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, AuthError> {
        let path = resolve::string(
            cert.common.webroot_path.as_deref(),
            globals.common.webroot_path.as_deref(),
        )
        .ok_or(AuthError::MissingWebrootPath)?;

        Ok(vec![
            "--webroot".to_string(),
            "-w".to_string(),
            path.to_string(),
        ])
    }
}
