//! The simple resolved-value flag generators.

use certman_config::{Certificate, Globals};

use crate::error::FlagError;
use crate::resolve;

use super::FlagGenerator;

/// `--email <address>`; the address is mandatory for unattended runs.
pub struct EmailFlag;

impl FlagGenerator for EmailFlag {
    fn name(&self) -> &'static str {
        "email"
    }

    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError> {
        let email = resolve::string(cert.common.email.as_deref(), globals.common.email.as_deref())
            .ok_or(FlagError::MissingEmail)?;
        Ok(vec!["--email".to_string(), email.to_string()])
    }
}

/// `--agree-tos`, unconditionally. Automation requires it.
pub struct AgreeTosFlag;

impl FlagGenerator for AgreeTosFlag {
    fn name(&self) -> &'static str {
        "agree-tos"
    }

    fn generate(&self, _cert: &Certificate, _globals: &Globals) -> Result<Vec<String>, FlagError> {
        Ok(vec!["--agree-tos".to_string()])
    }
}

/// `--staging` when the resolved value is an explicit `true`.
pub struct StagingFlag;

impl FlagGenerator for StagingFlag {
    fn name(&self) -> &'static str {
        "staging"
    }

    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError> {
        if resolve::boolean(cert.common.staging, globals.common.staging) == Some(true) {
            Ok(vec!["--staging".to_string()])
        } else {
            Ok(Vec::new())
        }
    }
}

/// `--no-eff-email` when the resolved value is an explicit `true`.
pub struct NoEffEmailFlag;

impl FlagGenerator for NoEffEmailFlag {
    fn name(&self) -> &'static str {
        "no-eff-email"
    }

    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError> {
        if resolve::boolean(cert.common.no_eff_email, globals.common.no_eff_email) == Some(true) {
            Ok(vec!["--no-eff-email".to_string()])
        } else {
            Ok(Vec::new())
        }
    }
}

/// `--key-type <type>` when a key type is configured.
pub struct KeyTypeFlag;

impl FlagGenerator for KeyTypeFlag {
    fn name(&self) -> &'static str {
        "key-type"
    }

    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError> {
        match resolve::string(
            cert.common.key_type.as_deref(),
            globals.common.key_type.as_deref(),
        ) {
            Some(key_type) => Ok(vec!["--key-type".to_string(), key_type.to_string()]),
            None => Ok(Vec::new()),
        }
    }
}
