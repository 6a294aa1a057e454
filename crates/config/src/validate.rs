//! Load-time configuration validation.
//!
//! Everything rejected here is fatal at startup, before any certificate is
//! processed. Per-certificate problems that only matter when building
//! arguments (missing email, missing webroot path) are detected later by the
//! argument builder so that one broken certificate does not block the rest.

use crate::{Config, ConfigError};

/// Command modes certbot is allowed to run in.
pub const ALLOWED_COMMANDS: &[&str] = &["certonly", "run"];

/// Returns true when `cmd` is in the allow-list.
pub fn is_valid_command(cmd: &str) -> bool {
    ALLOWED_COMMANDS.contains(&cmd)
}

pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.globals.renewal_cron.trim().is_empty() {
        return Err(ConfigError::MissingRenewalCron);
    }

    check_cmd(config.globals.common.cmd.as_deref(), "globals")?;
    for (i, cert) in config.certificates.iter().enumerate() {
        check_cmd(cert.common.cmd.as_deref(), &format!("certificate #{}", i + 1))?;
    }

    Ok(())
}

// Empty string means "not set" and falls through to the default, so only
// non-empty values are checked against the allow-list.
fn check_cmd(cmd: Option<&str>, scope: &str) -> Result<(), ConfigError> {
    match cmd {
        Some(cmd) if !cmd.is_empty() && !is_valid_command(cmd) => {
            Err(ConfigError::UnknownCommand {
                cmd: cmd.to_string(),
                scope: scope.to_string(),
            })
        }
        _ => Ok(()),
    }
}
