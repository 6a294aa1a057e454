//! Configuration loading and validation for the certman certbot supervisor.
//!
//! Configuration is layered, lowest precedence first:
//!
//! 1. compiled-in defaults
//! 2. the TOML configuration file
//! 3. `CERTBOT_MANAGER_GLOBALS_*` environment variables (see [`envvars`])
//!
//! Process-level settings (config file path, certbot executable path, log
//! level) live on the CLI surface instead, where flag > environment >
//! default precedence is handled by clap.
//!
//! The model is immutable after [`Config::load`] returns: nothing in the
//! process mutates settings once they are validated.

mod envvars;
mod error;
mod validate;

use std::path::Path;

use serde::Deserialize;

pub use error::ConfigError;
pub use validate::{is_valid_command, ALLOWED_COMMANDS};

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Default certbot executable (resolved on `PATH`).
pub const DEFAULT_CERTBOT_PATH: &str = "certbot";

/// Default log verbosity.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default certbot command mode.
pub const DEFAULT_CMD: &str = "certonly";

/// Settings shared by the global section and every certificate block.
///
/// Every field is optional. Optional booleans and integers are `Option<_>`
/// rather than bare primitives so that "not set" stays distinguishable from
/// an explicit `false` / `0` override; collapsing the two would break the
/// certificate-over-global precedence rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonSettings {
    /// Certbot command mode; must be one of [`ALLOWED_COMMANDS`] when set.
    pub cmd: Option<String>,
    /// Contact email for ACME registration.
    pub email: Option<String>,
    /// Webroot directory for the `webroot` authenticator.
    pub webroot_path: Option<String>,
    /// Request against the staging ACME endpoint.
    pub staging: Option<bool>,
    /// Suppress sharing the contact email with the EFF.
    pub no_eff_email: Option<bool>,
    /// Key type passed through to certbot (e.g. `ecdsa`, `rsa`).
    pub key_type: Option<String>,
    /// Force renewal on the initial run instead of keeping a valid cert.
    pub initial_force_renewal: Option<bool>,
    /// Free-form extra argument appended verbatim as a single token.
    pub args: Option<String>,
    /// Challenge method name (e.g. `webroot`, `dns-cloudflare`).
    pub authenticator: Option<String>,
    /// Seconds to wait for DNS propagation (only used by dns-* authenticators).
    pub dns_propagation_seconds: Option<i64>,
    /// Path to a Cloudflare API credentials file.
    pub cloudflare_credentials_path: Option<String>,
    /// DuckDNS API token; falls back to the `DUCKDNS_TOKEN` env var.
    pub duckdns_token: Option<String>,
}

/// Global defaults applied to every certificate that does not override them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Globals {
    /// Cron expression (seconds resolution) for the recurring renewal check.
    /// Required: an empty value is a fatal configuration error.
    #[serde(default)]
    pub renewal_cron: String,
    #[serde(flatten)]
    pub common: CommonSettings,
}

/// One declared certificate request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Certificate {
    /// Domains covered by this certificate, in declaration order.
    /// Duplicates are passed through to certbot unchanged.
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(flatten)]
    pub common: CommonSettings,
}

/// Fully loaded and validated application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub globals: Globals,
    /// `[[certificate]]` blocks; may be empty, in which case there is
    /// nothing to issue or schedule.
    #[serde(default, rename = "certificate")]
    pub certificates: Vec<Certificate>,
}

impl Config {
    /// Load configuration from `path`, apply environment overrides, and
    /// validate the result.
    ///
    /// Fails fast if the file is missing, unparseable, the renewal cron
    /// expression is empty, or any configured command mode is unknown.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let builder = config::Config::builder()
            .set_default("globals.cmd", DEFAULT_CMD)?
            .add_source(config::File::from(path).format(config::FileFormat::Toml));
        let builder = envvars::apply_global_overrides(builder)?;

        let config: Config = builder.build()?.try_deserialize()?;
        validate::validate(&config)?;

        tracing::debug!(
            path = %path.display(),
            certificates = config.certificates.len(),
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // `Config::load` reads CERTBOT_MANAGER_GLOBALS_* from the shared process
    // environment, so every test that loads must serialize here: a test
    // mutating those variables would otherwise flip the assertions of a
    // sibling loading concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let _env = env_guard();
        let file = write_config(
            r#"
            [globals]
            renewal_cron = "0 30 3 * * *"
            email = "ops@example.com"
            authenticator = "webroot"
            webroot_path = "/var/www/acme"
            staging = true

            [[certificate]]
            domains = ["example.com", "www.example.com"]
            staging = false
            key_type = "ecdsa"

            [[certificate]]
            domains = ["dyn.example.org"]
            authenticator = "dns-duckdns"
            dns_propagation_seconds = 120
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.globals.renewal_cron, "0 30 3 * * *");
        assert_eq!(config.globals.common.email.as_deref(), Some("ops@example.com"));
        assert_eq!(config.globals.common.staging, Some(true));
        assert_eq!(config.certificates.len(), 2);

        let first = &config.certificates[0];
        assert_eq!(first.domains, vec!["example.com", "www.example.com"]);
        // Explicit false must survive as Some(false), not collapse to unset.
        assert_eq!(first.common.staging, Some(false));
        assert_eq!(first.common.key_type.as_deref(), Some("ecdsa"));

        let second = &config.certificates[1];
        assert_eq!(second.common.authenticator.as_deref(), Some("dns-duckdns"));
        assert_eq!(second.common.dns_propagation_seconds, Some(120));
    }

    #[test]
    fn test_default_cmd_applied() {
        let _env = env_guard();
        let file = write_config(
            r#"
            [globals]
            renewal_cron = "0 0 3 * * *"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.globals.common.cmd.as_deref(), Some(DEFAULT_CMD));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let _env = env_guard();
        let err = Config::load(Path::new("/nonexistent/certman.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_renewal_cron_is_fatal() {
        let _env = env_guard();
        let file = write_config(
            r#"
            [globals]
            email = "ops@example.com"
            "#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRenewalCron));
    }

    #[test]
    fn test_unknown_cmd_is_fatal() {
        let _env = env_guard();
        let file = write_config(
            r#"
            [globals]
            renewal_cron = "0 0 3 * * *"

            [[certificate]]
            domains = ["example.com"]
            cmd = "install"
            "#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCommand { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let _env = env_guard();
        let file = write_config(
            r#"
            [globals]
            renewal_cron = "0 0 3 * * *"
            email = "file@example.com"
            staging = true
            "#,
        );

        // Environment values beat file values, including typed ones.
        std::env::set_var("CERTBOT_MANAGER_GLOBALS_EMAIL", "env@example.com");
        std::env::set_var("CERTBOT_MANAGER_GLOBALS_STAGING", "false");
        std::env::set_var("CERTBOT_MANAGER_GLOBALS_DNS_PROPAGATION_SECONDS", "45");
        let result = Config::load(file.path());
        std::env::remove_var("CERTBOT_MANAGER_GLOBALS_EMAIL");
        std::env::remove_var("CERTBOT_MANAGER_GLOBALS_STAGING");
        std::env::remove_var("CERTBOT_MANAGER_GLOBALS_DNS_PROPAGATION_SECONDS");

        let config = result.unwrap();
        assert_eq!(config.globals.common.email.as_deref(), Some("env@example.com"));
        assert_eq!(config.globals.common.staging, Some(false));
        assert_eq!(config.globals.common.dns_propagation_seconds, Some(45));

        // A value of the wrong type is a fatal configuration error.
        std::env::set_var("CERTBOT_MANAGER_GLOBALS_NO_EFF_EMAIL", "yes-please");
        let result = Config::load(file.path());
        std::env::remove_var("CERTBOT_MANAGER_GLOBALS_NO_EFF_EMAIL");

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvValue { expected: "boolean", .. }));
    }

    #[test]
    fn test_concurrent_loads_see_only_their_own_env() {
        let handles: Vec<_> = ["alpha@example.com", "beta@example.com"]
            .into_iter()
            .map(|email| {
                std::thread::spawn(move || {
                    let _env = env_guard();
                    let file = write_config(
                        r#"
                        [globals]
                        renewal_cron = "0 0 3 * * *"
                        email = "file@example.com"
                        "#,
                    );
                    std::env::set_var("CERTBOT_MANAGER_GLOBALS_EMAIL", email);
                    let result = Config::load(file.path());
                    std::env::remove_var("CERTBOT_MANAGER_GLOBALS_EMAIL");
                    (email, result)
                })
            })
            .collect();

        for handle in handles {
            let (email, result) = handle.join().unwrap();
            let config = result.unwrap();
            // Each load must observe exactly the value its own thread set.
            assert_eq!(config.globals.common.email.as_deref(), Some(email));
        }
    }
}
