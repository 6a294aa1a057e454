//! Environment-variable override layer.
//!
//! Every known global key can be overridden with
//! `CERTBOT_MANAGER_GLOBALS_<KEY>` (e.g. `CERTBOT_MANAGER_GLOBALS_EMAIL`,
//! `CERTBOT_MANAGER_GLOBALS_WEBROOT_PATH`). Keys are bound explicitly rather
//! than discovered from the variable name, because underscores inside key
//! names (`webroot_path`) are ambiguous with the nesting separator.
//!
//! `[[certificate]]` blocks are file-only; there is no per-element
//! environment binding for arrays.

use config::builder::{ConfigBuilder, DefaultState};

use crate::ConfigError;

const ENV_PREFIX: &str = "CERTBOT_MANAGER";

/// Value type an override variable is parsed as before entering the
/// config layer. Booleans and integers must be parsed here: string values
/// would not survive deserialization into `Option<bool>` / `Option<i64>`.
#[derive(Clone, Copy)]
enum Kind {
    Str,
    Bool,
    Int,
}

/// Every overridable `globals.*` key and its type.
const GLOBAL_KEYS: &[(&str, Kind)] = &[
    ("renewal_cron", Kind::Str),
    ("cmd", Kind::Str),
    ("email", Kind::Str),
    ("webroot_path", Kind::Str),
    ("staging", Kind::Bool),
    ("no_eff_email", Kind::Bool),
    ("key_type", Kind::Str),
    ("initial_force_renewal", Kind::Bool),
    ("args", Kind::Str),
    ("authenticator", Kind::Str),
    ("dns_propagation_seconds", Kind::Int),
    ("cloudflare_credentials_path", Kind::Str),
    ("duckdns_token", Kind::Str),
];

/// Apply any `CERTBOT_MANAGER_GLOBALS_*` variables present in the process
/// environment as overrides on top of the file source.
pub(crate) fn apply_global_overrides(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (key, kind) in GLOBAL_KEYS {
        let var = format!("{ENV_PREFIX}_GLOBALS_{}", key.to_uppercase());
        let Ok(raw) = std::env::var(&var) else {
            continue;
        };
        let path = format!("globals.{key}");
        builder = match kind {
            Kind::Str => builder.set_override(path, raw)?,
            Kind::Bool => {
                let value: bool = raw.parse().map_err(|_| ConfigError::InvalidEnvValue {
                    var: var.clone(),
                    expected: "boolean",
                    value: raw.clone(),
                })?;
                builder.set_override(path, value)?
            }
            Kind::Int => {
                let value: i64 = raw.parse().map_err(|_| ConfigError::InvalidEnvValue {
                    var: var.clone(),
                    expected: "integer",
                    value: raw.clone(),
                })?;
                builder.set_override(path, value)?
            }
        };
    }
    Ok(builder)
}
