//! Free-form extra arguments.

use certman_config::{Certificate, Globals};

use crate::error::FlagError;

use super::FlagGenerator;

/// Appends a certificate's `args` string as one opaque token.
///
/// No splitting or quoting is applied; the value reaches certbot exactly as
/// written. Certificate-level only — a global `args` value is ignored.
pub struct CustomArgsFlag;

impl FlagGenerator for CustomArgsFlag {
    fn name(&self) -> &'static str {
        "custom-args"
    }

    fn generate(&self, cert: &Certificate, _globals: &Globals) -> Result<Vec<String>, FlagError> {
        match cert.common.args.as_deref() {
            Some(args) if !args.is_empty() => Ok(vec![args.to_string()]),
            _ => Ok(Vec::new()),
        }
    }
}
