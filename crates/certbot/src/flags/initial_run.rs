//! Initial-run renewal policy: force or keep.

use certman_config::{Certificate, Globals};

use crate::error::FlagError;
use crate::resolve;

use super::FlagGenerator;

/// Emits exactly one of `--force-renewal` or `--keep-until-expiring`.
///
/// Forcing is opt-in; the default keeps a still-valid certificate so that
/// restarting the supervisor never burns rate limits on needless reissues.
pub struct InitialRunFlag;

impl FlagGenerator for InitialRunFlag {
    fn name(&self) -> &'static str {
        "initial-run"
    }

    fn generate(&self, cert: &Certificate, globals: &Globals) -> Result<Vec<String>, FlagError> {
        let force = resolve::boolean(
            cert.common.initial_force_renewal,
            globals.common.initial_force_renewal,
        );
        if force == Some(true) {
            Ok(vec!["--force-renewal".to_string()])
        } else {
            Ok(vec!["--keep-until-expiring".to_string()])
        }
    }
}
