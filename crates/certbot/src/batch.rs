//! Initial-batch orchestration.
//!
//! Processes every declared certificate once at startup. Certificates are
//! independent: a build or execution failure for one is logged and counted,
//! and the batch moves on. The caller gates scheduler startup on
//! [`BatchOutcome::is_success`] — unattended renewal never starts on top of
//! a known-broken initial state.

use certman_config::Config;
use tracing::{error, info};

use crate::authenticators::AuthenticatorRegistry;
use crate::builder::ArgsBuilder;
use crate::flags::FlagRegistry;
use crate::runner::CertbotRunner;

/// Result of the initial run across all declared certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Certificates the batch processed (build attempts, not executions).
    pub attempted: usize,
    /// Certificates whose build or execution failed.
    pub failed: usize,
}

impl BatchOutcome {
    /// True only when every certificate built and executed successfully.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Run the initial `certonly` pass over every configured certificate.
pub async fn run_initial_batch(
    config: &Config,
    runner: &CertbotRunner,
    flags: &FlagRegistry,
    authenticators: &AuthenticatorRegistry,
) -> BatchOutcome {
    info!(
        certificates = config.certificates.len(),
        "starting initial certificate processing"
    );
    let mut failed = 0;

    for (i, cert) in config.certificates.iter().enumerate() {
        let request = i + 1;
        info!(request, domains = ?cert.domains, "processing certificate request");

        let builder = ArgsBuilder::new(cert, &config.globals, flags, authenticators);
        let args = match builder.build() {
            Ok(args) => args,
            Err(error) => {
                error!(
                    request,
                    domains = ?cert.domains,
                    %error,
                    "failed to build certbot arguments, skipping"
                );
                failed += 1;
                continue;
            }
        };

        if let Err(error) = runner.run(&args).await {
            error!(
                request,
                domains = ?cert.domains,
                %error,
                "initial certbot run failed"
            );
            failed += 1;
        }
    }

    BatchOutcome {
        attempted: config.certificates.len(),
        failed,
    }
}
