//! The argument builder: one certificate in, one ordered argument vector out.

use certman_config::{is_valid_command, Certificate, Globals, DEFAULT_CMD};

use crate::authenticators::AuthenticatorRegistry;
use crate::error::BuildError;
use crate::flags::FlagRegistry;
use crate::resolve;

/// Assembles the full certbot argument vector for a single certificate.
///
/// Holds only borrowed context; all state lives in the configuration and
/// the registries, so repeated builds over the same inputs are
/// byte-identical.
pub struct ArgsBuilder<'a> {
    cert: &'a Certificate,
    globals: &'a Globals,
    flags: &'a FlagRegistry,
    authenticators: &'a AuthenticatorRegistry,
}

impl<'a> ArgsBuilder<'a> {
    pub fn new(
        cert: &'a Certificate,
        globals: &'a Globals,
        flags: &'a FlagRegistry,
        authenticators: &'a AuthenticatorRegistry,
    ) -> Self {
        Self {
            cert,
            globals,
            flags,
            authenticators,
        }
    }

    /// Build the ordered argument vector:
    ///
    /// 1. reject a certificate without domains, before any generator runs
    /// 2. fixed base (`certonly --non-interactive`) after validating the
    ///    configured command mode against the allow-list
    /// 3. every flag generator, in registration order
    /// 4. the resolved authenticator's arguments
    /// 5. `-d <domain>` per domain, in declaration order
    pub fn build(&self) -> Result<Vec<String>, BuildError> {
        if self.cert.domains.is_empty() {
            return Err(BuildError::NoDomains);
        }

        // The configured command must be on the allow-list even though the
        // emitted base is fixed: certman always runs one non-interactive
        // certonly invocation per certificate.
        let cmd = resolve::string_or(
            self.cert.common.cmd.as_deref(),
            self.globals.common.cmd.as_deref(),
            DEFAULT_CMD,
        );
        if !is_valid_command(cmd) {
            return Err(BuildError::UnknownCommand(cmd.to_string()));
        }

        let mut args = vec!["certonly".to_string(), "--non-interactive".to_string()];

        for generator in self.flags.iter() {
            let flag_args = generator
                .generate(self.cert, self.globals)
                .map_err(|source| BuildError::Flag {
                    generator: generator.name(),
                    domains: self.cert.domains.clone(),
                    source,
                })?;
            args.extend(flag_args);
        }

        let name = resolve::authenticator_name(self.cert, self.globals);
        let authenticator =
            self.authenticators
                .get(name)
                .map_err(|source| BuildError::Authenticator {
                    name: name.to_string(),
                    domains: self.cert.domains.clone(),
                    source,
                })?;
        let auth_args =
            authenticator
                .build_args(self.cert, self.globals)
                .map_err(|source| BuildError::Authenticator {
                    name: name.to_string(),
                    domains: self.cert.domains.clone(),
                    source,
                })?;
        args.extend(auth_args);

        for domain in &self.cert.domains {
            args.push("-d".to_string());
            args.push(domain.clone());
        }

        Ok(args)
    }
}
