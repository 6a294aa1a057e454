//! Override resolution helpers.
//!
//! Certificate-level values win over global values; a caller-supplied
//! compiled-in default applies when neither is set. The rules are
//! type-specific: an empty string counts as "not set", while optional
//! booleans and integers win whenever they are `Some`, *including*
//! `Some(false)` and `Some(0)` — a certificate must be able to explicitly
//! disable something the globals enable.

use certman_config::{Certificate, Globals};

/// Authenticator used when neither the certificate nor the globals name one.
pub const DEFAULT_AUTHENTICATOR: &str = "webroot";

/// Resolve a string setting; empty strings are treated as absent.
pub fn string<'a>(cert: Option<&'a str>, global: Option<&'a str>) -> Option<&'a str> {
    cert.filter(|s| !s.is_empty())
        .or_else(|| global.filter(|s| !s.is_empty()))
}

/// [`string`] with a compiled-in fallback.
pub fn string_or<'a>(cert: Option<&'a str>, global: Option<&'a str>, default: &'a str) -> &'a str {
    string(cert, global).unwrap_or(default)
}

/// Resolve an optional boolean. The certificate value wins whenever present,
/// regardless of whether it is `true` or `false`.
pub fn boolean(cert: Option<bool>, global: Option<bool>) -> Option<bool> {
    cert.or(global)
}

/// Resolve an optional integer. The certificate value wins whenever present,
/// including an explicit zero.
pub fn integer(cert: Option<i64>, global: Option<i64>) -> Option<i64> {
    cert.or(global)
}

/// Resolve the challenge-method name for a certificate.
pub fn authenticator_name<'a>(cert: &'a Certificate, globals: &'a Globals) -> &'a str {
    string_or(
        cert.common.authenticator.as_deref(),
        globals.common.authenticator.as_deref(),
        DEFAULT_AUTHENTICATOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use certman_config::CommonSettings;
    use proptest::prelude::*;

    #[test]
    fn test_string_empty_is_absent() {
        assert_eq!(string(Some(""), Some("global")), Some("global"));
        assert_eq!(string(Some("cert"), Some("global")), Some("cert"));
        assert_eq!(string(None, Some("")), None);
        assert_eq!(string(None, None), None);
        assert_eq!(string_or(Some(""), None, "fallback"), "fallback");
    }

    #[test]
    fn test_boolean_explicit_false_wins() {
        // The whole point of Option<bool>: a certificate that explicitly
        // disables staging must beat globals that enable it.
        assert_eq!(boolean(Some(false), Some(true)), Some(false));
        assert_eq!(boolean(None, Some(true)), Some(true));
        assert_eq!(boolean(None, None), None);
    }

    #[test]
    fn test_integer_explicit_zero_wins() {
        assert_eq!(integer(Some(0), Some(60)), Some(0));
        assert_eq!(integer(None, Some(60)), Some(60));
        assert_eq!(integer(None, None), None);
    }

    #[test]
    fn test_authenticator_name_default() {
        let cert = Certificate::default();
        let globals = Globals::default();
        assert_eq!(authenticator_name(&cert, &globals), DEFAULT_AUTHENTICATOR);

        let globals = Globals {
            common: CommonSettings {
                authenticator: Some("dns-cloudflare".to_string()),
                ..CommonSettings::default()
            },
            ..Globals::default()
        };
        assert_eq!(authenticator_name(&cert, &globals), "dns-cloudflare");

        let cert = Certificate {
            common: CommonSettings {
                authenticator: Some("webroot".to_string()),
                ..CommonSettings::default()
            },
            ..Certificate::default()
        };
        assert_eq!(authenticator_name(&cert, &globals), "webroot");
    }

    proptest! {
        // Certificate override wins whenever present, regardless of value;
        // fallback to the global only when the certificate field is absent.
        #[test]
        fn prop_boolean_precedence(
            cert in proptest::option::of(any::<bool>()),
            global in proptest::option::of(any::<bool>()),
        ) {
            let resolved = boolean(cert, global);
            match cert {
                Some(v) => prop_assert_eq!(resolved, Some(v)),
                None => prop_assert_eq!(resolved, global),
            }
        }

        #[test]
        fn prop_integer_precedence(
            cert in proptest::option::of(any::<i64>()),
            global in proptest::option::of(any::<i64>()),
        ) {
            let resolved = integer(cert, global);
            match cert {
                Some(v) => prop_assert_eq!(resolved, Some(v)),
                None => prop_assert_eq!(resolved, global),
            }
        }
    }
}
