//! Secret values and where they come from.

use std::env;
use std::fmt;

#[cfg(test)]
use mockall::automock;

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value. Only call this where the value leaves the process.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Source of credentials. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait SecretSource {
    /// Look up the value stored under `variable`, if any.
    fn lookup(&self, variable: &str) -> Option<String>;
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn lookup(&self, variable: &str) -> Option<String> {
        env::var(variable).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::new("service-role-key");
        assert_eq!(format!("{:?}", secret), "Secret(***)");
        assert_eq!(secret.expose(), "service-role-key");
    }

    #[test]
    fn whitespace_only_secret_is_blank() {
        assert!(Secret::new("   ").is_blank());
        assert!(Secret::new("").is_blank());
        assert!(!Secret::new("k").is_blank());
    }
}
