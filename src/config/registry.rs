//! Environment registry.
//!
//! Pairs the fixed endpoint settings of each environment with the credential
//! found in the secret source. Resolution is a pure lookup and must succeed
//! before any client for that environment is created.

use std::fmt;

use clap::ValueEnum;

use super::error::{ConfigError, ConfigResult};
use super::secret::{Secret, SecretSource};
use super::settings::{Config, EnvironmentSettings};

/// Which side of a promotion an environment plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Role {
    Source,
    Target,
}

impl Role {
    /// Environment variable holding the service key for this role.
    pub fn credential_variable(self) -> &'static str {
        match self {
            Role::Source => "SOURCE_SERVICE_KEY",
            Role::Target => "TARGET_SERVICE_KEY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
        }
    }
}

/// Connection profile of one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub name: String,
    pub endpoint: String,
    pub credential: Secret,
}

/// Resolves environment profiles by role.
pub struct Registry<S: SecretSource> {
    source: EnvironmentSettings,
    target: EnvironmentSettings,
    secrets: S,
}

impl<S: SecretSource> Registry<S> {
    pub fn new(source: EnvironmentSettings, target: EnvironmentSettings, secrets: S) -> Self {
        Self {
            source,
            target,
            secrets,
        }
    }

    pub fn from_config(config: &Config, secrets: S) -> Self {
        Self::new(config.source.clone(), config.target.clone(), secrets)
    }

    /// Resolve the profile for `role`.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when the credential is
    /// unset, empty or whitespace-only.
    pub fn resolve(&self, role: Role) -> ConfigResult<EnvironmentProfile> {
        let settings = match role {
            Role::Source => &self.source,
            Role::Target => &self.target,
        };
        let variable = role.credential_variable();

        let credential = self
            .secrets
            .lookup(variable)
            .map(Secret::new)
            .filter(|secret| !secret.is_blank())
            .ok_or_else(|| ConfigError::MissingCredential {
                role,
                variable: variable.to_string(),
            })?;

        Ok(EnvironmentProfile {
            name: settings.name.clone(),
            endpoint: settings.endpoint.clone(),
            credential,
        })
    }
}
