//! Runner environment captured at process start.
//!
//! The runner hands everything to the action through environment variables:
//! inputs (`INPUT_*`), saved state (`STATE_*`), file command paths and the
//! job context. They are read once into an [`ActionEnvironment`] snapshot so
//! the rest of the action never touches the process environment.

use std::collections::HashMap;
use std::ffi::OsString;

use auth_handler::RepositoryRef;
use github_client::DEFAULT_API_URL;
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Environment variable holding the `owner/name` of the job's repository.
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";

/// Environment variable holding the REST API base URL.
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";

/// A snapshot of the environment variables the runner provides.
#[derive(Debug, Clone, Default)]
pub struct ActionEnvironment {
    vars: HashMap<String, String>,
}

impl ActionEnvironment {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Builds a snapshot from raw variables, skipping any whose name or value
    /// is not valid UTF-8.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (Ok(name), Err(_)) => {
                    debug!(name = name, "Skipping environment variable with non UTF-8 value");
                    None
                }
                (Err(_), _) => {
                    debug!("Skipping environment variable with non UTF-8 name");
                    None
                }
            }
        }))
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of a variable, treating empty values as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Information about the job the action runs in.
#[derive(Debug, Clone)]
pub struct JobContext {
    repository: Option<String>,
    api_url: String,
}

impl JobContext {
    pub fn new(repository: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            repository,
            api_url: api_url.into(),
        }
    }

    pub fn from_environment(environment: &ActionEnvironment) -> Self {
        Self::new(
            environment.get(GITHUB_REPOSITORY).map(str::to_string),
            environment.get(GITHUB_API_URL).unwrap_or(DEFAULT_API_URL),
        )
    }

    /// The repository the job is running in.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingRepository` when `GITHUB_REPOSITORY` is unset or
    /// not of the form `owner/name`.
    pub fn repository(&self) -> Result<RepositoryRef, Error> {
        let value = self.repository.as_deref().ok_or(Error::MissingRepository)?;
        match value.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(RepositoryRef::new(owner, name))
            }
            _ => Err(Error::MissingRepository),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}
