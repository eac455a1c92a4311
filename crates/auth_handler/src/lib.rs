//! Authentication handler for the GitHub App token action
//!
//! This crate owns everything the action needs to act as a GitHub App: parsing
//! the App credentials bundle, minting installation access tokens for an
//! organization or a repository, looking up the App's bot account, and revoking
//! tokens again.
//!
//! ## Architecture
//!
//! The action logic depends on the [`AppTokenService`] trait only:
//! - The action phases call the trait and never touch the REST client directly
//! - [`GitHubAuthService`] implements the trait on top of `github_client`
//! - The binary wires the two together

use std::fmt;

use async_trait::async_trait;
use secrecy::SecretString;

mod credentials;
mod github_auth_service;

pub use credentials::AppCredentials;
pub use github_auth_service::GitHubAuthService;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while authenticating as a GitHub App
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credentials bundle could not be decoded, or the private key it
    /// contains was rejected.
    #[error("Invalid App credentials: {0}")]
    InvalidCredentials(String),

    /// A GitHub API call failed. Displays as the message returned by GitHub.
    #[error("{0}")]
    GitHubError(String),
}

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The target an installation access token is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenScope {
    /// Every repository the App can access in the organization.
    Organization { name: String },

    /// A single repository.
    Repository(RepositoryRef),
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenScope::Organization { name } => write!(f, "organization '{}'", name),
            TokenScope::Repository(repo) => write!(f, "repository '{}'", repo),
        }
    }
}

/// Installation token service interface
///
/// Mints, inspects and revokes GitHub App installation access tokens.
#[async_trait]
pub trait AppTokenService: Send + Sync {
    /// Get an installation token for an organization
    ///
    /// # Returns
    /// `None` when the App is not installed on the organization
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` if the App key is unusable and
    /// `AuthError::GitHubError` if the GitHub API fails
    async fn get_installation_token_for_org(
        &self,
        org_name: &str,
        credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>>;

    /// Get an installation token for a single repository
    ///
    /// # Returns
    /// `None` when the App is not installed on the repository
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` if the App key is unusable and
    /// `AuthError::GitHubError` if the GitHub API fails
    async fn get_installation_token_for_repo(
        &self,
        repository: &RepositoryRef,
        credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>>;

    /// Get the slug of the App the credentials belong to
    async fn get_app_slug(&self, credentials: &AppCredentials) -> AuthResult<String>;

    /// Look up the numeric ID of a user, authenticating with `token`
    async fn get_user_id(&self, login: &str, token: &SecretString) -> AuthResult<u64>;

    /// Revoke an installation token, authenticating with the token itself
    async fn revoke_installation_token(&self, token: &SecretString) -> AuthResult<()>;

    /// Get an installation token for whichever scope was selected
    async fn get_installation_token(
        &self,
        scope: &TokenScope,
        credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>> {
        match scope {
            TokenScope::Organization { name } => {
                self.get_installation_token_for_org(name, credentials).await
            }
            TokenScope::Repository(repository) => {
                self.get_installation_token_for_repo(repository, credentials)
                    .await
            }
        }
    }
}
