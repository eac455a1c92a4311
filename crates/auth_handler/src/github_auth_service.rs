//! GitHub App authentication service implementation
//!
//! Provides the concrete implementation of `AppTokenService` on top of the
//! `github_client` crate.

use crate::{AppCredentials, AppTokenService, AuthError, AuthResult, RepositoryRef};
use async_trait::async_trait;
use github_client::{
    create_app_client, create_token_client, GitHubClient, Installation, DEFAULT_API_URL,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

#[cfg(test)]
#[path = "github_auth_service_tests.rs"]
mod tests;

/// GitHub App authentication service
///
/// Every call builds a fresh client: App calls are authenticated with a JWT
/// derived from the credentials, token calls with the token passed in.
///
/// # Examples
///
/// ```rust,no_run
/// use auth_handler::{AppCredentials, AppTokenService, GitHubAuthService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let private_key = std::fs::read_to_string("app-key.pem")?;
/// let credentials = AppCredentials::new(12345, private_key);
///
/// let auth_service = GitHubAuthService::new("https://api.github.com");
///
/// if let Some(token) = auth_service
///     .get_installation_token_for_org("my-org", &credentials)
///     .await?
/// {
///     auth_service.revoke_installation_token(&token).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubAuthService {
    api_url: String,
}

impl GitHubAuthService {
    /// Create a new GitHub App authentication service
    ///
    /// # Parameters
    /// - `api_url`: base URL of the GitHub REST API
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    fn app_client(&self, credentials: &AppCredentials) -> AuthResult<GitHubClient> {
        let client = create_app_client(
            credentials.app_id(),
            credentials.private_key().expose_secret(),
            &self.api_url,
        )
        .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;

        Ok(GitHubClient::new(client))
    }

    fn token_client(&self, token: &SecretString) -> AuthResult<GitHubClient> {
        let client = create_token_client(token.expose_secret(), &self.api_url)
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        Ok(GitHubClient::new(client))
    }

    async fn exchange(
        client: &GitHubClient,
        installation: Option<Installation>,
    ) -> AuthResult<Option<SecretString>> {
        let Some(installation) = installation else {
            return Ok(None);
        };

        let token = client
            .create_installation_token(installation.id)
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        Ok(Some(token.token))
    }
}

impl Default for GitHubAuthService {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl AppTokenService for GitHubAuthService {
    #[instrument(skip(self, credentials), fields(app_id = credentials.app_id()))]
    async fn get_installation_token_for_org(
        &self,
        org_name: &str,
        credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>> {
        let client = self.app_client(credentials)?;

        let installation = client
            .get_organization_installation(org_name)
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        if installation.is_none() {
            warn!(org_name = org_name, "GitHub App is not installed on organization");
        }

        let token = Self::exchange(&client, installation).await?;
        info!(
            org_name = org_name,
            minted = token.is_some(),
            "Finished organization token exchange"
        );
        Ok(token)
    }

    #[instrument(skip(self, credentials), fields(app_id = credentials.app_id(), repository = %repository))]
    async fn get_installation_token_for_repo(
        &self,
        repository: &RepositoryRef,
        credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>> {
        let client = self.app_client(credentials)?;

        let installation = client
            .get_repository_installation(&repository.owner, &repository.name)
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        if installation.is_none() {
            warn!(
                repository = %repository,
                "GitHub App is not installed on repository"
            );
        }

        let token = Self::exchange(&client, installation).await?;
        info!(
            repository = %repository,
            minted = token.is_some(),
            "Finished repository token exchange"
        );
        Ok(token)
    }

    #[instrument(skip(self, credentials), fields(app_id = credentials.app_id()))]
    async fn get_app_slug(&self, credentials: &AppCredentials) -> AuthResult<String> {
        let app = self
            .app_client(credentials)?
            .get_authenticated_app()
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        Ok(app.slug)
    }

    #[instrument(skip(self, token))]
    async fn get_user_id(&self, login: &str, token: &SecretString) -> AuthResult<u64> {
        let user = self
            .token_client(token)?
            .get_user(login)
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))?;

        Ok(user.id)
    }

    #[instrument(skip(self, token))]
    async fn revoke_installation_token(&self, token: &SecretString) -> AuthResult<()> {
        self.token_client(token)?
            .revoke_installation_token()
            .await
            .map_err(|e| AuthError::GitHubError(e.to_string()))
    }
}
