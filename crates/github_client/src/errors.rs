//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when the action talks to the
//! GitHub REST API through the github_client crate.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Failures reported by GitHub itself keep the message GitHub returned so that
/// callers can surface it unchanged to the workflow run.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.revoke_installation_token().await {
///     Ok(()) => println!("Token revoked"),
///     Err(Error::GitHub { status: 401, .. }) => eprintln!("Token already invalid"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The GitHub App private key cannot be parsed
    /// - The API base URL is not a valid URI
    /// - The App or access token client cannot be built
    ///
    /// The contained string provides specific details about the authentication failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// GitHub answered the request with an error status.
    ///
    /// Displays as the message returned by GitHub, e.g. `Bad credentials`.
    #[error("{message}")]
    GitHub {
        /// The HTTP status code of the response
        status: u16,
        /// The error message returned by GitHub
        message: String,
    },

    /// The request could not be completed or its response could not be read.
    ///
    /// Covers transport failures, invalid URIs and responses that do not match
    /// the expected data structure.
    #[error("GitHub API request failed: {0}")]
    Request(String),
}
