//! # Models
//!
//! This module contains the GitHub API data models used by the action.
//!
//! Only the fields the action relies on are modelled; everything else in the
//! GitHub responses is ignored during deserialization.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub account (user or organization).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: u64,
    /// The login name of the account
    pub login: String,
    /// The type of account (User, Organization or Bot)
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Represents a GitHub App installation.
///
/// This struct contains information about where a GitHub App is installed,
/// such as an organization or a single repository owner.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Installation {
    /// The unique ID of the installation
    pub id: u64,
    /// The ID of the GitHub App that owns the installation
    pub app_id: Option<u64>,
    /// The account (user or organization) where the app is installed
    pub account: Option<Account>,
    /// Either `all` or `selected`
    pub repository_selection: Option<String>,
}

/// The authenticated GitHub App, as returned by `GET /app`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct App {
    /// The unique ID of the app
    pub id: u64,
    /// The URL-friendly name of the app
    pub slug: String,
    /// The display name of the app
    pub name: String,
}

/// Represents a GitHub user account.
///
/// For a GitHub App the matching bot account has the login `<slug>[bot]`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct User {
    /// The unique numeric ID of the user
    pub id: u64,
    /// The login name of the user
    pub login: String,
}

/// An installation access token minted for a GitHub App installation.
///
/// The token value is kept behind [`SecretString`] so it never shows up in
/// `Debug` output or log lines.
#[derive(Debug)]
pub struct InstallationToken {
    /// The token value
    pub token: SecretString,
    /// When the token expires, in ISO 8601 format
    pub expires_at: Option<String>,
}
