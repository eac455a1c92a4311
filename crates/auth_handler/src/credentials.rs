//! GitHub App credentials bundle.
//!
//! The `creds` input carries the App ID and private key as a single string: the
//! base64 encoding of `{"appId": ..., "privateKey": "..."}`. The App ID may be
//! a JSON number or a numeric string.

use std::fmt;

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{AuthError, AuthResult};

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;

/// Accepts bundles with or without `=` padding.
const BUNDLE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Deserialize)]
#[serde(untagged)]
enum AppIdValue {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBundle {
    app_id: AppIdValue,
    private_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBundleRef<'a> {
    app_id: u64,
    private_key: &'a str,
}

/// The identifying material of a GitHub App.
pub struct AppCredentials {
    app_id: u64,
    private_key: SecretString,
}

impl AppCredentials {
    /// Create credentials from an App ID and a PEM encoded private key
    pub fn new(app_id: u64, private_key: impl Into<String>) -> Self {
        Self {
            app_id,
            private_key: SecretString::from(private_key.into()),
        }
    }

    /// Parse a base64 encoded credentials bundle
    ///
    /// Whitespace anywhere in the bundle is ignored and padding is optional.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` if the bundle is not valid
    /// base64, is not the expected JSON document, or has a non-numeric App ID
    pub fn from_bundle(bundle: &str) -> AuthResult<Self> {
        // Bundles are often stored line-wrapped.
        let compact: String = bundle
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let decoded = BUNDLE_ENGINE
            .decode(compact)
            .map_err(|e| AuthError::InvalidCredentials(format!("not valid base64: {}", e)))?;

        let parsed: CredentialsBundle = serde_json::from_slice(&decoded)
            .map_err(|e| AuthError::InvalidCredentials(format!("not a valid bundle: {}", e)))?;

        let app_id = match parsed.app_id {
            AppIdValue::Number(id) => id,
            AppIdValue::Text(text) => text.trim().parse().map_err(|_| {
                AuthError::InvalidCredentials(format!("App ID '{}' is not a number", text))
            })?,
        };

        Ok(Self::new(app_id, parsed.private_key))
    }

    /// Encode the credentials as a base64 bundle accepted by [`Self::from_bundle`]
    pub fn to_bundle(&self) -> String {
        let bundle = CredentialsBundleRef {
            app_id: self.app_id,
            private_key: self.private_key.expose_secret(),
        };
        // Serializing a struct of a number and a string cannot fail.
        let json = serde_json::to_vec(&bundle).unwrap_or_default();
        STANDARD.encode(json)
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn private_key(&self) -> &SecretString {
        &self.private_key
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("private_key", &"<REDACTED>")
            .finish()
    }
}
