//! Recording test doubles for the runner, the state store and the token service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use auth_handler::{AppCredentials, AppTokenService, AuthError, AuthResult, RepositoryRef};
use secrecy::{ExposeSecret, SecretString};

use crate::errors::Error;
use crate::runner::{ActionRunner, StateStore};

#[derive(Default)]
pub struct MockRunner {
    inputs: HashMap<String, String>,
    pub secrets: Mutex<Vec<String>>,
    pub outputs: Mutex<Vec<(String, String)>>,
    pub exported: Mutex<Vec<(String, String)>>,
    pub infos: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn with_inputs(inputs: &[(&str, &str)]) -> Self {
        Self {
            inputs: inputs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }
}

impl ActionRunner for MockRunner {
    fn get_input(&self, name: &str) -> String {
        self.inputs.get(name).cloned().unwrap_or_default()
    }

    fn set_secret(&self, secret: &str) {
        self.secrets.lock().unwrap().push(secret.to_string());
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), Error> {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<(), Error> {
        self.exported
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct MockState {
    values: Mutex<HashMap<String, String>>,
    pub saved: Mutex<Vec<(String, String)>>,
}

impl MockState {
    pub fn with_value(key: &str, value: &str) -> Self {
        let state = Self::default();
        state
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        state
    }
}

impl StateStore for MockState {
    fn get(&self, key: &str) -> String {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.saved
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What the mocked token exchange does.
#[derive(Clone)]
pub enum Exchange {
    Token(&'static str),
    NoToken,
    Fail(&'static str),
    Panic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Org(String),
    Repo(RepositoryRef),
    AppSlug(u64),
    UserId { login: String, token: String },
    Revoke(String),
}

pub struct MockTokenService {
    exchange: Exchange,
    revoke_error: Option<&'static str>,
    slug: &'static str,
    user_id: u64,
    pub calls: Mutex<Vec<Call>>,
}

impl MockTokenService {
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            revoke_error: None,
            slug: "electron-bot",
            user_id: 987654,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_revocation(message: &'static str) -> Self {
        Self {
            revoke_error: Some(message),
            ..Self::new(Exchange::NoToken)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn exchange(&self) -> AuthResult<Option<SecretString>> {
        match &self.exchange {
            Exchange::Token(token) => Ok(Some(SecretString::from(*token))),
            Exchange::NoToken => Ok(None),
            Exchange::Fail(message) => Err(AuthError::GitHubError(message.to_string())),
            Exchange::Panic => panic!("token exchange blew up"),
        }
    }
}

#[async_trait]
impl AppTokenService for MockTokenService {
    async fn get_installation_token_for_org(
        &self,
        org_name: &str,
        _credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Org(org_name.to_string()));
        self.exchange()
    }

    async fn get_installation_token_for_repo(
        &self,
        repository: &RepositoryRef,
        _credentials: &AppCredentials,
    ) -> AuthResult<Option<SecretString>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Repo(repository.clone()));
        self.exchange()
    }

    async fn get_app_slug(&self, credentials: &AppCredentials) -> AuthResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::AppSlug(credentials.app_id()));
        Ok(self.slug.to_string())
    }

    async fn get_user_id(&self, login: &str, token: &SecretString) -> AuthResult<u64> {
        self.calls.lock().unwrap().push(Call::UserId {
            login: login.to_string(),
            token: token.expose_secret().to_string(),
        });
        Ok(self.user_id)
    }

    async fn revoke_installation_token(&self, token: &SecretString) -> AuthResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Revoke(token.expose_secret().to_string()));
        match self.revoke_error {
            Some(message) => Err(AuthError::GitHubError(message.to_string())),
            None => Ok(()),
        }
    }
}

/// A valid `creds` input for App 12345.
pub fn test_creds() -> String {
    AppCredentials::new(12345, "private").to_bundle()
}
