//! Git identity of the App's bot account.
//!
//! Commits made with an installation token are attributed to the App's bot
//! user, `<slug>[bot]`. GitHub links a commit to that account when the
//! author email is the account's noreply address.

use auth_handler::{AppCredentials, AppTokenService};
use secrecy::SecretString;
use tracing::{info, instrument};

use crate::errors::Error;
use crate::runner::ActionRunner;

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

pub const GIT_AUTHOR_NAME: &str = "GIT_AUTHOR_NAME";
pub const GIT_AUTHOR_EMAIL: &str = "GIT_AUTHOR_EMAIL";
pub const GIT_COMMITTER_NAME: &str = "GIT_COMMITTER_NAME";
pub const GIT_COMMITTER_EMAIL: &str = "GIT_COMMITTER_EMAIL";

/// Name and email git should use for the App's bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub name: String,
    pub email: String,
}

impl BotIdentity {
    pub fn new(slug: &str, user_id: u64) -> Self {
        let name = bot_login(slug);
        let email = format!("{}+{}@users.noreply.github.com", user_id, name);
        Self { name, email }
    }

    /// The git environment variables for this identity.
    pub fn env_vars(&self) -> [(&'static str, &str); 4] {
        [
            (GIT_AUTHOR_NAME, self.name.as_str()),
            (GIT_AUTHOR_EMAIL, self.email.as_str()),
            (GIT_COMMITTER_NAME, self.name.as_str()),
            (GIT_COMMITTER_EMAIL, self.email.as_str()),
        ]
    }
}

/// Login of the bot account belonging to the App with the given slug.
pub fn bot_login(slug: &str) -> String {
    format!("{}[bot]", slug)
}

/// Looks up the App's bot account and exports its git identity to the
/// remaining steps of the job.
#[instrument(skip_all)]
pub async fn export_git_identity<R, A>(
    runner: &R,
    auth: &A,
    credentials: &AppCredentials,
    token: &SecretString,
) -> Result<BotIdentity, Error>
where
    R: ActionRunner + ?Sized,
    A: AppTokenService + ?Sized,
{
    let slug = auth.get_app_slug(credentials).await?;
    let user_id = auth.get_user_id(&bot_login(&slug), token).await?;

    let identity = BotIdentity::new(&slug, user_id);
    for (name, value) in identity.env_vars() {
        runner.export_variable(name, value)?;
    }

    info!(
        name = identity.name,
        email = identity.email,
        "Exported git identity"
    );
    Ok(identity)
}
