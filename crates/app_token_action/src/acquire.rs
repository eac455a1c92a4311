//! Main step: mint the installation token and publish it.

use std::sync::Arc;

use auth_handler::{AppCredentials, AppTokenService};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

use crate::context::JobContext;
use crate::errors::{classify, Disposition, Error};
use crate::identity::export_git_identity;
use crate::inputs::{resolve_scope, ActionInputs};
use crate::runner::{ActionRunner, StateStore};

#[cfg(test)]
#[path = "acquire_tests.rs"]
mod tests;

/// Output and state key holding the minted token.
pub const TOKEN_KEY: &str = "token";

/// Runs the main step.
///
/// Validates the inputs, mints a token for the resolved scope, masks it,
/// publishes it as the `token` output and saves it for the post step. When
/// `export-git-user` is set the bot's git identity is exported afterwards.
///
/// # Errors
///
/// The first failing stage ends the step; see [`Error`] for the messages.
#[instrument(skip_all)]
pub async fn run<R, S, A>(
    runner: &R,
    state: &S,
    auth: &A,
    context: &JobContext,
) -> Result<(), Error>
where
    R: ActionRunner + ?Sized,
    S: StateStore + ?Sized,
    A: AppTokenService + ?Sized,
{
    let inputs = ActionInputs::read(runner)?;
    let scope = resolve_scope(&inputs, context)?;
    info!(scope = %scope, "Resolved token scope");

    let credentials = AppCredentials::from_bundle(&inputs.creds)?;
    let token = auth
        .get_installation_token(&scope, &credentials)
        .await?
        .ok_or(Error::TokenNotGenerated)?;

    runner.set_secret(token.expose_secret());
    runner.set_output(TOKEN_KEY, token.expose_secret())?;

    // The post step revokes whatever is saved here.
    state.set(TOKEN_KEY, token.expose_secret())?;
    info!(scope = %scope, "Published installation token");

    if inputs.export_git_user {
        export_git_identity(runner, auth, &credentials, &token).await?;
    }

    Ok(())
}

/// Runs the main step in its own task and reports a failure to the runner.
pub async fn main_step<R, S, A>(
    runner: Arc<R>,
    state: Arc<S>,
    auth: Arc<A>,
    context: JobContext,
) -> Disposition
where
    R: ActionRunner + 'static,
    S: StateStore + 'static,
    A: AppTokenService + 'static,
{
    let task = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { run(&*runner, &*state, &*auth, &context).await })
    };

    let disposition = classify(task.await);
    if let Disposition::Failed(message) = &disposition {
        runner.set_failed(message);
    }
    disposition
}
