//! Post step: revoke the token minted by the main step.

use std::sync::Arc;

use auth_handler::AppTokenService;
use secrecy::SecretString;
use tracing::{debug, info, instrument};

use crate::acquire::TOKEN_KEY;
use crate::errors::{classify, Disposition, Error};
use crate::runner::{ActionRunner, StateStore};

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;

/// Revokes the saved token, if the main step saved one.
///
/// # Errors
///
/// Returns the revocation error. The post step reports it as a warning.
#[instrument(skip_all)]
pub async fn run<R, S, A>(runner: &R, state: &S, auth: &A) -> Result<(), Error>
where
    R: ActionRunner + ?Sized,
    S: StateStore + ?Sized,
    A: AppTokenService + ?Sized,
{
    let token = state.get(TOKEN_KEY);
    if token.is_empty() {
        debug!("No token was saved by the main step, nothing to revoke");
        return Ok(());
    }

    auth.revoke_installation_token(&SecretString::from(token))
        .await?;
    runner.info("Token revoked");
    info!("Revoked installation token");
    Ok(())
}

/// Runs the post step in its own task.
///
/// A revocation failure is reported as a warning; the post step never fails
/// the job.
pub async fn post_step<R, S, A>(runner: Arc<R>, state: Arc<S>, auth: Arc<A>) -> Disposition
where
    R: ActionRunner + 'static,
    S: StateStore + 'static,
    A: AppTokenService + 'static,
{
    let task = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { run(&*runner, &*state, &*auth).await })
    };

    let disposition = classify(task.await);
    if let Disposition::Failed(message) = &disposition {
        runner.warning(&format!("Error while revoking token: {}", message));
    }
    disposition
}
