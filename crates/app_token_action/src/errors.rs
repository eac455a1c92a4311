use std::io;

use auth_handler::AuthError;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::debug;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while running the action.
///
/// The display text of each variant is what the workflow run shows when a
/// step fails, so the validation messages are fixed strings.
#[derive(Error, Debug)]
pub enum Error {
    /// The `creds` input is empty.
    #[error("'creds' is a required input")]
    MissingCredentials,

    /// The scope selectors are conflicting or incomplete.
    ///
    /// Returned when `org` is combined with `owner` or `repo`, or when only one
    /// of `owner` and `repo` is given.
    #[error("Invalid inputs")]
    InvalidInputs,

    /// The App is not installed on the requested organization or repository.
    #[error("Could not generate token")]
    TokenNotGenerated,

    /// A boolean input holds something other than a YAML 1.2 core boolean.
    #[error("Input does not meet YAML 1.2 \"Core Schema\" specification: {0}\nSupport boolean input list: `true | True | TRUE | false | False | FALSE`")]
    InvalidBooleanInput(String),

    /// No scope was selected and the job's repository is unknown.
    #[error("context.repo requires a GITHUB_REPOSITORY environment variable like 'owner/repo'")]
    MissingRepository,

    /// A file command entry would be ambiguous because its name or value
    /// contains the generated delimiter.
    #[error("Unexpected input: {0} should not contain the delimiter")]
    DelimiterCollision(&'static str),

    /// Appending to a runner file command failed.
    #[error("Unable to process file command '{command}' successfully: {source}")]
    FileCommand {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Authenticating as the GitHub App or calling GitHub failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// How the outcome of a phase is reported to the runner.
#[derive(Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The phase finished without error.
    Completed,

    /// The phase returned an error; the message is reported to the runner.
    Failed(String),

    /// The phase died without producing an error value. Nothing is reported.
    Suppressed,
}

/// Decides how the outcome of a phase task is reported.
///
/// Errors returned by the phase are reported with their display text. A task
/// that panicked or was cancelled has no error value to report and is
/// suppressed: the runner sees neither a failure nor a warning.
pub fn classify(outcome: Result<Result<(), Error>, JoinError>) -> Disposition {
    match outcome {
        Ok(Ok(())) => Disposition::Completed,
        Ok(Err(e)) => Disposition::Failed(e.to_string()),
        Err(join_error) => {
            debug!(
                panicked = join_error.is_panic(),
                "Phase task ended without a result"
            );
            Disposition::Suppressed
        }
    }
}
