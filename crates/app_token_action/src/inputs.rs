//! Action inputs and scope resolution.

use std::fmt;

use auth_handler::{RepositoryRef, TokenScope};

use crate::context::JobContext;
use crate::errors::Error;
use crate::runner::ActionRunner;

#[cfg(test)]
#[path = "inputs_tests.rs"]
mod tests;

pub const INPUT_CREDS: &str = "creds";
pub const INPUT_ORG: &str = "org";
pub const INPUT_OWNER: &str = "owner";
pub const INPUT_REPO: &str = "repo";
pub const INPUT_EXPORT_GIT_USER: &str = "export-git-user";

const TRUE_VALUES: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_VALUES: [&str; 3] = ["false", "False", "FALSE"];

/// The inputs of the main step.
///
/// Optional string inputs are empty when not set.
#[derive(Clone, Default)]
pub struct ActionInputs {
    pub creds: String,
    pub org: String,
    pub owner: String,
    pub repo: String,
    pub export_git_user: bool,
}

impl ActionInputs {
    /// Reads all inputs from the runner.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredentials` when `creds` is empty, before any
    /// other input is read, and `Error::InvalidBooleanInput` when
    /// `export-git-user` is not a boolean.
    pub fn read<R: ActionRunner + ?Sized>(runner: &R) -> Result<Self, Error> {
        let creds = runner.get_input(INPUT_CREDS);
        if creds.is_empty() {
            return Err(Error::MissingCredentials);
        }

        Ok(Self {
            creds,
            org: runner.get_input(INPUT_ORG),
            owner: runner.get_input(INPUT_OWNER),
            repo: runner.get_input(INPUT_REPO),
            export_git_user: get_boolean_input(runner, INPUT_EXPORT_GIT_USER)?,
        })
    }
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("creds", &"<REDACTED>")
            .field("org", &self.org)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("export_git_user", &self.export_git_user)
            .finish()
    }
}

/// Reads a boolean input using the YAML 1.2 core schema booleans.
///
/// An unset input reads as `false`.
pub fn get_boolean_input<R: ActionRunner + ?Sized>(runner: &R, name: &str) -> Result<bool, Error> {
    let value = runner.get_input(name);
    if value.is_empty() || FALSE_VALUES.contains(&value.as_str()) {
        Ok(false)
    } else if TRUE_VALUES.contains(&value.as_str()) {
        Ok(true)
    } else {
        Err(Error::InvalidBooleanInput(name.to_string()))
    }
}

/// Turns the scope selectors into a single [`TokenScope`].
///
/// - `org` alone selects the organization.
/// - `owner` and `repo` together select that repository.
/// - No selector at all selects the job's own repository.
///
/// # Errors
///
/// Returns `Error::InvalidInputs` when `org` is combined with `owner` or
/// `repo`, or when only one of `owner` and `repo` is set. Returns
/// `Error::MissingRepository` when the job's repository is needed but unknown.
pub fn resolve_scope(inputs: &ActionInputs, context: &JobContext) -> Result<TokenScope, Error> {
    let has_org = !inputs.org.is_empty();
    let has_owner = !inputs.owner.is_empty();
    let has_repo = !inputs.repo.is_empty();

    match (has_org, has_owner, has_repo) {
        (true, false, false) => Ok(TokenScope::Organization {
            name: inputs.org.clone(),
        }),
        (true, _, _) => Err(Error::InvalidInputs),
        (false, true, true) => Ok(TokenScope::Repository(RepositoryRef::new(
            inputs.owner.as_str(),
            inputs.repo.as_str(),
        ))),
        (false, false, false) => Ok(TokenScope::Repository(context.repository()?)),
        (false, _, _) => Err(Error::InvalidInputs),
    }
}
