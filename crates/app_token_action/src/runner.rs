//! GitHub Actions runner protocol.
//!
//! The action talks to the runner in two ways:
//!
//! - Workflow commands printed on stdout (`::add-mask::`, `::warning::`,
//!   `::error::`).
//! - File commands: entries appended to the files named by `GITHUB_OUTPUT`,
//!   `GITHUB_STATE` and `GITHUB_ENV`. When a file variable is missing the
//!   legacy stdout commands are used instead.
//!
//! Saved state comes back in the post step as `STATE_<key>` variables.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::context::ActionEnvironment;
use crate::errors::Error;

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

/// File command for step outputs.
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// File command for state shared with the post step.
pub const GITHUB_STATE: &str = "GITHUB_STATE";

/// File command for environment variables of subsequent steps.
pub const GITHUB_ENV: &str = "GITHUB_ENV";

/// Input, output and logging plumbing provided by the runner.
pub trait ActionRunner: Send + Sync {
    /// Value of an input, trimmed. Empty when the input is not set.
    fn get_input(&self, name: &str) -> String;

    /// Register a value to be masked in all subsequent log output.
    fn set_secret(&self, secret: &str);

    fn set_output(&self, name: &str, value: &str) -> Result<(), Error>;

    /// Export an environment variable to the remaining steps of the job.
    fn export_variable(&self, name: &str, value: &str) -> Result<(), Error>;

    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    /// Report the step as failed with the given message.
    fn set_failed(&self, message: &str);
}

/// Key-value state persisted between the main and the post step.
pub trait StateStore: Send + Sync {
    /// Value saved under `key`, or an empty string.
    fn get(&self, key: &str) -> String;

    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Escapes the data part of a workflow command.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a property value of a workflow command.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Formats a file command entry using a heredoc style delimiter.
///
/// # Errors
///
/// Returns `Error::DelimiterCollision` if the name or the value contains the
/// delimiter.
pub fn prepare_key_value_message(
    name: &str,
    value: &str,
    delimiter: &str,
) -> Result<String, Error> {
    if name.contains(delimiter) {
        return Err(Error::DelimiterCollision("name"));
    }
    if value.contains(delimiter) {
        return Err(Error::DelimiterCollision("value"));
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// [`ActionRunner`] and [`StateStore`] backed by the real runner protocol.
///
/// Workflow commands are written to `W`, which is stdout outside of tests.
pub struct GitHubActionsRunner<W: Write + Send = io::Stdout> {
    environment: ActionEnvironment,
    out: Mutex<W>,
}

impl GitHubActionsRunner<io::Stdout> {
    pub fn new(environment: ActionEnvironment) -> Self {
        Self::with_writer(environment, io::stdout())
    }
}

impl<W: Write + Send> GitHubActionsRunner<W> {
    pub fn with_writer(environment: ActionEnvironment, writer: W) -> Self {
        Self {
            environment,
            out: Mutex::new(writer),
        }
    }

    /// Consumes the runner and returns the command writer.
    pub fn into_writer(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write to the runner");
        }
    }

    fn issue(&self, command: &str, message: &str) {
        self.write_line(&format!("::{}::{}", command, escape_data(message)));
    }

    fn issue_with_name(&self, command: &str, name: &str, message: &str) {
        self.write_line(&format!(
            "::{} name={}::{}",
            command,
            escape_property(name),
            escape_data(message)
        ));
    }

    /// Appends an entry to the file command named by `file_var`, falling back
    /// to the legacy stdout command when the runner did not provide the file.
    fn issue_file_command(
        &self,
        file_var: &str,
        legacy_command: &str,
        name: &str,
        value: &str,
    ) -> Result<(), Error> {
        let Some(path) = self.environment.get(file_var) else {
            debug!(
                command = legacy_command,
                "File command not available, using legacy workflow command"
            );
            self.issue_with_name(legacy_command, name, value);
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        let entry = prepare_key_value_message(name, value, &delimiter)?;

        let command = file_var.trim_start_matches("GITHUB_").to_string();
        OpenOptions::new()
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()))
            .map_err(|source| Error::FileCommand { command, source })
    }
}

impl<W: Write + Send> ActionRunner for GitHubActionsRunner<W> {
    fn get_input(&self, name: &str) -> String {
        let variable = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        self.environment
            .get(&variable)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn set_secret(&self, secret: &str) {
        self.issue("add-mask", secret);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), Error> {
        self.issue_file_command(GITHUB_OUTPUT, "set-output", name, value)
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<(), Error> {
        self.issue_file_command(GITHUB_ENV, "set-env", name, value)
    }

    fn info(&self, message: &str) {
        self.write_line(message);
    }

    fn warning(&self, message: &str) {
        self.issue("warning", message);
    }

    fn set_failed(&self, message: &str) {
        self.issue("error", message);
    }
}

impl<W: Write + Send> StateStore for GitHubActionsRunner<W> {
    fn get(&self, key: &str) -> String {
        self.environment
            .get(&format!("STATE_{}", key))
            .unwrap_or_default()
            .to_string()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.issue_file_command(GITHUB_STATE, "save-state", key, value)
    }
}
