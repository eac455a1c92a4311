use std::process::ExitCode;
use std::sync::Arc;

use app_token_action::context::{ActionEnvironment, JobContext};
use app_token_action::errors::Disposition;
use app_token_action::runner::GitHubActionsRunner;
use app_token_action::{acquire, release};
use auth_handler::GitHubAuthService;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Mint a GitHub App installation token and revoke it when the job ends
#[derive(Parser)]
#[command(name = "app-token-action")]
#[command(about = "Mint and revoke GitHub App installation tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint the token and publish it as the `token` output
    Main,

    /// Revoke the token saved by the main step
    Post,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout belongs to the runner's workflow commands
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("APP_TOKEN_ACTION_LOG"))
        .init();

    let cli = Cli::parse();

    let environment = ActionEnvironment::from_env();
    let context = JobContext::from_environment(&environment);
    let auth = Arc::new(GitHubAuthService::new(context.api_url()));
    let runner = Arc::new(GitHubActionsRunner::new(environment));

    let disposition = match cli.command {
        Commands::Main => {
            info!(api_url = context.api_url(), "Running main step");
            acquire::main_step(Arc::clone(&runner), Arc::clone(&runner), auth, context).await
        }
        Commands::Post => {
            info!("Running post step");
            // A failed revocation is only a warning; the post step always succeeds.
            release::post_step(Arc::clone(&runner), Arc::clone(&runner), auth).await;
            return ExitCode::SUCCESS;
        }
    };

    debug!(?disposition, "Main step finished");
    match disposition {
        Disposition::Failed(_) => ExitCode::FAILURE,
        Disposition::Completed | Disposition::Suppressed => ExitCode::SUCCESS,
    }
}
