//! CLI for rt2gh.
//!
//! Migrates RT tickets into GitHub issues. The run always processes every
//! planned ticket regardless of individual failures; the exit code says
//! whether the run itself completed, not whether every ticket succeeded.

use clap::Parser;
use rt2gh::config::parse_repo;
use rt2gh::{ConfigError, GithubTracker, MigratorConfig, RtClient, RunSummary, Runner, RunnerError};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

/// Migrate RT tickets into GitHub issues, replaying ticket history as comments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Specific ticket ids to migrate. Repeatable.
    #[arg(long = "ticket", value_name = "ID")]
    tickets: Vec<u64>,

    /// RT queues to migrate open tickets from. Repeatable.
    #[arg(long = "queue", value_name = "NAME")]
    queues: Vec<String>,

    /// Target GitHub repository in "owner/name" form.
    #[arg(long, env = "GITHUB_REPO")]
    repo: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    /// RT username.
    #[arg(long, env = "RT_USER")]
    rt_user: String,

    /// RT password. Prompted for when omitted.
    #[arg(long, env = "RT_PASSWORD")]
    rt_password: Option<String>,

    /// Base URL of the RT instance.
    #[arg(long, default_value = "https://rt.cpan.org")]
    rt_url: Url,

    /// Show what would be created without touching either tracker.
    #[arg(long)]
    dry_run: bool,

    /// Leave a correspondence note on each migrated ticket.
    #[arg(long)]
    comment_back: bool,

    /// Fail instead of prompting for missing credentials.
    #[arg(long)]
    non_interactive: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            // Per-ticket failures are reported via logs and the summary;
            // a completed run exits 0 either way.
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Migration run aborted");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let (owner, repo) = parse_repo(&args.repo)?;
    let rt_password = resolve_rt_password(args.rt_password, args.non_interactive)?;

    let config = MigratorConfig::new(
        args.rt_url.clone(),
        args.rt_user.clone(),
        rt_password.clone(),
        owner.clone(),
        repo.clone(),
        args.token.clone(),
    )
    .with_ticket_ids(args.tickets)
    .with_queues(args.queues)
    .with_dry_run(args.dry_run)
    .with_comment_back(args.comment_back);

    let source = RtClient::new(args.rt_url, args.rt_user, rt_password);
    let target = GithubTracker::new(args.token, owner, repo)?;

    let runner = Runner::new(config, source, target)?;
    runner.run().await
}

/// Resolves the RT password, prompting when allowed.
fn resolve_rt_password(
    given: Option<String>,
    non_interactive: bool,
) -> Result<String, ConfigError> {
    match given {
        Some(password) if !password.is_empty() => Ok(password),
        _ if non_interactive => Err(ConfigError::MissingCredential {
            name: "rt-password",
        }),
        _ => rpassword::prompt_password("RT password: ").map_err(|_| {
            ConfigError::MissingCredential {
                name: "rt-password",
            }
        }),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Tickets planned: {}", summary.tickets_planned);

    if summary.dry_run {
        println!("  Issues previewed: {}", summary.tickets_previewed);
    } else {
        println!("  Issues created: {}", summary.issues_created);
        println!("  Tickets failed: {}", summary.tickets_failed);
        println!("  Comments created: {}", summary.comments_created);
        println!("  Comments failed: {}", summary.comments_failed);
    }
}
