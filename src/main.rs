// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line entry point for the badge generator.
//!
//! The binary resolves configuration from environment-backed flags, connects
//! one authenticated API client for the run, generates both badges, and exits
//! non-zero with the failing stage's message on any error.

use std::{path::PathBuf, process};

use clap::Parser;
use gh_stats_badges::{Configuration, Error, GitHubStats, generate_all};
use tracing_subscriber::EnvFilter;

/// Generate SVG badges and JSON summaries from GitHub statistics.
#[derive(Debug, Parser)]
#[command(name = "gh-stats-badges", version, about = "Generate GitHub statistics badges")]
struct Cli {
    /// Personal access token used to authenticate API calls.
    #[arg(long = "token", env = "ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Login of the account whose statistics are aggregated.
    #[arg(long = "user", env = "GITHUB_ACTOR")]
    user: Option<String>,

    /// Comma-separated repository names excluded from every aggregate.
    #[arg(long = "exclude-repos", env = "EXCLUDED", value_name = "LIST")]
    excluded_repos: Option<String>,

    /// Comma-separated language names excluded from the languages badge.
    #[arg(long = "exclude-langs", env = "EXCLUDED_LANGS", value_name = "LIST")]
    excluded_langs: Option<String>,

    /// Whether forked repositories are skipped; only "false" disables it.
    #[arg(
        long = "ignore-forked-repos",
        env = "EXCLUDE_FORKED_REPOS",
        value_name = "BOOL"
    )]
    ignore_forked_repos: Option<String>,

    /// Directory containing the shipped SVG templates.
    #[arg(long = "templates", value_name = "DIR", default_value = "templates")]
    templates: PathBuf,

    /// Directory receiving the generated artifacts.
    #[arg(long = "output", value_name = "DIR", default_value = "generated")]
    output: PathBuf
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(error) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

/// Executes one generation run using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, provider, template, and write errors.
async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    let config = Configuration::from_inputs(
        cli.token,
        cli.user,
        cli.excluded_repos.as_deref(),
        cli.excluded_langs.as_deref(),
        cli.ignore_forked_repos.as_deref()
    )?;

    let stats = GitHubStats::connect(config)?;
    generate_all(&stats, &cli.templates, &cli.output).await?;

    Ok(())
}
