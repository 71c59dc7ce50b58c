use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tracing::error;
use tracing_subscriber::EnvFilter;

use runscope_junit::config::{Config, Credential};
use runscope_junit::monitor::HttpMonitorClient;
use runscope_junit::runner::{RunResult, RunSummary, run_monitor};

/// Runscope JUnit - trigger an API monitoring run and record the outcome
#[derive(Parser, Debug)]
#[command(
    name = "runscope-junit",
    about = "Trigger a Runscope API monitoring run, wait for it, and write a JUnit report",
    after_help = "ENVIRONMENT VARIABLES:\n\
        APICredentials             Runscope access token (required; \"Bearer \" is added if missing)\n\
        RUNSCOPE_TRIGGER_URL       Radar trigger URL\n\
        RUNSCOPE_RESULT_FILE       JUnit report path\n\
        RUNSCOPE_POLL_INTERVAL     Seconds to wait before each status check\n\
        RUNSCOPE_MAX_ATTEMPTS      Status checks before giving up\n\
        RUST_LOG                   Log filter (default: info)"
)]
struct Args {
    /// Radar trigger URL (overrides RUNSCOPE_TRIGGER_URL)
    #[arg(long)]
    trigger_url: Option<String>,

    /// JUnit report path (default: test-results/runscope-result.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds to wait before each status check (default: 5)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Status checks before giving up (default: 60)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log request and response bodies
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let json = args.json;
    match run(args) {
        Ok(summary) => {
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        error!("Failed to serialize run summary: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> RunResult<RunSummary> {
    let credential = Credential::from_env()?;
    let config = apply_overrides(Config::from_env(), &args);

    let mut client = HttpMonitorClient::new(&config.trigger_url, &credential)?;
    run_monitor(&mut client, &config)
}

/// Command-line flags win over environment variables.
fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(url) = &args.trigger_url {
        config = config.trigger_url(url);
    }
    if let Some(path) = &args.output {
        config = config.result_file(path);
    }
    if let Some(secs) = args.poll_interval {
        config.poll = config.poll.interval(Duration::from_secs(secs));
    }
    if let Some(attempts) = args.max_attempts {
        config.poll = config.poll.max_attempts(attempts);
    }
    config
}
