mod analyze;
mod cli;
mod config;
mod error;
mod grading;
mod pipeline;
mod report;
mod scan;
mod types;

use crate::error::{ErrorKind, ErrorResponse, GradeError};
use crate::scan::source::RepoRef;
use crate::scan::Target;
use crate::types::config::GradeConfig;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INPUT: i32 = 2;
    pub const INFRASTRUCTURE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const RATE_LIMITED: i32 = 5;
}

fn exit_code_for(err: &GradeError) -> i32 {
    match err.kind() {
        ErrorKind::Input => exit_code::INPUT,
        ErrorKind::Infrastructure => exit_code::INFRASTRUCTURE,
        ErrorKind::NotFound => exit_code::NOT_FOUND,
        ErrorKind::RateLimited => exit_code::RATE_LIMITED,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn resolve(args: &cli::TargetArgs) -> Result<(Target, GradeConfig), GradeError> {
    let target = match (&args.path, &args.repo_url) {
        (Some(path), _) => Target::Local(path.clone()),
        (None, Some(url)) => Target::Remote(RepoRef::parse(url)?),
        (None, None) => {
            return Err(GradeError::InvalidInput(
                "repository URL is required".to_string(),
            ))
        }
    };
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.provider.kind = provider;
    }
    Ok((target, config))
}

async fn run(command: cli::Commands) -> Result<i32, GradeError> {
    let now = chrono::Utc::now();
    match command {
        cli::Commands::Analyze(cmd) => {
            let (target, config) = resolve(&cmd.target)?;
            let binding = cmd.binding.unwrap_or(config.report.binding);
            let report = pipeline::analyze(&target, &config, binding, now).await?;
            let format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Sarif => report::OutputFormat::Sarif,
            };
            println!("{}", report::render(&report, format)?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Facts(cmd) => {
            let (target, config) = resolve(&cmd.target)?;
            let facts = scan::fetch_facts(&target, &config, now).await?;
            println!("{}", serde_json::to_string_pretty(&facts)?);
            Ok(exit_code::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let json_errors = matches!(
        &cli.command,
        cli::Commands::Analyze(cmd) if cmd.format == cli::ReportFormat::Json
    ) || matches!(&cli.command, cli::Commands::Facts(_));

    match run(cli.command).await {
        Ok(code) => {
            if code != exit_code::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            if json_errors {
                if let Ok(body) = serde_json::to_string_pretty(&ErrorResponse::from(&e)) {
                    println!("{body}");
                }
            }
            eprintln!("error: {e}");
            std::process::exit(exit_code_for(&e));
        }
    }
}
