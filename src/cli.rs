use crate::types::config::ProviderKind;
use crate::types::score::CategoryBinding;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gitgrade",
    version,
    about = "Grade the engineering quality of a source repository"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a repository and print the report
    Analyze(AnalyzeCommand),
    /// Print the collected facts snapshot as JSON
    Facts(FactsCommand),
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    #[arg(required_unless_present = "path", conflicts_with = "path")]
    pub repo_url: Option<String>,

    /// Grade a local directory instead of a remote repository
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// How remote repositories are read
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Use this configuration file instead of the layered defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct AnalyzeCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// Which analyzer feeds each display category
    #[arg(long, value_enum)]
    pub binding: Option<CategoryBinding>,
}

#[derive(Args)]
pub struct FactsCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    Sarif,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "gitgrade",
            "analyze",
            "https://github.com/rust-lang/log",
            "--format",
            "md",
            "--provider",
            "api",
            "--binding",
            "distinct",
        ])
        .unwrap();
        let Commands::Analyze(cmd) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(
            cmd.target.repo_url.as_deref(),
            Some("https://github.com/rust-lang/log")
        );
        assert!(cmd.format == ReportFormat::Md);
        assert_eq!(cmd.target.provider, Some(ProviderKind::Api));
        assert_eq!(cmd.binding, Some(CategoryBinding::Distinct));
    }

    #[test]
    fn url_and_path_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "gitgrade",
            "analyze",
            "https://github.com/a/b",
            "--path",
            ".",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn a_target_is_required() {
        assert!(Cli::try_parse_from(["gitgrade", "facts"]).is_err());
    }
}
