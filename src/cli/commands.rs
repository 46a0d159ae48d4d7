//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Song play star-schema ETL
#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); `dl.yaml` is used when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the input base location
    #[arg(short, long, global = true)]
    pub input: Option<String>,

    /// Override the output base location
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the pipeline
    Run,

    /// Validate the configuration and show resolved locations
    Validate,

    /// Show the output star schema
    Tables {
        /// Only show this table (`songs`, `artists`, `users`, `time`, `songplays`)
        table: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_run() {
        let cli = Cli::try_parse_from(["songplay-etl"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "songplay-etl",
            "validate",
            "--input",
            "/data/raw",
            "-o",
            "s3a://lake/",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Validate));
        assert_eq!(cli.input.as_deref(), Some("/data/raw"));
        assert_eq!(cli.output.as_deref(), Some("s3a://lake/"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_tables_with_name() {
        let cli = Cli::try_parse_from(["songplay-etl", "tables", "time"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Tables {
                table: Some("time".to_string())
            })
        );

        let cli = Cli::try_parse_from(["songplay-etl", "tables"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Tables { table: None }));
    }
}
