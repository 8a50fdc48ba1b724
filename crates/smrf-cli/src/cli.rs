use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "SMRF Design Contributors",
    version,
    about = "smrfd - automated seismic design of steel special moment-resisting frames per ASCE 7-10 and AISC 341/358.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size the members of a steel special moment frame and write the design reports.
    Design(DesignArgs),
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Path to the building definition file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the wide-flange section database in CSV format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub sections: PathBuf,

    /// Directory where the design report CSV files are written.
    #[arg(short, long, default_value = "design-results", value_name = "DIR")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_subcommand_parses_required_paths() {
        let cli = Cli::try_parse_from([
            "smrfd", "design", "--config", "building.toml", "--sections", "sections.csv",
        ])
        .expect("arguments should parse");
        let Commands::Design(args) = cli.command;
        assert_eq!(args.config, PathBuf::from("building.toml"));
        assert_eq!(args.sections, PathBuf::from("sections.csv"));
        assert_eq!(args.output_dir, PathBuf::from("design-results"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "smrfd", "design", "-c", "b.toml", "-s", "s.csv", "-q", "-v",
        ]);
        assert!(result.is_err());
    }
}
