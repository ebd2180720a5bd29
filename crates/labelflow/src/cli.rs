use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labelflow")]
#[command(author, version, about = "Infer security labels from flows-to constraints")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Solve a constraint problem and print the inferred labels
    Solve {
        /// Problem file (.json or .toml)
        problem: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Report every violated constraint instead of the first
        #[arg(long)]
        all_violations: bool,

        /// Also write the constraint graph in DOT format to this file
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Write the constraint graph of a problem in Graphviz DOT format
    Dot {
        /// Problem file (.json or .toml)
        problem: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
