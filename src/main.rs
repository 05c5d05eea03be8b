//! Flow Collect CLI
//!
//! Collects Flow123d profiler traces left behind by benchmark runs and
//! stores them as flat, indexed documents.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use flow_collect::commands::{
    display_rules, display_version, execute_collect, execute_process, validate_args, CollectArgs,
    ProcessArgs,
};
use flow_collect::utils::config::{DEFAULT_INCLUDE, DEFAULT_TEST_PATH};

/// Flow Collect - profiler trace ingestion for benchmarks
#[derive(Parser, Debug)]
#[command(name = "flow-collect")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect every trace under the given test paths
    Collect {
        /// Repository root the test paths are relative to
        #[arg(short, long, env = "FLOW123D_ROOT", default_value = ".")]
        root: PathBuf,

        /// Test path to collect (can be repeated)
        #[arg(short, long = "test", default_value = DEFAULT_TEST_PATH)]
        tests: Vec<PathBuf>,

        /// File-name glob for trace files
        #[arg(long, default_value = DEFAULT_INCLUDE)]
        include: String,

        /// File-name glob of files to skip
        #[arg(long)]
        exclude: Option<String>,

        /// Only collect outputs of the run tagged with this token
        #[arg(long)]
        tag: Option<String>,

        /// TOML file with field type rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// JSON-lines output for the documents
        #[arg(short, long, default_value = "artifacts/documents.jsonl")]
        output: PathBuf,
    },

    /// Process a single trace file and print the result
    Process {
        /// Path to profiler trace JSON
        #[arg(short, long)]
        file: PathBuf,

        /// TOML file with field type rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display the field type rules in effect
    Rules {
        /// TOML file with field type rules
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Collect {
            root,
            tests,
            include,
            exclude,
            tag,
            rules,
            output,
        } => {
            let args = CollectArgs {
                root,
                tests,
                include,
                exclude,
                tag,
                rules,
                output,
            };

            // Validate args first
            validate_args(&args)?;

            execute_collect(args)?;
        }

        Commands::Process {
            file,
            rules,
            output,
        } => {
            execute_process(ProcessArgs {
                file,
                rules,
                output,
            })?;
        }

        Commands::Rules { rules } => {
            display_rules(rules.as_deref())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
