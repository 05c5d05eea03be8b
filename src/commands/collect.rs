//! Collect and process command implementations.
//!
//! The collect command:
//! 1. Finds trace files under every test path
//! 2. Normalizes and flattens each trace
//! 3. Reports how many records each test path produced
//! 4. Inserts all documents into the sink

use super::models::{CollectArgs, ProcessArgs};
use super::utils::load_rule_set;
use crate::discovery::{load_data, TraceFinder};
use crate::output::{write_collect_result, DocumentSink, JsonLinesSink};
use crate::parser::{FlatRecord, TraceProcessor};
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the collect command
///
/// **Public** - main entry point called from main.rs
///
/// A test path that cannot be read is reported with zero items and skipped;
/// the remaining paths are still collected.
///
/// # Returns
/// Number of documents inserted
///
/// # Errors
/// * Invalid rule file or glob patterns
/// * Output write errors
pub fn execute_collect(args: CollectArgs) -> Result<usize> {
    let start_time = Instant::now();

    let processor = TraceProcessor::new(load_rule_set(args.rules.as_deref())?);
    debug!("Collecting with {} field rules", processor.rules().len());

    let mut finder = TraceFinder::new(&args.include, args.exclude.as_deref())
        .context("Invalid include/exclude pattern")?;
    if let Some(tag) = &args.tag {
        debug!("Restricting collection to run tag {}", tag);
        finder = finder.with_token(tag.clone());
    }

    let mut data: Vec<FlatRecord> = Vec::new();
    for test in &args.tests {
        let path = args.root.join(test);
        let items = match load_data(&path, &finder, &processor) {
            Ok(summary) => summary.items,
            Err(e) => {
                warn!(
                    "Failed to load traces from {}: {:#}",
                    path.display(),
                    anyhow::Error::new(e)
                );
                Vec::new()
            }
        };

        println!("  - Found {} items in {}", items.len(), test.display());
        data.extend(items);
    }

    let inserted = if data.is_empty() {
        println!("{} | Did not find any artifacts", "[ WARN ]".yellow());
        0
    } else {
        let mut sink =
            JsonLinesSink::create(&args.output).context("Failed to open document sink")?;
        println!("Inserting {} items to {}", data.len(), sink.path().display());
        sink.insert(&data).context("Failed to insert documents")?
    };

    println!("{} | Inserted total of {} documents", "[ OK ]".green(), inserted);
    info!("Collect completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(inserted)
}

/// Execute the process command on a single trace file
///
/// **Public** - main entry point called from main.rs
pub fn execute_process(args: ProcessArgs) -> Result<()> {
    let processor = TraceProcessor::new(load_rule_set(args.rules.as_deref())?);

    let result = processor
        .process_file(&args.file)
        .with_context(|| format!("Failed to process {}", args.file.display()))?;

    match &args.output {
        Some(path) => {
            write_collect_result(&result, path).context("Failed to write collect result")?;
            println!(
                "{} | {} records written to {}",
                "[ OK ]".green(),
                result.items.len(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

/// Validate collect arguments
///
/// **Public** - can be called before execute_collect for early validation
pub fn validate_args(args: &CollectArgs) -> Result<()> {
    if args.tests.is_empty() {
        anyhow::bail!("At least one test path is required");
    }

    if args.include.trim().is_empty() {
        anyhow::bail!("Include pattern cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if !args.root.is_dir() {
        anyhow::bail!("Root {} is not a directory", args.root.display());
    }

    Ok(())
}
