//! urlrecon - URL and text list reconciliation
//!
//! Compares two lists of URLs (or any text items) and reports the items
//! found in both, the items unique to each list, and near-duplicate pairs
//! scored by Levenshtein similarity.
//!
//! The engine lives in [`recon`]; the rest of the crate is the command-line
//! tool around it: item extraction, configuration, output formats and
//! Ctrl+C handling.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod progress;
pub mod recon;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, CompareArgs, CountArgs, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::extract::read_items;
use crate::output::{export_items, write_result, RunSummary};
use crate::progress::Progress;
use crate::recon::{BatchScheduler, ResultSection};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if an input cannot be read, the profile is invalid,
/// output cannot be written, or the comparison is interrupted.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref(), cli.profile.as_deref());
    log::debug!("Active profile: {}", config.default_profile);

    match &cli.command {
        Commands::Compare(args) => {
            config.merge_compare_args(args);
            run_compare(args, &config, cli.quiet, cli.no_color)
        }
        Commands::Count(args) => run_count(args),
        Commands::Profiles => run_profiles(&config),
    }
}

fn run_compare(
    args: &CompareArgs,
    config: &Config,
    quiet: bool,
    no_color: bool,
) -> Result<ExitCode> {
    let stdin = Path::new("-");
    if args.first == stdin && args.second == stdin {
        anyhow::bail!("Only one of the lists can be read from stdin");
    }

    let profile = config
        .active_profile()
        .context("Invalid comparison profile")?;
    log::info!(
        "Comparing with profile '{}' {}",
        config.default_profile,
        profile
    );

    let first = read_items(&args.first)?;
    let second = read_items(&args.second)?;
    for (path, items) in [(&args.first, &first), (&args.second, &second)] {
        if items.is_empty() {
            log::error!("{} contains no items to compare", path.display());
            return Ok(ExitCode::EmptyInput);
        }
    }

    let handler = signal::install_handler()?;
    let show_progress =
        !quiet && config.output == OutputFormat::Text && std::io::stderr().is_terminal();

    let start = Instant::now();
    let result = BatchScheduler::new(&first, &second, &profile)
        .with_batch_size(config.batch_size)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(Arc::new(Progress::new(!show_progress)))
        .run()?;

    let summary = RunSummary::new(
        config.default_profile.as_str(),
        profile,
        config.batch_size,
        start.elapsed(),
    );
    let color = !no_color && std::io::stdout().is_terminal();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, config.output, &result, &summary, color)
        .context("Failed to write results")?;

    if let Some(path) = &args.export {
        let sections = if args.combine.is_empty() {
            ResultSection::ALL.to_vec()
        } else {
            args.combine.clone()
        };
        let combined = result.combine(&sections);
        let format = export_items(path, &combined)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        log::info!(
            "Exported {} items to {} ({:?})",
            combined.len(),
            path.display(),
            format
        );
    }

    Ok(ExitCode::Success)
}

fn run_count(args: &CountArgs) -> Result<ExitCode> {
    let items = read_items(&args.path)?;
    println!("{}", items.len());
    Ok(ExitCode::Success)
}

fn run_profiles(config: &Config) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for named in config.all_profiles() {
        let marker = if named.name == config.default_profile {
            "*"
        } else {
            " "
        };
        writeln!(
            out,
            "{marker} {:<12} {:<28} {}",
            named.name,
            named.profile.to_string(),
            named.description
        )?;
    }
    Ok(ExitCode::Success)
}
