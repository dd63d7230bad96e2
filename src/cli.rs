//! Command-line interface and run orchestration.
//!
//! A run validates the target folder, sorts it into a temporary staging tree,
//! promotes the staging tree to `<results_dir>/result_<timestamp>` and reports
//! what was found. The staging tree is removed on every exit path.

use crate::config::{CompiledFilters, DEFAULT_RESULTS_DIR, SortConfig};
use crate::error::{SortError, SortResult};
use crate::file_category::ExtensionReport;
use crate::file_organizer::Organizer;
use crate::output::OutputFormatter;
use chrono::{DateTime, Local};
use clap::{ArgAction, Parser};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Timestamp layout of a result folder: day.month.year_hour:minute.
#[cfg(not(windows))]
const RESULT_TIMESTAMP_FORMAT: &str = "%d.%m.%y_%H:%M";
#[cfg(windows)]
const RESULT_TIMESTAMP_FORMAT: &str = "%d.%m.%y_%H-%M";

/// Sort a folder into images, video, documents, audio and archives.
#[derive(Debug, Parser)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Folder to sort
    pub folder: PathBuf,

    /// Configuration file (defaults to .dirsortrc.toml, then ~/.config/dirsort/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder that receives the timestamped result (overrides the config)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Inputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub folder: PathBuf,
    pub results_dir: PathBuf,
    pub filters: CompiledFilters,
    pub progress: ProgressBar,
}

impl RunOptions {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            filters: CompiledFilters::default(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.results_dir = results_dir.into();
        self
    }

    pub fn filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The `result_<timestamp>` folder that was created.
    pub result_dir: PathBuf,
    pub report: ExtensionReport,
    /// Category folder name to the sorted names of its entries.
    pub placed: BTreeMap<String, Vec<String>>,
    pub files_placed: usize,
}

/// Name of the result folder for a run started at `now`.
pub fn result_dir_name(now: &DateTime<Local>) -> String {
    format!("result_{}", now.format(RESULT_TIMESTAMP_FORMAT))
}

/// Sorts `options.folder` and promotes the result.
///
/// # Errors
///
/// * `SortError::NoSuchDirectory` if the folder is missing or not a directory
/// * `SortError::EmptyDirectory` if nothing at all was found below it; no
///   results folder is created in that case
/// * any I/O or archive error raised while sorting or copying
pub fn run(options: &RunOptions) -> SortResult<RunSummary> {
    let folder = options.folder.as_path();
    if !folder.is_dir() {
        return Err(SortError::NoSuchDirectory(folder.to_path_buf()));
    }

    let staging = tempfile::Builder::new()
        .prefix("dirsort-")
        .tempdir()
        .map_err(|e| SortError::io(std::env::temp_dir(), e))?;
    debug!(staging = %staging.path().display(), "created staging directory");

    let mut organizer = Organizer::new(folder, staging.path())
        .with_filters(options.filters.clone())
        .with_skip_dir(&options.results_dir)
        .with_progress(options.progress.clone());

    info!(folder = %folder.display(), "sorting");
    if !organizer.walk(folder)? {
        return Err(SortError::EmptyDirectory(folder.to_path_buf()));
    }
    let files_placed = organizer.files_placed();
    let report = organizer.into_report();

    fs::create_dir_all(&options.results_dir)
        .map_err(|e| SortError::io(&options.results_dir, e))?;
    let result_dir = options.results_dir.join(result_dir_name(&Local::now()));
    // Fails if a run in the same minute already wrote this folder.
    fs::create_dir(&result_dir).map_err(|e| SortError::io(&result_dir, e))?;
    copy_tree(staging.path(), &result_dir)?;
    info!(result = %result_dir.display(), files_placed, "results written");

    let placed = list_result_dir(&result_dir)?;

    Ok(RunSummary {
        result_dir,
        report,
        placed,
        files_placed,
    })
}

/// Resolves configuration from the command line, runs, and prints the report.
pub fn run_cli(cli: &Cli) -> SortResult<RunSummary> {
    let config = SortConfig::load(cli.config.as_deref())?;
    let results_dir = cli
        .results_dir
        .clone()
        .unwrap_or_else(|| config.results_dir.clone());

    let spinner = OutputFormatter::create_spinner();
    let mut options = RunOptions::new(&cli.folder)
        .results_dir(results_dir)
        .filters(config.compile_filters()?);
    options.progress = spinner.clone();

    let result = run(&options);
    spinner.finish_and_clear();

    let summary = result?;
    OutputFormatter::report(&summary);
    Ok(summary)
}

/// Recursively copies the contents of `from` into the existing folder `to`.
fn copy_tree(from: &Path, to: &Path) -> SortResult<()> {
    for entry in fs::read_dir(from).map_err(|e| SortError::io(from, e))? {
        let entry = entry.map_err(|e| SortError::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| SortError::io(&source, e))?;

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| SortError::io(&target, e))?;
            copy_tree(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| SortError::io(&target, e))?;
        }
    }
    Ok(())
}

fn list_result_dir(result_dir: &Path) -> SortResult<BTreeMap<String, Vec<String>>> {
    let mut placed = BTreeMap::new();
    for entry in fs::read_dir(result_dir).map_err(|e| SortError::io(result_dir, e))? {
        let entry = entry.map_err(|e| SortError::io(result_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let mut names = fs::read_dir(&path)
            .map_err(|e| SortError::io(&path, e))?
            .map(|item| item.map(|item| item.file_name().to_string_lossy().to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SortError::io(&path, e))?;
        names.sort();
        placed.insert(entry.file_name().to_string_lossy().to_string(), names);
    }
    Ok(placed)
}
