/// Recursive traversal and placement of files into the staging tree.
///
/// The [`Organizer`] walks a source folder, classifies each file by extension,
/// and copies it (or extracts it, for archives) into a per-category folder of
/// the staging root under a transliterated name. Source files are never moved
/// or deleted; only subdirectories that turn out to contain nothing are
/// removed from the source tree.
use crate::archive;
use crate::config::CompiledFilters;
use crate::error::{SortError, SortResult};
use crate::file_category::{Category, ExtensionReport, FileMapper};
use crate::transliterate::{transliterate, transliterate_file_name};
use indicatif::ProgressBar;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Creates `<staging_root>/<category>` if it does not exist yet.
///
/// Calling it again for the same category is a no-op.
pub fn ensure_category_dir(staging_root: &Path, category: Category) -> SortResult<PathBuf> {
    let category_path = staging_root.join(category.dir_name());
    fs::create_dir_all(&category_path).map_err(|e| SortError::io(&category_path, e))?;
    Ok(category_path)
}

fn has_entries(dir: &Path) -> SortResult<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| SortError::io(dir, e))?;
    Ok(entries.next().is_some())
}

/// Walks one source tree and fills one staging tree.
pub struct Organizer {
    source_root: PathBuf,
    staging_root: PathBuf,
    mapper: FileMapper,
    filters: CompiledFilters,
    skip_dirs: Vec<PathBuf>,
    progress: ProgressBar,
    report: ExtensionReport,
    files_placed: usize,
}

impl Organizer {
    /// Creates an organizer that sorts `source_root` into `staging_root`.
    pub fn new(source_root: impl Into<PathBuf>, staging_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            staging_root: staging_root.into(),
            mapper: FileMapper::default(),
            filters: CompiledFilters::default(),
            skip_dirs: Vec::new(),
            progress: ProgressBar::hidden(),
            report: ExtensionReport::new(),
            files_placed: 0,
        }
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Never descends into `dir`. Used for a results folder that lives inside
    /// the source tree. Paths that do not exist yet are ignored.
    pub fn with_skip_dir(mut self, dir: &Path) -> Self {
        if let Ok(canonical) = dir.canonicalize() {
            self.skip_dirs.push(canonical);
        }
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn report(&self) -> &ExtensionReport {
        &self.report
    }

    pub fn into_report(self) -> ExtensionReport {
        self.report
    }

    /// Number of files copied or extracted so far.
    pub fn files_placed(&self) -> usize {
        self.files_placed
    }

    /// Processes every entry of `dir`.
    ///
    /// Returns `true` when at least one file was found anywhere below `dir`,
    /// known extension or not. Subdirectories for which that is `false` are
    /// removed. A directory with no entries returns `false` right away.
    pub fn walk(&mut self, dir: &Path) -> SortResult<bool> {
        let entries = fs::read_dir(dir)
            .map_err(|e| SortError::io(dir, e))?
            .collect::<Result<Vec<DirEntry>, _>>()
            .map_err(|e| SortError::io(dir, e))?;

        if entries.is_empty() {
            return Ok(false);
        }

        let mut found = false;
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| SortError::io(&path, e))?;
            found |= if file_type.is_dir() {
                self.process_dir(&path)?
            } else {
                self.process_file(&path)?
            };
        }

        Ok(found)
    }

    fn process_dir(&mut self, dir: &Path) -> SortResult<bool> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        // Skipped folders are not descended into, but one with entries keeps
        // its parent alive.
        let found = if Category::is_reserved_dir_name(&name) || self.is_skipped(dir) {
            trace!(dir = %dir.display(), "skipping folder");
            has_entries(dir)?
        } else {
            self.walk(dir)?
        };

        if !found {
            fs::remove_dir(dir).map_err(|e| SortError::io(dir, e))?;
            debug!(dir = %dir.display(), "removed empty directory");
        }
        Ok(found)
    }

    fn is_skipped(&self, dir: &Path) -> bool {
        if self.skip_dirs.is_empty() {
            return false;
        }
        dir.canonicalize()
            .map(|canonical| self.skip_dirs.contains(&canonical))
            .unwrap_or(false)
    }

    fn process_file(&mut self, file: &Path) -> SortResult<bool> {
        let relative = file.strip_prefix(&self.source_root).unwrap_or(file);
        if !self.filters.should_include(relative) {
            debug!(file = %file.display(), "excluded by filters");
            return Ok(true);
        }

        self.progress.inc(1);
        self.progress.set_message(relative.display().to_string());

        let ext = file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        match self.mapper.classify_and_record(&ext, &mut self.report) {
            Some(category) => {
                let destination = self.place(file, category)?;
                self.files_placed += 1;
                debug!(
                    file = %file.display(),
                    destination = %destination.display(),
                    category = category.dir_name(),
                    "placed file"
                );
            }
            None => trace!(file = %file.display(), "unknown extension, left in place"),
        }

        Ok(true)
    }

    /// Copies `file` into its category folder, or extracts it when it is an
    /// archive, and returns the created path.
    pub fn place(&self, file: &Path, category: Category) -> SortResult<PathBuf> {
        let category_dir = ensure_category_dir(&self.staging_root, category)?;

        if category == Category::Archives {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy())
                .unwrap_or_default();
            let destination = category_dir.join(transliterate(&stem));
            archive::extract(file, &destination)?;
            return Ok(destination);
        }

        let name = transliterate_file_name(file).ok_or_else(|| {
            SortError::io(
                file,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            )
        })?;
        let destination = category_dir.join(name);
        fs::copy(file, &destination).map_err(|e| SortError::io(&destination, e))?;
        Ok(destination)
    }
}
