use std::fs;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use serde::Serialize;

use crate::SummaryError;
use crate::SummaryResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::SumConfig;
use crate::engine::SummaryMode;
use crate::engine::process;
use crate::profile::LanguageProfile;
use crate::profile::ProfileRegistry;

/// Options controlling a directory scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Descend into subdirectories. Off by default: only files directly
	/// under the root are processed.
	pub recursive: bool,
	/// Report what would change without writing anything back.
	pub dry_run: bool,
	/// Gitignore-style glob patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Maximum file size in bytes to read.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			recursive: false,
			dry_run: false,
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a loaded config, keeping the
	/// command-line controlled fields at their defaults.
	pub fn from_config(config: Option<&SumConfig>) -> Self {
		let exclude_patterns = config
			.map(|c| c.exclude.patterns.clone())
			.unwrap_or_default();
		let max_file_size = config.map_or(DEFAULT_MAX_FILE_SIZE, |c| c.max_file_size);
		let disable_gitignore = config.is_some_and(|c| c.disable_gitignore);

		Self {
			exclude_patterns,
			max_file_size,
			disable_gitignore,
			..Self::default()
		}
	}
}

/// Outcome of processing a single qualifying file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FileOutcome {
	/// A fresh summary block replaced the insertion marker.
	Inserted { headings: usize },
	/// An existing summary block was regenerated with different content.
	Updated { headings: usize },
	/// An existing summary block was regenerated without changes.
	UpToDate,
	/// Neither an insertion marker nor an open/close pair; nothing to do.
	Skipped,
	/// Ambiguous or unbalanced markers; the file was left unmodified.
	Warning { message: String },
	/// The file could not be processed; siblings are unaffected.
	Failed { message: String },
}

impl FileOutcome {
	/// Short lowercase label for report lines.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Inserted { .. } => "inserted",
			Self::Updated { .. } => "updated",
			Self::UpToDate => "up to date",
			Self::Skipped => "skipped",
			Self::Warning { .. } => "warning",
			Self::Failed { .. } => "failed",
		}
	}
}

/// Original and regenerated text for a file that would change, kept so
/// callers can render diffs without re-reading the file.
#[derive(Debug, Clone, Serialize)]
pub struct ChangedText {
	pub before: String,
	pub after: String,
}

/// Per-file report produced by [`scan`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
	/// Path of the processed file.
	pub path: PathBuf,
	/// What happened to it.
	#[serde(flatten)]
	pub outcome: FileOutcome,
	/// Populated for files that changed (or would change under `dry_run`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub change: Option<ChangedText>,
}

/// Aggregated results of one directory scan.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
	pub reports: Vec<FileReport>,
}

impl ScanReport {
	pub fn inserted(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::Inserted { .. }))
	}

	pub fn updated(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::Updated { .. }))
	}

	pub fn up_to_date(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::UpToDate))
	}

	pub fn skipped(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::Skipped))
	}

	pub fn warnings(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::Warning { .. }))
	}

	pub fn failures(&self) -> usize {
		self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
	}

	/// Files that changed, or would change under `dry_run`.
	pub fn changed(&self) -> usize {
		self.inserted() + self.updated()
	}

	pub fn has_failures(&self) -> bool {
		self.failures() > 0
	}

	fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
		self.reports
			.iter()
			.filter(|report| predicate(&report.outcome))
			.count()
	}
}

/// Walk a directory tree, run the summary pipeline on every file with a
/// registered profile, and write changed files back in place (unless
/// `dry_run`). One file's failure never aborts its siblings; configuration
/// problems (bad exclude globs) abort before the walk starts.
pub fn scan(
	root: &Path,
	registry: &ProfileRegistry,
	options: &ScanOptions,
) -> SummaryResult<ScanReport> {
	let exclude_set = build_glob_set(&options.exclude_patterns)?;

	let mut builder = WalkBuilder::new(root);
	builder
		.follow_links(false)
		.require_git(false)
		.git_ignore(!options.disable_gitignore)
		.git_global(!options.disable_gitignore)
		.git_exclude(!options.disable_gitignore)
		.max_depth(if options.recursive { None } else { Some(1) });

	let mut report = ScanReport::default();

	for entry in builder.build() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(error) => {
				report.reports.push(FileReport {
					path: root.to_path_buf(),
					outcome: FileOutcome::Failed {
						message: error.to_string(),
					},
					change: None,
				});
				continue;
			}
		};

		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let path = entry.path();
		let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
			continue;
		};
		// Files without a matching profile are outside mdsum's scope and are
		// not reported at all.
		let Some(profile) = registry.resolve(name) else {
			continue;
		};

		let relative = path.strip_prefix(root).unwrap_or(path);
		if exclude_set.is_match(relative) {
			tracing::debug!(path = %path.display(), "excluded by pattern");
			continue;
		}

		if entry
			.metadata()
			.map(|metadata| metadata.len() > options.max_file_size)
			.unwrap_or(false)
		{
			tracing::debug!(path = %path.display(), "skipping oversized file");
			continue;
		}

		report.reports.push(process_file(path, profile, options));
	}

	Ok(report)
}

/// Process a single file, translating per-file errors into report outcomes
/// so the scan continues with siblings.
fn process_file(path: &Path, profile: &LanguageProfile, options: &ScanOptions) -> FileReport {
	match run_pipeline(path, profile, options) {
		Ok((outcome, change)) => {
			FileReport {
				path: path.to_path_buf(),
				outcome,
				change,
			}
		}
		Err(error) => {
			let outcome = if error.is_marker_warning() {
				FileOutcome::Warning {
					message: error.to_string(),
				}
			} else {
				FileOutcome::Failed {
					message: error.to_string(),
				}
			};
			FileReport {
				path: path.to_path_buf(),
				outcome,
				change: None,
			}
		}
	}
}

fn run_pipeline(
	path: &Path,
	profile: &LanguageProfile,
	options: &ScanOptions,
) -> SummaryResult<(FileOutcome, Option<ChangedText>)> {
	let bytes = fs::read(path)?;
	let text = String::from_utf8(bytes).map_err(|_| {
		SummaryError::NotUtf8 {
			path: path.display().to_string(),
		}
	})?;

	let outcome = process(&text, profile)?;

	match outcome.mode {
		SummaryMode::NoAction => Ok((FileOutcome::Skipped, None)),
		_ if !outcome.changed => Ok((FileOutcome::UpToDate, None)),
		mode => {
			if !options.dry_run {
				// Fail loudly when the target is not writable.
				fs::write(path, &outcome.new_text)?;
			}

			let file_outcome = match mode {
				SummaryMode::Insert => {
					FileOutcome::Inserted {
						headings: outcome.heading_count,
					}
				}
				_ => {
					FileOutcome::Updated {
						headings: outcome.heading_count,
					}
				}
			};
			let change = ChangedText {
				before: text,
				after: outcome.new_text,
			};

			Ok((file_outcome, Some(change)))
		}
	}
}

fn build_glob_set(patterns: &[String]) -> SummaryResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		// Directory-style patterns ("vendor/") match everything beneath.
		let normalized = pattern
			.strip_suffix('/')
			.map_or_else(|| pattern.clone(), |stem| format!("{stem}/**"));
		let glob = Glob::new(&normalized)
			.map_err(|error| SummaryError::ConfigParse(format!("exclude pattern: {error}")))?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|error| SummaryError::ConfigParse(format!("exclude patterns: {error}")))
}
