use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use regex::Regex;
use regex::RegexBuilder;
use serde::Deserialize;

use crate::SummaryError;
use crate::SummaryResult;
use crate::profile::LanguageProfile;
use crate::profile::LevelMode;
use crate::profile::ProfileRegistry;
use crate::profile::SubstitutionFn;
use crate::profile::SubstitutionStep;
use crate::profile::TabUnit;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["mdsum.toml", ".mdsum.toml", ".config/mdsum.toml"];

/// Configuration loaded from an `mdsum.toml` file.
///
/// ```toml
/// [aliases]
/// mdown = "markdown"
///
/// [exclude]
/// patterns = ["vendor/", "node_modules/"]
///
/// [profiles.markdown]
/// start_level = 1
/// tab_size = 2
/// ```
///
/// A `[profiles.<name>]` table either overrides the built-in profile of that
/// name or registers a new document type. Keys left out of a profile table
/// fall back to the markdown defaults.
#[derive(Debug, Deserialize)]
pub struct SumConfig {
	/// Profile tables keyed by registry name.
	#[serde(default)]
	pub profiles: BTreeMap<String, ProfileSpec>,
	/// Extra file-extension aliases, extension → profile name.
	#[serde(default)]
	pub aliases: BTreeMap<String, String>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Maximum file size in bytes to scan. Files larger than this are
	/// skipped. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering. By default
	/// (`false`), mdsum respects `.gitignore` patterns and skips files that
	/// would be ignored by git.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// Exclusion configuration from the `[exclude]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style glob patterns to exclude from scanning.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Raw, uncompiled profile table. Every key is optional; unlisted keys take
/// the markdown defaults, which makes partial overrides of the built-in
/// profile natural:
///
/// ```toml
/// [profiles.markdown]
/// start_level = 1
/// end_level = 3
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileSpec {
	pub extensions: Vec<String>,
	pub insert_marker: String,
	pub open_marker: String,
	pub close_marker: String,
	pub heading_pattern: String,
	pub level_capture: usize,
	pub display_capture: usize,
	pub level_mode: LevelMode,
	pub level_indicator: char,
	pub start_level: usize,
	pub end_level: usize,
	pub tabulated: bool,
	pub tab_unit: TabUnit,
	pub tab_size: usize,
	pub tab_offset: i32,
	pub append_line_break: bool,
	pub line_template: String,
	pub substitutions: Vec<SubstitutionSpec>,
}

impl Default for ProfileSpec {
	/// The built-in markdown profile: ATX headings, `[](MakeSummary)` style
	/// markers, github-flavored anchors.
	fn default() -> Self {
		Self {
			extensions: vec!["md".to_string()],
			insert_marker: "[](MakeSummary)".to_string(),
			open_marker: "[](BeginSummary)".to_string(),
			close_marker: "[](EndSummary)".to_string(),
			heading_pattern: r"^\s*(#+)\s*(.*)$".to_string(),
			level_capture: 1,
			display_capture: 2,
			level_mode: LevelMode::Indicator,
			level_indicator: '#',
			start_level: 2,
			end_level: 9,
			tabulated: true,
			tab_unit: TabUnit::Space,
			tab_size: 4,
			tab_offset: 0,
			append_line_break: true,
			line_template: "$t* [$2](#$s)".to_string(),
			substitutions: vec![
				SubstitutionSpec::char_replace(r"\s", "-"),
				SubstitutionSpec::char_replace(r"\.", ""),
				SubstitutionSpec::char_replace("'", ""),
				SubstitutionSpec::char_replace("`", ""),
				SubstitutionSpec::char_replace(":", ""),
				SubstitutionSpec::char_replace("-{2,}", "-"),
				SubstitutionSpec::function("lowercase"),
				SubstitutionSpec::function("uri_encode"),
			],
		}
	}
}

/// Raw substitution pipeline entry: either a regex replacement or a named
/// function application.
///
/// ```toml
/// substitutions = [
/// 	{ pattern = '\s', replacement = "-" },
/// 	{ apply = "lowercase" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubstitutionSpec {
	CharReplace { pattern: String, replacement: String },
	Function {
		apply: String,
		#[serde(default)]
		args: Vec<String>,
	},
}

impl SubstitutionSpec {
	fn char_replace(pattern: &str, replacement: &str) -> Self {
		Self::CharReplace {
			pattern: pattern.to_string(),
			replacement: replacement.to_string(),
		}
	}

	fn function(apply: &str) -> Self {
		Self::Function {
			apply: apply.to_string(),
			args: Vec::new(),
		}
	}
}

impl ProfileSpec {
	/// Compile the raw table into an immutable [`LanguageProfile`],
	/// validating everything that would otherwise surface mid-run: the level
	/// range invariant, pattern compilation, capture group existence, the
	/// template/display-capture agreement, and substitution function names
	/// and arities. Any failure aborts before a single file is touched.
	pub fn compile(&self, name: &str) -> SummaryResult<LanguageProfile> {
		if self.start_level < 1 || self.start_level > self.end_level {
			return Err(SummaryError::InvalidLevelRange {
				start: self.start_level,
				end: self.end_level,
			});
		}

		let heading_pattern = RegexBuilder::new(&self.heading_pattern)
			.multi_line(true)
			.build()
			.map_err(|error| {
				SummaryError::InvalidHeadingPattern {
					pattern: self.heading_pattern.clone(),
					reason: error.to_string(),
				}
			})?;

		// captures_len counts group 0, so valid explicit groups are
		// 1..captures_len.
		for group in [self.level_capture, self.display_capture] {
			if group == 0 || group >= heading_pattern.captures_len() {
				return Err(SummaryError::MissingCapture {
					pattern: self.heading_pattern.clone(),
					group,
				});
			}
		}

		let placeholder = format!("${}", self.display_capture);
		if !self.line_template.contains(&placeholder) {
			return Err(SummaryError::TemplateCaptureMismatch {
				template: self.line_template.clone(),
				placeholder,
			});
		}

		let mut substitutions = Vec::with_capacity(self.substitutions.len());
		for spec in &self.substitutions {
			substitutions.push(match spec {
				SubstitutionSpec::CharReplace {
					pattern,
					replacement,
				} => {
					let compiled = Regex::new(pattern).map_err(|error| {
						SummaryError::InvalidSubstitutionPattern {
							pattern: pattern.clone(),
							reason: error.to_string(),
						}
					})?;
					SubstitutionStep::CharReplace {
						pattern: compiled,
						replacement: replacement.clone(),
					}
				}
				SubstitutionSpec::Function { apply, args } => {
					let id: SubstitutionFn = apply.parse()?;
					id.validate_args(args)?;
					SubstitutionStep::Function {
						id,
						args: args.clone(),
					}
				}
			});
		}

		Ok(LanguageProfile {
			name: name.to_string(),
			extensions: self
				.extensions
				.iter()
				.map(|extension| extension.trim_start_matches('.').to_lowercase())
				.collect(),
			insert_marker: self.insert_marker.clone(),
			open_marker: self.open_marker.clone(),
			close_marker: self.close_marker.clone(),
			heading_pattern,
			level_capture: self.level_capture,
			display_capture: self.display_capture,
			level_mode: self.level_mode,
			level_indicator: self.level_indicator,
			start_level: self.start_level,
			end_level: self.end_level,
			tabulated: self.tabulated,
			tab_unit: self.tab_unit,
			tab_size: self.tab_size,
			tab_offset: self.tab_offset,
			append_line_break: self.append_line_break,
			substitutions,
			line_template: self.line_template.clone(),
		})
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

/// Find the config file for a directory, checking
/// [`CONFIG_FILE_CANDIDATES`] in order.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
	CONFIG_FILE_CANDIDATES
		.iter()
		.map(|candidate| dir.join(candidate))
		.find(|path| path.is_file())
}

/// Load the config file for a directory, if one exists. A missing file is
/// not an error; a malformed one is fatal.
pub fn load_config(dir: &Path) -> SummaryResult<Option<SumConfig>> {
	let Some(path) = find_config_file(dir) else {
		return Ok(None);
	};

	tracing::debug!(path = %path.display(), "loading config file");
	let text = fs::read_to_string(&path)?;
	let config = toml::from_str(&text).map_err(|error| {
		SummaryError::ConfigParse(format!("{}: {error}", path.display()))
	})?;

	Ok(Some(config))
}

/// Build the read-only [`ProfileRegistry`] from the built-in profiles plus
/// an optional loaded config. Config profile tables override built-ins of
/// the same name; `[aliases]` entries extend the extension table.
pub fn build_registry(config: Option<&SumConfig>) -> SummaryResult<ProfileRegistry> {
	let mut specs: BTreeMap<String, ProfileSpec> = BTreeMap::new();
	specs.insert("markdown".to_string(), ProfileSpec::default());

	if let Some(config) = config {
		for (name, spec) in &config.profiles {
			specs.insert(name.clone(), spec.clone());
		}
	}

	let mut registry = ProfileRegistry::new();
	for (name, spec) in &specs {
		registry.register(spec.compile(name)?);
	}

	if let Some(config) = config {
		for (extension, profile) in &config.aliases {
			registry.add_alias(extension, profile)?;
		}
	}

	Ok(registry)
}
