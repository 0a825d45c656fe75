use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;

use crate::SummaryError;
use crate::SummaryResult;

/// The character unit used for one tabulation step in summary lines.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TabUnit {
	/// A run of space characters, `tab_size` per level.
	#[default]
	Space,
	/// A single tab character per level.
	Tab,
}

impl TabUnit {
	/// The string repeated to build one unit of indentation.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Space => " ",
			Self::Tab => "\t",
		}
	}
}

/// How the level capture of the heading pattern encodes depth.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LevelMode {
	/// Depth is the number of occurrences of the level indicator character in
	/// the level capture (e.g. counting `#` in an ATX heading).
	#[default]
	Indicator,
	/// Reserved for patterns whose level capture is a number. Not implemented:
	/// headings extracted in this mode always get depth 0.
	Numeric,
}

/// Named pure string transforms available to the substitution pipeline.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SubstitutionFn {
	/// Unicode-aware lowercasing.
	Lowercase,
	/// Unicode-aware uppercasing.
	Uppercase,
	/// Percent-encode every byte outside the URI unreserved and reserved
	/// sets, multibyte characters byte by byte.
	UriEncode,
}

impl SubstitutionFn {
	/// Number of auxiliary arguments the function accepts.
	pub fn arity(self) -> usize {
		match self {
			Self::Lowercase | Self::Uppercase | Self::UriEncode => 0,
		}
	}

	/// Validate the configured auxiliary arguments against the function's
	/// arity.
	pub fn validate_args(self, args: &[String]) -> SummaryResult<()> {
		if args.len() == self.arity() {
			Ok(())
		} else {
			Err(SummaryError::InvalidFunctionArgs {
				function: self.to_string(),
				expected: self.arity(),
				got: args.len(),
			})
		}
	}
}

impl FromStr for SubstitutionFn {
	type Err = SummaryError;

	fn from_str(value: &str) -> SummaryResult<Self> {
		match value {
			"lowercase" => Ok(Self::Lowercase),
			"uppercase" => Ok(Self::Uppercase),
			"uri_encode" => Ok(Self::UriEncode),
			other => Err(SummaryError::UnknownSubstitutionFunction(other.to_string())),
		}
	}
}

impl std::fmt::Display for SubstitutionFn {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Lowercase => "lowercase",
			Self::Uppercase => "uppercase",
			Self::UriEncode => "uri_encode",
		};
		write!(f, "{name}")
	}
}

/// One step of the anchor substitution pipeline. Steps run strictly in
/// declaration order, each feeding the next.
#[derive(Debug, Clone)]
pub enum SubstitutionStep {
	/// Replace every match of `pattern` with `replacement`.
	CharReplace { pattern: Regex, replacement: String },
	/// Apply a named pure transform with its configured arguments.
	Function {
		id: SubstitutionFn,
		args: Vec<String>,
	},
}

/// Immutable, compiled configuration describing how to detect and summarize
/// one document type. Constructed once at startup (built-in defaults or
/// `mdsum.toml`) and read-only during processing.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
	/// Registry key, e.g. `"markdown"`.
	pub name: String,
	/// File extensions (lowercase, no dot) handled by this profile.
	pub extensions: Vec<String>,
	/// Literal token that requests a fresh summary insertion.
	pub insert_marker: String,
	/// Literal token opening a previously generated summary block.
	pub open_marker: String,
	/// Literal token closing a previously generated summary block.
	pub close_marker: String,
	/// Multiline pattern matching one heading per line. Group
	/// `level_capture` holds the level indicator run, group `display_capture`
	/// the heading text.
	pub heading_pattern: Regex,
	/// 1-indexed capture group carrying the level indicator.
	pub level_capture: usize,
	/// 1-indexed capture group carrying the heading display text.
	pub display_capture: usize,
	/// How depth is derived from the level capture.
	pub level_mode: LevelMode,
	/// Character counted to compute depth in [`LevelMode::Indicator`].
	pub level_indicator: char,
	/// Smallest admitted depth (inclusive, ≥ 1).
	pub start_level: usize,
	/// Largest admitted depth (inclusive).
	pub end_level: usize,
	/// Whether summary lines are indented by depth.
	pub tabulated: bool,
	/// Unit character for one indentation step.
	pub tab_unit: TabUnit,
	/// Tab units per depth level.
	pub tab_size: usize,
	/// Extra depth offset applied before indentation, may be negative.
	pub tab_offset: i32,
	/// Whether each rendered line ends with a line break.
	pub append_line_break: bool,
	/// Anchor substitution pipeline, in declaration order.
	pub substitutions: Vec<SubstitutionStep>,
	/// Output template with `$t` (tabulation), `$s` (anchor) and `$<n>`
	/// (heading pattern capture) placeholders.
	pub line_template: String,
}

impl LanguageProfile {
	/// Whether a heading of the given depth is admitted into the summary.
	pub fn admits(&self, depth: usize) -> bool {
		(self.start_level..=self.end_level).contains(&depth)
	}

	/// The `$<n>` placeholder the line template uses for the heading text.
	pub fn display_placeholder(&self) -> String {
		format!("${}", self.display_capture)
	}
}

/// Read-only lookup from file extension to [`LanguageProfile`], built once at
/// process start and shared by the scanner.
///
/// Extensions resolve through an alias table, so several extensions can point
/// at the same profile (`md` and `mdown` both mapping to `markdown`).
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
	profiles: BTreeMap<String, LanguageProfile>,
	aliases: BTreeMap<String, String>,
}

impl ProfileRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a profile and seed the alias table with its extensions.
	pub fn register(&mut self, profile: LanguageProfile) {
		for extension in &profile.extensions {
			self.aliases
				.insert(extension.to_lowercase(), profile.name.clone());
		}
		self.profiles.insert(profile.name.clone(), profile);
	}

	/// Map an extra file extension onto a registered profile. Pointing an
	/// alias at an unregistered profile is a configuration error.
	pub fn add_alias(&mut self, extension: &str, profile: &str) -> SummaryResult<()> {
		if !self.profiles.contains_key(profile) {
			return Err(SummaryError::UnknownProfile(profile.to_string()));
		}

		let key = extension.trim_start_matches('.').to_lowercase();
		self.aliases.insert(key, profile.to_string());
		Ok(())
	}

	/// Look up a profile by registry name.
	pub fn get(&self, name: &str) -> Option<&LanguageProfile> {
		self.profiles.get(name)
	}

	/// Resolve the profile responsible for a file, by extension through the
	/// alias table. Files without a match are outside mdsum's scope.
	pub fn resolve(&self, filename: &str) -> Option<&LanguageProfile> {
		let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
		let name = self.aliases.get(&extension)?;
		self.profiles.get(name)
	}

	/// Iterate the registered profiles in name order.
	pub fn profiles(&self) -> impl Iterator<Item = &LanguageProfile> {
		self.profiles.values()
	}

	pub fn is_empty(&self) -> bool {
		self.profiles.is_empty()
	}
}
