use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SummaryError {
	#[error(transparent)]
	#[diagnostic(code(mdsum::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid heading pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(mdsum::invalid_pattern),
		help("heading patterns are compiled with the `regex` crate in multiline mode")
	)]
	InvalidHeadingPattern { pattern: String, reason: String },

	#[error("heading pattern `{pattern}` has no capture group {group}")]
	#[diagnostic(
		code(mdsum::missing_capture),
		help(
			"the pattern needs one capture group for the level indicator and one for the heading \
			 text"
		)
	)]
	MissingCapture { pattern: String, group: usize },

	#[error("line template `{template}` never references the heading text placeholder `{placeholder}`")]
	#[diagnostic(
		code(mdsum::template_mismatch),
		help("the template must contain `$<n>` where n is the display capture of the heading pattern")
	)]
	TemplateCaptureMismatch {
		template: String,
		placeholder: String,
	},

	#[error("invalid substitution pattern `{pattern}`: {reason}")]
	#[diagnostic(code(mdsum::invalid_substitution))]
	InvalidSubstitutionPattern { pattern: String, reason: String },

	#[error("unknown substitution function: `{0}`")]
	#[diagnostic(
		code(mdsum::unknown_function),
		help("available functions: lowercase, uppercase, uri_encode")
	)]
	UnknownSubstitutionFunction(String),

	#[error("substitution function `{function}` expects {expected} argument(s), got {got}")]
	#[diagnostic(code(mdsum::invalid_function_args))]
	InvalidFunctionArgs {
		function: String,
		expected: usize,
		got: usize,
	},

	#[error("alias points at unregistered profile: `{0}`")]
	#[diagnostic(
		code(mdsum::unknown_profile),
		help("register a `[profiles.{0}]` table in mdsum.toml or alias an existing profile")
	)]
	UnknownProfile(String),

	#[error("invalid level range: start_level {start} must be at least 1 and at most end_level {end}")]
	#[diagnostic(code(mdsum::invalid_level_range))]
	InvalidLevelRange { start: usize, end: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdsum::config_parse),
		help("check that mdsum.toml is valid TOML with [profiles] and/or [aliases] sections")
	)]
	ConfigParse(String),

	#[error("found {count} insertion markers, expected at most one")]
	#[diagnostic(
		code(mdsum::ambiguous_marker),
		help("remove the extra insertion markers, then run again")
	)]
	AmbiguousInsertMarker { count: usize },

	#[error("unbalanced summary markers (open marker found: {open}, close marker after it: {close})")]
	#[diagnostic(
		code(mdsum::unbalanced_markers),
		help("a summary block needs the open marker followed by the close marker")
	)]
	UnbalancedMarkers { open: bool, close: bool },

	#[error("substitution function `{function}` failed: {reason}")]
	#[diagnostic(code(mdsum::substitution_failure))]
	SubstitutionFailure { function: String, reason: String },

	#[error("file is not valid UTF-8: `{path}`")]
	#[diagnostic(code(mdsum::not_utf8))]
	NotUtf8 { path: String },
}

impl SummaryError {
	/// Per-file errors are isolated by the scanner and never abort the run.
	/// Every other variant is a configuration error, fatal before any file is
	/// touched.
	pub fn is_per_file(&self) -> bool {
		matches!(
			self,
			Self::Io(_)
				| Self::AmbiguousInsertMarker { .. }
				| Self::UnbalancedMarkers { .. }
				| Self::SubstitutionFailure { .. }
				| Self::NotUtf8 { .. }
		)
	}

	/// Marker problems are surfaced as warnings: the file is left unmodified
	/// rather than failed.
	pub fn is_marker_warning(&self) -> bool {
		matches!(
			self,
			Self::AmbiguousInsertMarker { .. } | Self::UnbalancedMarkers { .. }
		)
	}
}

pub type SummaryResult<T> = Result<T, SummaryError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
