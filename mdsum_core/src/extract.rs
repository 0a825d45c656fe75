use crate::profile::LanguageProfile;
use crate::profile::LevelMode;

/// One heading matched by a profile's heading pattern, in document order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeadingRecord {
	/// The full matched text.
	pub raw_match: String,
	/// The level-indicator capture (e.g. `"##"`).
	pub level_text: String,
	/// The display-text capture, untrimmed.
	pub display_text: String,
	/// Computed nesting depth, 1-indexed for indicator-based profiles.
	pub depth: usize,
}

/// Run the profile's heading pattern over the whole document, once, in
/// multiline mode. Every match becomes a [`HeadingRecord`]; a document
/// without headings yields an empty vec, not an error.
pub fn extract_headings(text: &str, profile: &LanguageProfile) -> Vec<HeadingRecord> {
	let mut headings = Vec::new();

	for captures in profile.heading_pattern.captures_iter(text) {
		let level_text = captures
			.get(profile.level_capture)
			.map_or("", |capture| capture.as_str());
		let display_text = captures
			.get(profile.display_capture)
			.map_or("", |capture| capture.as_str());

		let depth = match profile.level_mode {
			LevelMode::Indicator => {
				level_text
					.chars()
					.filter(|&c| c == profile.level_indicator)
					.count()
			}
			LevelMode::Numeric => 0,
		};

		headings.push(HeadingRecord {
			raw_match: captures[0].to_string(),
			level_text: level_text.to_string(),
			display_text: display_text.to_string(),
			depth,
		});
	}

	tracing::trace!(count = headings.len(), "extracted headings");
	headings
}
