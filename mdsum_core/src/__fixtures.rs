use crate::config::ProfileSpec;
use crate::profile::LanguageProfile;
use crate::profile::TabUnit;

/// The built-in markdown profile, compiled.
pub fn markdown_profile() -> LanguageProfile {
	ProfileSpec::default().compile("markdown").unwrap()
}

/// Markdown profile variant indenting with one tab character per level.
pub fn tab_indented_profile() -> LanguageProfile {
	let spec = ProfileSpec {
		tab_unit: TabUnit::Tab,
		tab_size: 1,
		..ProfileSpec::default()
	};
	spec.compile("markdown").unwrap()
}

/// Markdown profile variant admitting every level from 1.
pub fn full_range_profile() -> LanguageProfile {
	let spec = ProfileSpec {
		start_level: 1,
		..ProfileSpec::default()
	};
	spec.compile("markdown").unwrap()
}

/// A document carrying the insertion marker.
pub const FRESH_DOC: &str = "# Title\n## Sub A\n### Sub B\n[](MakeSummary)\n";

/// [`FRESH_DOC`] after one processing pass: the block the engine writes and
/// regenerates verbatim on subsequent passes.
pub const SUMMARIZED_DOC: &str = "# Title\n## Sub A\n### Sub B\n[](BeginSummary)\n* [Sub \
                                  A](#sub-a)\n    * [Sub B](#sub-b)\n[](EndSummary)\n";
