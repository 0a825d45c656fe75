use crate::extract::HeadingRecord;
use crate::profile::LanguageProfile;

/// Render one summary line from a heading record, the profile's line
/// template, and a precomputed anchor. The caller filters out headings whose
/// depth falls outside the admitted level range before calling this.
///
/// Placeholder replacement is literal-substring, first occurrence: `$t`
/// becomes the computed indentation (or nothing when tabulation is off),
/// `$<display_capture>` becomes the whitespace-trimmed heading text, and
/// `$s` becomes the anchor.
pub fn format_entry(heading: &HeadingRecord, profile: &LanguageProfile, anchor: &str) -> String {
	let indent = if profile.tabulated {
		tabulation(profile, heading.depth)
	} else {
		String::new()
	};

	let mut entry = profile.line_template.replacen("$t", &indent, 1);
	entry = entry.replacen(&profile.display_placeholder(), heading.display_text.trim(), 1);
	entry = entry.replacen("$s", anchor, 1);

	if profile.append_line_break {
		entry.push('\n');
	}

	entry
}

/// Indentation for a heading: depth is rebased so the first admitted level
/// sits flush left, then shifted by the configured offset and scaled by the
/// tab size. A negative count is nonsensical for output and collapses to no
/// indentation.
fn tabulation(profile: &LanguageProfile, depth: usize) -> String {
	let natural_offset = 1 - profile.start_level as i64;
	let units = (depth as i64 - 1 + i64::from(profile.tab_offset) + natural_offset)
		* profile.tab_size as i64;

	profile
		.tab_unit
		.as_str()
		.repeat(usize::try_from(units).unwrap_or(0))
}
