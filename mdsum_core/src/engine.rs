use crate::SummaryError;
use crate::SummaryResult;
use crate::extract::extract_headings;
use crate::format::format_entry;
use crate::profile::LanguageProfile;
use crate::substitute::compute_anchor;

/// The action decided for a document after probing its markers. Determined
/// once per document and never revisited during a run.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
	/// The insertion marker is present; a fresh block replaces it.
	Insert,
	/// An open/close pair is present; the block between them is regenerated.
	Update,
	/// No marker of any kind; the document is left untouched.
	NoAction,
}

/// Result of processing one document.
#[derive(Debug)]
pub struct SummaryOutcome {
	/// The document text after processing. Equal to the input in
	/// [`SummaryMode::NoAction`] or when an update regenerated identical
	/// content.
	pub new_text: String,
	/// Whether `new_text` differs from the input.
	pub changed: bool,
	/// Number of headings admitted into the summary body.
	pub heading_count: usize,
	/// The action taken.
	pub mode: SummaryMode,
}

/// Generate or refresh the summary block of one document.
///
/// Probes for markers, extracts headings, renders the admitted ones into the
/// summary body, and splices the regenerated block back into the text. The
/// caller owns persistence. Running `process` on its own output is
/// byte-identical: the block written on insertion is exactly what an update
/// regenerates.
pub fn process(text: &str, profile: &LanguageProfile) -> SummaryResult<SummaryOutcome> {
	let mode = probe(text, profile)?;
	tracing::debug!(?mode, profile = %profile.name, "marker probe");

	if mode == SummaryMode::NoAction {
		return Ok(SummaryOutcome {
			new_text: text.to_string(),
			changed: false,
			heading_count: 0,
			mode,
		});
	}

	let (body, heading_count) = build_summary_body(text, profile)?;
	let block = format!("{}\n{}{}", profile.open_marker, body, profile.close_marker);

	let new_text = if mode == SummaryMode::Insert {
		text.replacen(&profile.insert_marker, &block, 1)
	} else {
		splice_block(text, profile, &block)
	};

	let changed = new_text != text;
	Ok(SummaryOutcome {
		new_text,
		changed,
		heading_count,
		mode,
	})
}

/// Decide the processing mode by probing the document for markers. Presence
/// checks are literal substring searches — marker text is never interpreted
/// as a pattern.
///
/// The insertion marker wins over an open/close pair; more than one
/// insertion marker, or an incomplete open/close pair, is ambiguous and the
/// document must be left unmodified rather than guessed at.
fn probe(text: &str, profile: &LanguageProfile) -> SummaryResult<SummaryMode> {
	let inserts = count_occurrences(text, &profile.insert_marker);
	if inserts > 1 {
		return Err(SummaryError::AmbiguousInsertMarker { count: inserts });
	}
	if inserts == 1 {
		return Ok(SummaryMode::Insert);
	}

	let open = text.find(&profile.open_marker);
	let close_present = text.contains(&profile.close_marker);

	match open {
		Some(open_start) => {
			// The close marker must occur after the open marker to bound a span.
			let after_open = open_start + profile.open_marker.len();
			if text[after_open..].contains(&profile.close_marker) {
				Ok(SummaryMode::Update)
			} else {
				Err(SummaryError::UnbalancedMarkers {
					open: true,
					close: false,
				})
			}
		}
		None if close_present => {
			Err(SummaryError::UnbalancedMarkers {
				open: false,
				close: true,
			})
		}
		None => Ok(SummaryMode::NoAction),
	}
}

/// Extract, filter, and format the document's headings into the summary
/// body, in document order. Headings outside the admitted level range are
/// skipped and not counted.
fn build_summary_body(text: &str, profile: &LanguageProfile) -> SummaryResult<(String, usize)> {
	let mut body = String::new();
	let mut admitted = 0;

	for heading in extract_headings(text, profile) {
		if !profile.admits(heading.depth) {
			tracing::trace!(depth = heading.depth, text = %heading.display_text.trim(), "level excluded");
			continue;
		}

		let anchor = compute_anchor(heading.display_text.trim(), profile)?;
		body.push_str(&format_entry(&heading, profile, &anchor));
		admitted += 1;
	}

	Ok((body, admitted))
}

/// Replace the first open..close span, markers included, with the freshly
/// rendered block. Splicing is offset-based so every byte outside the span
/// is preserved exactly.
fn splice_block(text: &str, profile: &LanguageProfile, block: &str) -> String {
	let Some(open_start) = text.find(&profile.open_marker) else {
		return text.to_string();
	};
	let search_from = open_start + profile.open_marker.len();
	let Some(close_offset) = text[search_from..].find(&profile.close_marker) else {
		return text.to_string();
	};
	let span_end = search_from + close_offset + profile.close_marker.len();

	let mut spliced = String::with_capacity(text.len() - (span_end - open_start) + block.len());
	spliced.push_str(&text[..open_start]);
	spliced.push_str(block);
	spliced.push_str(&text[span_end..]);
	spliced
}

/// Count non-overlapping literal occurrences of `needle` in `haystack`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
	if needle.is_empty() {
		return 0;
	}

	let mut count = 0;
	let mut from = 0;
	while let Some(index) = haystack[from..].find(needle) {
		count += 1;
		from += index + needle.len();
	}

	count
}
