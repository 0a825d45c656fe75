use crate::SummaryResult;
use crate::profile::LanguageProfile;
use crate::profile::SubstitutionFn;
use crate::profile::SubstitutionStep;

/// Transform a heading's display text into its URL-safe anchor by running
/// the profile's substitution pipeline: first the character replacements,
/// then the named functions, each step feeding the next in declaration
/// order. Pure — repeated calls with the same input yield the same output.
/// Empty input yields empty output.
pub fn compute_anchor(display_text: &str, profile: &LanguageProfile) -> SummaryResult<String> {
	let mut working = display_text.to_string();

	for step in &profile.substitutions {
		let next = match step {
			SubstitutionStep::CharReplace {
				pattern,
				replacement,
			} => {
				pattern
					.replace_all(&working, replacement.as_str())
					.into_owned()
			}
			SubstitutionStep::Function { id, args } => apply_function(*id, &working, args)?,
		};

		tracing::trace!(from = %working, to = %next, "substitution step");
		working = next;
	}

	Ok(working)
}

/// Dispatch a named function through the registry. Functions are pure
/// `String → String` transforms; a failure on unexpected input propagates as
/// a per-file error so a heading is never silently dropped from the summary.
fn apply_function(id: SubstitutionFn, input: &str, _args: &[String]) -> SummaryResult<String> {
	match id {
		SubstitutionFn::Lowercase => Ok(input.to_lowercase()),
		SubstitutionFn::Uppercase => Ok(input.to_uppercase()),
		SubstitutionFn::UriEncode => Ok(uri_encode(input)),
	}
}

/// Characters besides ASCII alphanumerics left untouched: the URI unreserved
/// marks plus the reserved set, matching ECMAScript's `encodeURI`.
const URI_UNESCAPED: &str = "-_.!~*'();/?:@&=+$,#";

/// Percent-encode every byte outside [`URI_UNESCAPED`]; multibyte characters
/// are encoded byte by byte.
fn uri_encode(input: &str) -> String {
	let mut encoded = String::with_capacity(input.len());

	for byte in input.bytes() {
		if byte.is_ascii_alphanumeric() || URI_UNESCAPED.contains(byte as char) {
			encoded.push(byte as char);
		} else {
			encoded.push_str(&format!("%{byte:02X}"));
		}
	}

	encoded
}
