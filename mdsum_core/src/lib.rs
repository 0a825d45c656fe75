//! `mdsum_core` is the core library for the [mdsum](https://github.com/ndupre/mdsum)
//! summary generator. It scans documents for summary markers, extracts
//! headings through a configurable pattern, and generates or refreshes an
//! anchor-linked table-of-contents block in place.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document text
//!   → Marker probe (insert marker, or open/close pair → insert vs. update)
//!   → Heading extractor (multiline pattern, depth from the indicator run)
//!   → Anchor substitution (ordered regex replacements + named functions)
//!   → Entry formatter (template with $t / $s / $<n> placeholders)
//!   → Assembler (splices the regenerated block back into the text)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `mdsum.toml`: profile tables,
//!   extension aliases, and exclude patterns.
//! - [`profile`] — The compiled [`LanguageProfile`] and the read-only
//!   [`ProfileRegistry`] mapping file extensions onto profiles.
//! - [`scanner`] — Directory walking: resolves a profile per file, runs the
//!   pipeline, writes changes back, and reports per-file outcomes.
//!
//! ## Key Types
//!
//! - [`LanguageProfile`] — How to detect and summarize one document type.
//! - [`HeadingRecord`] — One matched heading with its computed depth.
//! - [`SummaryOutcome`] — New text, change flag, and admitted heading count
//!   for one processed document.
//! - [`ScanReport`] — Per-file outcomes of a directory scan.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use mdsum_core::config::{build_registry, load_config};
//! use mdsum_core::scanner::{ScanOptions, scan};
//!
//! # fn main() -> mdsum_core::SummaryResult<()> {
//! let root = Path::new(".");
//! let config = load_config(root)?;
//! let registry = build_registry(config.as_ref())?;
//!
//! let report = scan(root, &registry, &ScanOptions::default())?;
//! println!("{} file(s) changed", report.changed());
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use extract::*;
pub use format::*;
pub use profile::*;
pub use scanner::*;
pub use substitute::*;

pub mod config;
mod engine;
mod error;
mod extract;
mod format;
pub mod profile;
pub mod scanner;
mod substitute;

#[cfg(test)]
mod __fixtures;
