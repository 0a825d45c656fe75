use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate and refresh summary blocks for the documents in a directory tree.",
	long_about = "mdsum scans a directory for documents carrying a summary marker and generates \
	              or refreshes a table-of-contents block derived from each document's heading \
	              structure.\n\nPlace `[](MakeSummary)` where the summary should appear in a \
	              markdown file, then run `mdsum`. The generated block is wrapped in \
	              `[](BeginSummary)`/`[](EndSummary)` markers and regenerated in place on every \
	              subsequent run.\n\nQuick start:\n  mdsum update   Generate or refresh all \
	              summaries\n  mdsum check    Verify summaries are current (CI friendly)"
)]
pub struct SumCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory to scan.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Descend into subdirectories.
	#[arg(long, short, global = true, default_value_t = false)]
	pub recursive: bool,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate or refresh summary blocks, writing files in place.
	///
	/// Scans every file with a registered profile, probes for the insertion
	/// marker or an existing open/close pair, and splices the regenerated
	/// summary block back into the file. Running without a subcommand does
	/// the same thing.
	///
	/// Use `--dry-run` to preview changes without writing to disk, and
	/// `--diff` to see exactly what would change.
	Update {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a unified diff for each pending change.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Verify every summary block is current without writing.
	///
	/// Exits with a non-zero status code when any file would change, which
	/// makes it suitable for CI pipelines. Use `--format json` for
	/// programmatic consumption.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path, status, and admitted heading count.
	Json,
}
