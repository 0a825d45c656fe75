use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdsum_cli::Commands;
use mdsum_cli::OutputFormat;
use mdsum_cli::SumCli;
use mdsum_core::FileOutcome;
use mdsum_core::ScanOptions;
use mdsum_core::ScanReport;
use mdsum_core::config::build_registry;
use mdsum_core::config::load_config;
use mdsum_core::scanner::scan;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SumCli::parse();

	// Respect NO_COLOR, --no-color, and terminal capabilities.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	if args.verbose {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mdsum=debug")),
			)
			.with_writer(std::io::stderr)
			.init();
	}

	let result = match args.command {
		Some(Commands::Update { dry_run, diff }) => run_update(&args, dry_run, diff),
		Some(Commands::Check { format }) => run_check(&args, format),
		None => run_update(&args, false, false),
	};

	match result {
		Ok(code) => process::exit(code),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help
			// text and error codes.
			match e.downcast::<mdsum_core::SummaryError>() {
				Ok(sum_err) => {
					let report: miette::Report = (*sum_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

fn resolve_root(args: &SumCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load config, build the profile registry, and scan the root. All
/// configuration problems surface here, before any file is touched.
fn scan_root(
	args: &SumCli,
	root: &Path,
	dry_run: bool,
) -> Result<ScanReport, Box<dyn std::error::Error>> {
	let config = load_config(root)?;
	let registry = build_registry(config.as_ref())?;

	let mut options = ScanOptions::from_config(config.as_ref());
	options.recursive = args.recursive;
	options.dry_run = dry_run;

	Ok(scan(root, &registry, &options)?)
}

fn run_update(
	args: &SumCli,
	dry_run: bool,
	show_diff: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let report = scan_root(args, &root, dry_run)?;

	for file in &report.reports {
		let rel = make_relative(&file.path, &root);
		match &file.outcome {
			FileOutcome::Inserted { headings } => {
				println!(
					"{} {rel} ({headings} heading(s))",
					colored!("inserted", green)
				);
			}
			FileOutcome::Updated { headings } => {
				println!("{} {rel} ({headings} heading(s))", colored!("updated", green));
			}
			FileOutcome::UpToDate => {
				if args.verbose {
					println!("{} {rel}", colored!("up to date", bold));
				}
			}
			FileOutcome::Skipped => {
				if args.verbose {
					println!("{} {rel} (no summary marker)", colored!("skipped", bold));
				}
			}
			FileOutcome::Warning { message } => {
				println!("{} {rel}: {message}", colored!("warning:", yellow));
			}
			FileOutcome::Failed { message } => {
				println!("{} {rel}: {message}", colored!("failed:", red));
			}
		}

		if show_diff {
			if let Some(change) = &file.change {
				print_diff(&change.before, &change.after);
			}
		}
	}

	if report.changed() == 0 && report.warnings() == 0 && report.failures() == 0 {
		println!("All summaries are already up to date.");
	} else {
		println!("{}", report_summary(&report));
	}

	if dry_run && report.changed() > 0 {
		println!("Dry run: nothing was written.");
	}

	Ok(i32::from(report.has_failures()))
}

fn run_check(args: &SumCli, format: OutputFormat) -> Result<i32, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	// Checking never writes.
	let report = scan_root(args, &root, true)?;

	let ok = report.changed() == 0 && !report.has_failures();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = report
				.reports
				.iter()
				.map(|file| {
					let mut entry = serde_json::json!({
						"file": make_relative(&file.path, &root),
						"status": file.outcome.label(),
					});
					match &file.outcome {
						FileOutcome::Inserted { headings } | FileOutcome::Updated { headings } => {
							entry["headings"] = serde_json::json!(headings);
						}
						FileOutcome::Warning { message } | FileOutcome::Failed { message } => {
							entry["message"] = serde_json::json!(message);
						}
						_ => {}
					}
					entry
				})
				.collect();
			let output = serde_json::json!({ "ok": ok, "files": entries });
			println!("{output}");
		}
		OutputFormat::Text => {
			if ok {
				println!("Check passed: all summaries are up to date.");
			} else {
				for file in &report.reports {
					let rel = make_relative(&file.path, &root);
					match &file.outcome {
						FileOutcome::Inserted { .. } | FileOutcome::Updated { .. } => {
							eprintln!("{} {rel}", colored!("stale:", red));
						}
						FileOutcome::Failed { message } => {
							eprintln!("{} {rel}: {message}", colored!("failed:", red));
						}
						_ => {}
					}
				}
				eprintln!();
				eprintln!(
					"Check failed: {} file(s) out of date. Run `mdsum update` to fix.",
					report.changed()
				);
			}
		}
	}

	Ok(i32::from(!ok))
}

fn report_summary(report: &ScanReport) -> String {
	let mut parts = Vec::new();
	if report.inserted() > 0 {
		parts.push(format!("{} inserted", report.inserted()));
	}
	if report.updated() > 0 {
		parts.push(format!("{} updated", report.updated()));
	}
	if report.up_to_date() > 0 {
		parts.push(format!("{} up to date", report.up_to_date()));
	}
	if report.skipped() > 0 {
		parts.push(format!("{} skipped", report.skipped()));
	}
	if report.warnings() > 0 {
		parts.push(format!("{} warning(s)", report.warnings()));
	}
	if report.failures() > 0 {
		parts.push(format!("{} failure(s)", report.failures()));
	}

	if parts.is_empty() {
		"No matching files found.".to_string()
	} else {
		parts.join(", ")
	}
}

fn print_diff(before: &str, after: &str) {
	let diff = TextDiff::from_lines(before, after);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
