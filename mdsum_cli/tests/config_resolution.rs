use assert_cmd::Command;
use mdsum_core::AnyEmptyResult;

#[test]
fn config_overrides_the_builtin_profile() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("mdsum.toml"),
		"[profiles.markdown]\nstart_level = 1\ntab_size = 2\n",
	)?;
	std::fs::write(
		tmp.path().join("readme.md"),
		"# Title\n## Sub A\n[](MakeSummary)\n",
	)?;

	let mut cmd = Command::cargo_bin("mdsum")?;
	cmd.env("NO_COLOR", "1")
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	// start_level 1 admits the title; tab_size 2 halves the indentation.
	let content = std::fs::read_to_string(tmp.path().join("readme.md"))?;
	assert!(content.contains("* [Title](#title)"));
	assert!(content.contains("  * [Sub A](#sub-a)"));

	Ok(())
}

#[test]
fn config_aliases_extend_the_extension_table() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("mdsum.toml"), "[aliases]\nmdown = \"markdown\"\n")?;
	std::fs::write(tmp.path().join("notes.mdown"), "## Sub\n[](MakeSummary)\n")?;

	let mut cmd = Command::cargo_bin("mdsum")?;
	cmd.env("NO_COLOR", "1")
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("inserted"));

	let content = std::fs::read_to_string(tmp.path().join("notes.mdown"))?;
	assert!(content.contains("* [Sub](#sub)"));

	Ok(())
}

#[test]
fn config_exclude_patterns_are_respected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(
		tmp.path().join("mdsum.toml"),
		"[exclude]\npatterns = [\"vendor/\"]\n",
	)?;
	std::fs::create_dir(tmp.path().join("vendor"))?;
	let vendored = "## Sub\n[](MakeSummary)\n";
	std::fs::write(tmp.path().join("vendor/readme.md"), vendored)?;

	let mut cmd = Command::cargo_bin("mdsum")?;
	cmd.env("NO_COLOR", "1")
		.arg("update")
		.arg("--recursive")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("vendor/readme.md"))?;
	assert_eq!(content, vendored);

	Ok(())
}

#[test]
fn invalid_config_aborts_before_touching_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	// Broken heading pattern: fatal at startup, not per file.
	std::fs::write(
		tmp.path().join("mdsum.toml"),
		"[profiles.markdown]\nheading_pattern = \"([unclosed\"\n",
	)?;
	let original = "## Sub\n[](MakeSummary)\n";
	std::fs::write(tmp.path().join("readme.md"), original)?;

	let mut cmd = Command::cargo_bin("mdsum")?;
	cmd.env("NO_COLOR", "1")
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2);

	let content = std::fs::read_to_string(tmp.path().join("readme.md"))?;
	assert_eq!(content, original);

	Ok(())
}

#[test]
fn unknown_alias_target_is_a_configuration_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("mdsum.toml"), "[aliases]\nadoc = \"asciidoc\"\n")?;

	let mut cmd = Command::cargo_bin("mdsum")?;
	cmd.env("NO_COLOR", "1")
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("asciidoc"));

	Ok(())
}
