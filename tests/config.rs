// tests/config.rs

use std::error::Error;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use tempfile::NamedTempFile;
use watchrun::cli::{split_patterns, CliArgs};
use watchrun::config::{default_config_path, load_from_path, load_or_default, resolve, ConfigFile};
use watchrun::errors::WatchrunError;

type TestResult = Result<(), Box<dyn Error>>;

fn args_for(config: &Path) -> CliArgs {
    CliArgs {
        config: config.to_string_lossy().into_owned(),
        dir: None,
        pattern: None,
        save: false,
        log_level: None,
        command: vec![],
    }
}

#[test]
fn missing_file_yields_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_or_default(dir.path().join("Watchrun.toml"))?;
    assert_eq!(cfg, ConfigFile::default());
    assert_eq!(cfg.directory, ".");
    assert_eq!(cfg.patterns, vec!["*".to_string()]);
    assert!(cfg.command.is_empty());
    Ok(())
}

#[test]
fn malformed_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "patterns = \"not-an-array\"").unwrap();

    match load_or_default(file.path()) {
        Err(WatchrunError::TomlParse(_)) => {}
        other => panic!("expected a parse error, got: {other:?}"),
    }
}

#[test]
fn partial_file_fills_in_defaults() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "patterns = [\"*.rs\"]")?;

    let cfg = load_from_path(file.path())?;
    assert_eq!(cfg.directory, ".");
    assert_eq!(cfg.patterns, vec!["*.rs".to_string()]);
    assert!(cfg.command.is_empty());
    Ok(())
}

#[test]
fn cli_flags_override_file_values_field_wise() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
directory = "src"
patterns = ["*.go"]
command = ["go", "build"]
"#
    )?;

    let mut args = args_for(file.path());
    args.pattern = Some("*.rs *.toml".to_string());

    let cfg = resolve(&args)?;
    // Only the pattern flag was given; the file keeps the other two fields.
    assert_eq!(cfg.directory, "src");
    assert_eq!(cfg.patterns, vec!["*.rs".to_string(), "*.toml".to_string()]);
    assert_eq!(cfg.command, vec!["go".to_string(), "build".to_string()]);
    Ok(())
}

#[test]
fn blank_pattern_flag_keeps_the_file_patterns() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "patterns = [\"*.go\"]")?;

    let mut args = args_for(file.path());
    args.pattern = Some("  ,  ".to_string());

    let cfg = resolve(&args)?;
    assert_eq!(cfg.patterns, vec!["*.go".to_string()]);
    Ok(())
}

#[test]
fn save_writes_the_resolved_options_back() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Watchrun.toml");

    let mut args = args_for(&path);
    args.dir = Some("server".to_string());
    args.pattern = Some("*.py".to_string());
    args.command = vec!["python".to_string(), "app.py".to_string()];
    args.save = true;

    let resolved = resolve(&args)?;
    let reloaded = load_from_path(&path)?;
    assert_eq!(reloaded, resolved);
    assert_eq!(reloaded.directory, "server");
    Ok(())
}

#[test]
fn omitted_config_flag_falls_back_to_the_default_path() -> TestResult {
    let args = CliArgs::try_parse_from(["watchrun"])?;
    assert_eq!(args.config, default_config_path());
    Ok(())
}

#[test]
fn split_patterns_handles_commas_and_whitespace() {
    assert_eq!(split_patterns("*.go,*.html"), vec!["*.go", "*.html"]);
    assert_eq!(
        split_patterns("*.go, *.html  *.css"),
        vec!["*.go", "*.html", "*.css"]
    );
    assert!(split_patterns("  , ").is_empty());
}
