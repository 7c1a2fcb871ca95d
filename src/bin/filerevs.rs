//! Replay a bundler stats document through the revision plugin and write its manifest.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use filerevs::{
  BuildPlugin, CompilationStats, Manifest, OutputTemplates, PluginDriver, RevsConfig, RevsPlugin,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "filerevs")]
#[command(version, about = "Write a revision manifest from bundler stats", long_about = None)]
struct Cli {
  /// Stats JSON emitted by the bundler
  stats: PathBuf,

  /// Configuration file (defaults to ./filerevs.config.json when present)
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Override the manifest destination
  #[arg(short, long, value_name = "PATH")]
  output: Option<PathBuf>,

  /// Chunk filename template used by the bundler
  #[arg(long, value_name = "TEMPLATE")]
  filename: Option<String>,

  /// Hot-update chunk filename template used by the bundler
  #[arg(long = "hot-update", value_name = "TEMPLATE")]
  hot_update: Option<String>,

  /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn init_logging(verbosity: u8) {
  let level = match verbosity {
    0 => Level::INFO,
    1 => Level::DEBUG,
    _ => Level::TRACE,
  };

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("warn"))
    .add_directive(level.into());

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let manifest = run(cli, &std::env::current_dir()?)?;
  println!("{}", manifest.to_json()?);
  Ok(())
}

/// Run one compilation lifecycle for `cli.stats` and return the manifest that was written.
///
/// Without `--config`, `filerevs.config.json` is looked up in `cwd`. Stats without an
/// `outputPath` write next to the stats file.
fn run(cli: Cli, cwd: &Path) -> Result<Manifest> {
  let config = match &cli.config {
    Some(path) => RevsConfig::from_path(path)?,
    None => RevsConfig::discover(cwd),
  };
  let mut options = config.into_options()?;
  if let Some(output) = cli.output {
    options = options.with_output(output);
  }

  let content = fs::read_to_string(&cli.stats)
    .with_context(|| format!("failed to read {}", cli.stats.display()))?;
  let mut stats: CompilationStats = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse stats JSON {}", cli.stats.display()))?;
  if stats.output_path.is_none() {
    stats.output_path = cli.stats.parent().map(PathBuf::from);
  }

  let templates = OutputTemplates {
    filename: cli.filename,
    hot_update_chunk_filename: cli.hot_update,
  };

  let written = Rc::new(RefCell::new(Manifest::default()));
  let mut plugin = RevsPlugin::new(options);
  let captured = Rc::clone(&written);
  plugin.hooks_mut().on_transform(move |manifest, _| {
    *captured.borrow_mut() = manifest.clone();
    manifest
  });

  let plugins: Vec<Box<dyn BuildPlugin>> = vec![Box::new(plugin)];
  let mut driver = PluginDriver::new(plugins);
  driver.apply(&templates);
  driver.compilation(&stats);
  driver.emit(&stats)?;
  driver.after_emit(&stats)?;
  driver.done(&stats);

  Ok(written.take())
}

#[cfg(test)]
mod tests {
  use super::*;
  use filerevs::load_manifest;
  use tempfile::tempdir;

  const STATS: &str = r#"{
    "hash": "a1b2c3d4",
    "assetsByChunkName": {
      "main": ["main.abc1234.js", "0.a1b2c3d4.hot-update.js"],
      "vendor": ["vendor.def5678.js", "vendor.def5678.js.map"]
    }
  }"#;

  fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("filerevs").chain(args.iter().copied()))
  }

  fn write_stats(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("stats.json");
    fs::write(&path, body).expect("failed to write stats");
    path
  }

  #[test]
  fn writes_next_to_stats_without_output_path() -> Result<()> {
    let temp = tempdir()?;
    let stats = write_stats(temp.path(), STATS);
    let stats_arg = stats.to_string_lossy().into_owned();

    let manifest = run(cli(&[&stats_arg]), temp.path())?;

    let written = load_manifest(&temp.path().join("filerevs.json"))?;
    assert_eq!(written, manifest);
    assert_eq!(manifest.get("main.js"), Some("main.abc1234.js"));
    assert_eq!(manifest.get("vendor.js.map"), Some("vendor.def5678.js.map"));
    assert_eq!(manifest.len(), 3);
    Ok(())
  }

  #[test]
  fn hot_update_template_filters_transient_files() -> Result<()> {
    let temp = tempdir()?;
    let stats = write_stats(temp.path(), STATS);
    let stats_arg = stats.to_string_lossy().into_owned();

    let args = [
      "--filename",
      "[name].[chunkhash].js",
      "--hot-update",
      "[id].[hash:8].hot-update.js",
      stats_arg.as_str(),
    ];
    let manifest = run(cli(&args), temp.path())?;

    assert!(manifest.iter().all(|(_, file)| !file.contains("hot-update")));
    Ok(())
  }

  #[test]
  fn output_flag_overrides_configured_destination() -> Result<()> {
    let temp = tempdir()?;
    fs::write(
      temp.path().join("filerevs.config.json"),
      r#"{"output": "configured.json"}"#,
    )?;
    let stats = write_stats(temp.path(), STATS);
    let stats_arg = stats.to_string_lossy().into_owned();

    run(cli(&["--output", "rev/override.json", &stats_arg]), temp.path())?;

    assert!(temp.path().join("rev/override.json").exists());
    assert!(!temp.path().join("configured.json").exists());
    Ok(())
  }

  #[test]
  fn discovers_config_in_working_directory() -> Result<()> {
    let temp = tempdir()?;
    let out = temp.path().join("dist");
    fs::write(
      temp.path().join("filerevs.config.json"),
      r#"{"output": "assets.json", "fileExtRegex": null}"#,
    )?;
    let body = format!(
      r#"{{"outputPath": {}, "assetsByChunkName": {{"app": "app.123.js.map"}}}}"#,
      serde_json::to_string(&out.to_string_lossy())?
    );
    let stats = write_stats(temp.path(), &body);
    let stats_arg = stats.to_string_lossy().into_owned();

    let manifest = run(cli(&[&stats_arg]), temp.path())?;

    assert_eq!(manifest.get("app.map"), Some("app.123.js.map"));
    let written = load_manifest(&out.join("assets.json"))?;
    assert_eq!(written, manifest);
    Ok(())
  }

  #[test]
  fn explicit_config_must_exist() {
    let temp = tempdir().expect("failed to create temp dir");
    let stats = write_stats(temp.path(), STATS);
    let stats_arg = stats.to_string_lossy().into_owned();
    let missing = temp.path().join("missing.json");
    let missing_arg = missing.to_string_lossy().into_owned();

    let err = run(cli(&["--config", &missing_arg, &stats_arg]), temp.path()).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
  }

  #[test]
  fn printed_manifest_is_a_flat_json_object() -> Result<()> {
    let temp = tempdir()?;
    let stats = write_stats(temp.path(), STATS);
    let stats_arg = stats.to_string_lossy().into_owned();

    let printed = run(cli(&[&stats_arg]), temp.path())?.to_json()?;

    let value: serde_json::Value = serde_json::from_str(&printed)?;
    assert_eq!(value["vendor.js"], "vendor.def5678.js");
    Ok(())
  }
}
