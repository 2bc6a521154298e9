use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, FileFormat};
use console::Emoji;
use serde::{Deserialize, Serialize};
use url::Url;

// Constants
const DEFAULT_TIMEOUT: i64 = 30;
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/generate-diff";
const ENV_PREFIX: &str = "TINYGEN";

/// Raw configuration as stored in `config.ini`
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct App {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub endpoint: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout:  Option<usize>
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
  pub dir:  PathBuf,
  pub file: PathBuf
}

/// Validated settings handed to the diff source at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub endpoint: Url,
  pub timeout:  Duration
}

impl ConfigPaths {
  /// `~/.config/tinygen/config.ini`
  pub fn new() -> Result<Self> {
    let home = home::home_dir().context("Failed to determine home directory")?;
    Ok(Self::in_dir(home.join(".config/tinygen")))
  }

  pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    let file = dir.join("config.ini");
    Self { dir, file }
  }

  fn ensure_exists(&self) -> Result<()> {
    if !self.dir.exists() {
      std::fs::create_dir_all(&self.dir).with_context(|| format!("Failed to create config directory at {:?}", self.dir))?;
    }
    if !self.file.exists() {
      File::create(&self.file).with_context(|| format!("Failed to create config file at {:?}", self.file))?;
    }
    Ok(())
  }
}

impl App {
  /// Loads defaults, then the ini file, then `TINYGEN_*` environment
  /// variables; later sources win.
  pub fn load(paths: &ConfigPaths) -> Result<Self> {
    dotenv::dotenv().ok();
    paths.ensure_exists()?;

    let config = Config::builder()
      .set_default("timeout", DEFAULT_TIMEOUT)?
      .set_default("endpoint", DEFAULT_ENDPOINT)?
      .add_source(config::File::new(paths.file.to_string_lossy().as_ref(), FileFormat::Ini))
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?;

    config
      .try_deserialize()
      .context("Failed to deserialize existing config. Please run `tinygen config set endpoint <url>` and try again")
  }

  /// Loads `config.ini` alone, without defaults or environment overrides.
  ///
  /// This is what `config set` edits, so saving it back never writes a
  /// default or a `TINYGEN_*` value into the file.
  pub fn load_file(paths: &ConfigPaths) -> Result<Self> {
    paths.ensure_exists()?;

    Config::builder()
      .add_source(config::File::new(paths.file.to_string_lossy().as_ref(), FileFormat::Ini))
      .build()?
      .try_deserialize()
      .with_context(|| format!("Failed to deserialize config file at {:?}", paths.file))
  }

  pub fn save(&self, paths: &ConfigPaths) -> Result<()> {
    paths.ensure_exists()?;
    let contents = serde_ini::to_string(&self).context(format!("Failed to serialize config: {:?}", self))?;
    let mut file = File::create(&paths.file).with_context(|| format!("Failed to create config file at {:?}", paths.file))?;
    file
      .write_all(contents.as_bytes())
      .context("Failed to write config file")
  }

  pub fn update_endpoint(&mut self, value: String, paths: &ConfigPaths) -> Result<()> {
    parse_endpoint(&value)?;
    self.endpoint = Some(value);
    self.save_with_message("endpoint", paths)
  }

  pub fn update_timeout(&mut self, value: usize, paths: &ConfigPaths) -> Result<()> {
    check_timeout(value)?;
    self.timeout = Some(value);
    self.save_with_message("timeout", paths)
  }

  pub fn settings(&self) -> Result<Settings> {
    let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
    let secs = self.timeout.unwrap_or(DEFAULT_TIMEOUT as usize);
    check_timeout(secs)?;
    Ok(Settings { endpoint, timeout: Duration::from_secs(secs as u64) })
  }

  fn save_with_message(&self, option: &str, paths: &ConfigPaths) -> Result<()> {
    println!("{} Configuration option {} updated!", Emoji("✨", ":-)"), option);
    self.save(paths)
  }
}

impl Settings {
  /// Replaces the configured endpoint, e.g. with one given on the command line.
  pub fn with_endpoint(self, endpoint: &str) -> Result<Self> {
    Ok(Self { endpoint: parse_endpoint(endpoint)?, ..self })
  }
}

fn check_timeout(secs: usize) -> Result<()> {
  if secs == 0 {
    bail!("Timeout must be at least one second");
  }
  Ok(())
}

fn parse_endpoint(value: &str) -> Result<Url> {
  let url = Url::parse(value).with_context(|| format!("Invalid endpoint URL: {value}"))?;
  if !matches!(url.scheme(), "http" | "https") {
    bail!("Endpoint must be an http(s) URL, got {value}");
  }
  Ok(url)
}
