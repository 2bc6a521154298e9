use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use tinygen::config::{App, ConfigPaths};
use tinygen::diff::{DiffFile, Utf8String};
use tinygen::fetch::{self, remove_fence_lines, DiffRequest, HttpDiffSource};
use tinygen::render::{self, Layout, Renderer};
use tinygen::FileDiff;
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
  #[arg(short, long, global = true, help = "Enables verbose logging")]
  verbose: bool,

  #[arg(long, global = true, help = "Disables coloured output")]
  no_color: bool,

  #[command(subcommand)]
  command: Command
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Ask the diff endpoint for a change and render the returned diff
  Generate(GenerateArgs),

  /// Render a unified diff read from a file or stdin
  Show(ShowArgs),

  /// Update a configuration option in ~/.config/tinygen/config.ini
  Config {
    #[command(subcommand)]
    action: ConfigAction
  }
}

#[derive(Args, Debug)]
struct OutputArgs {
  #[arg(long, help = "Print the parsed diff as JSON")]
  json: bool,

  #[arg(long, help = "Print hunk lines in their original order")]
  interleaved: bool
}

#[derive(Args, Debug)]
struct GenerateArgs {
  #[arg(long, help = "Repository to generate the change for")]
  repo_url: String,

  #[arg(long, help = "Instruction describing the change")]
  prompt: String,

  #[arg(long, help = "Overrides the configured endpoint URL")]
  endpoint: Option<String>,

  #[arg(long, value_name = "FILE", help = "Also write the diff to FILE")]
  save: Option<PathBuf>,

  #[command(flatten)]
  output: OutputArgs
}

#[derive(Args, Debug)]
struct ShowArgs {
  #[arg(help = "Diff file to read; stdin when omitted")]
  file: Option<PathBuf>,

  #[command(flatten)]
  output: OutputArgs
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
  /// Set a configuration option
  Set { key: ConfigKey, value: String }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigKey {
  Endpoint,
  Timeout
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  if cli.verbose {
    env_logger::builder()
      .filter_level(LevelFilter::Debug)
      .format_target(false)
      .init();
    log::debug!("Verbose logging enabled");
  } else {
    env_logger::init();
  }

  if cli.no_color {
    colored::control::set_override(false);
  }

  if let Err(err) = run(cli).await {
    eprintln!("{} {err:#}", "Error:".bold().bright_red());
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  let color = !cli.no_color && io::stdout().is_terminal();

  match cli.command {
    Command::Generate(args) => generate(args, color).await,
    Command::Show(args) => show(args, color),
    Command::Config { action: ConfigAction::Set { key, value } } => set_config(key, value)
  }
}

async fn generate(args: GenerateArgs, color: bool) -> Result<()> {
  let paths = ConfigPaths::new()?;
  let mut settings = App::load(&paths)?.settings()?;
  if let Some(endpoint) = &args.endpoint {
    settings = settings.with_endpoint(endpoint)?;
  }

  let source = HttpDiffSource::new(&settings)?;
  let request = DiffRequest::new(args.repo_url, args.prompt);
  request.validate()?;

  log::info!("Generating diff via {}", source.endpoint());

  let spinner = spinner("Generating diff...")?;
  let result = fetch::generate(&source, &request).await;
  spinner.finish_and_clear();
  let files = result?;

  if let Some(path) = &args.save {
    path.write_diff(&files)?;
    log::info!("Saved diff to {}", path.display());
  }

  print_files(&files, &args.output, color)
}

fn show(args: ShowArgs, color: bool) -> Result<()> {
  let text = match &args.file {
    Some(path) => path.read_diff()?,
    None => {
      let mut bytes = Vec::new();
      io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read diff from stdin")?;
      bytes.to_utf8()
    }
  };

  let files = tinygen::parse(&remove_fence_lines(&text))?;
  print_files(&files, &args.output, color)
}

fn set_config(key: ConfigKey, value: String) -> Result<()> {
  let paths = ConfigPaths::new()?;
  let mut app = App::load_file(&paths)?;

  match key {
    ConfigKey::Endpoint => app.update_endpoint(value, &paths),
    ConfigKey::Timeout => {
      let secs = value
        .parse()
        .with_context(|| format!("Timeout must be a whole number of seconds, got {value}"))?;
      app.update_timeout(secs, &paths)
    }
  }
}

fn print_files(files: &[FileDiff], output: &OutputArgs, color: bool) -> Result<()> {
  let mut stdout = io::stdout().lock();

  if output.json {
    serde_json::to_writer_pretty(&mut stdout, files).context("Failed to serialize diff")?;
    writeln!(stdout)?;
    return Ok(());
  }

  let layout = if output.interleaved { Layout::Interleaved } else { Layout::Grouped };
  Renderer::new(layout, color).render_all(files, &mut stdout)?;

  if !files.is_empty() {
    writeln!(stdout)?;
    for file in files {
      writeln!(stdout, "   {}", render::summary(file).dimmed())?;
    }
  }

  Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
  let style = ProgressStyle::default_spinner()
    .tick_strings(&["-", "\\", "|", "/"])
    .template("{spinner:.blue} {msg}")
    .context("Failed to create progress bar style")?;

  let pb = ProgressBar::new_spinner();
  pb.set_style(style);
  pb.set_message(message);
  pb.enable_steady_tick(Duration::from_millis(150));
  Ok(pb)
}
