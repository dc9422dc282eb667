mod commands;
mod core;
mod decide;
mod host;
mod pipeline;
mod registry;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::env::EnvSnapshot;
use crate::core::error::{print_error, ShipwayError, ShipwayResult};

/// Release orchestration for published modules
#[derive(Parser)]
#[command(name = "shipway")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a release pipeline
  ///
  /// Tokens follow the release grammar:
  /// release-process <nightly|stable> [version <X.Y.Z>] [skip-tests] [cross-build]
  ReleaseModule {
    #[arg(trailing_var_arg = true)]
    tokens: Vec<String>,
  },

  /// Shorthand for `release-module release-process nightly ...`
  ReleaseNightly {
    #[arg(trailing_var_arg = true)]
    tokens: Vec<String>,
  },

  /// Shorthand for `release-module release-process stable ...`
  ReleaseStable {
    #[arg(trailing_var_arg = true)]
    tokens: Vec<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  // One environment snapshot per process; nothing else reads ambient state
  let env = EnvSnapshot::capture();

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  if let Err(err) = run(cli, &env, &project_root) {
    handle_error(err);
  }
}

fn run(cli: Cli, env: &EnvSnapshot, project_root: &std::path::Path) -> ShipwayResult<()> {
  let config = crate::core::config::ShipwayConfig::load(project_root)?;

  let tokens = match cli.command {
    Commands::ReleaseModule { tokens } => tokens,
    Commands::ReleaseNightly { tokens } => with_process_prefix("nightly", tokens),
    Commands::ReleaseStable { tokens } => with_process_prefix("stable", tokens),
  };

  commands::run_release(&config, env, project_root, &tokens)
}

/// Expand an alias into the canonical token form
fn with_process_prefix(flavor: &str, tokens: Vec<String>) -> Vec<String> {
  let mut expanded = vec!["release-process".to_string(), flavor.to_string()];
  expanded.extend(tokens);
  expanded
}

fn handle_error(err: ShipwayError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
