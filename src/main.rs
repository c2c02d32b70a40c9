mod cargo;
mod commands;
mod core;
mod graph;

use crate::commands::AffectedArgs;
use crate::core::error::{RippleError, print_error};
use clap::Parser;
use std::path::PathBuf;

/// Detect which modules of a multi-module project are affected by a change set
///
/// ripple diffs the repository against a reference commit, maps the changed
/// files onto the module dependency graph, and prints the modules a CI
/// pipeline needs to rebuild or retest. When the change scope is unknown
/// (no reference commit, empty diff, or changes outside every module) it
/// fails open and reports every module.
#[derive(Parser)]
#[command(name = "ripple")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct RippleCli {
  /// Project root (defaults to the current directory)
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Module descriptor file (JSON). Defaults to cargo workspace metadata
  #[arg(long)]
  modules: Option<PathBuf>,

  /// Base ref to diff against (defaults to the last merge commit)
  #[arg(long)]
  since: Option<String>,

  /// Top of the diff range
  #[arg(long, default_value = "HEAD")]
  to: String,

  /// Include staged and unstaged working-tree changes
  #[arg(long)]
  uncommitted: bool,

  /// Which modules to report: changed, dependent, all
  #[arg(long, default_value = "all")]
  subset: String,

  /// Drop changed paths that map to no module instead of affecting everything
  #[arg(long)]
  ignore_unknown: bool,

  /// Output format: text, json, names-only
  #[arg(long, default_value = "text")]
  format: String,

  /// Verbose logging (shows classification decisions)
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = RippleCli::parse();

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

  let result = commands::run_affected(AffectedArgs {
    root: cli.root,
    modules: cli.modules,
    since: cli.since,
    to: cli.to,
    uncommitted: cli.uncommitted,
    subset: cli.subset,
    ignore_unknown: cli.ignore_unknown,
    format: cli.format,
  });

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RippleError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
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
