mod app;
mod catalog;
mod config;
mod constants;
mod format;
mod input;
mod model;
mod rating;
mod source;
mod state;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use app::{App, StartOptions};
use catalog::SortView;
use config::Config;
use constants::constants;
use source::ContentSource;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse and review startup videos", long_about = None)]
struct Args {
  /// Base URL of a content service (default: built-in fixtures, or `source_url` from prefs.toml)
  #[arg(short, long, global = true)]
  source: Option<String>,

  /// Home tab to start on
  #[arg(short, long)]
  tab: Option<SortView>,

  /// Initial search query
  #[arg(short, long)]
  query: Option<String>,

  /// Open a video's detail page on start
  #[arg(long, conflicts_with = "company")]
  video: Option<String>,

  /// Open a company profile on start
  #[arg(long)]
  company: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the catalog, or one sorted and filtered view of it, as JSON
  Dump {
    /// Ordering to print; the whole catalog when neither this nor --query is given
    #[arg(short, long)]
    view: Option<SortView>,
    /// Narrow the videos by title, company or tag
    #[arg(short, long)]
    query: Option<String>,
  },
  /// Print a shell completion script
  Completions { shell: Shell },
}

// --- Logging ---

fn init_logging(data_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
  use tracing_subscriber::{EnvFilter, fmt, prelude::*};

  let logs_dir = data_dir.join("logs");
  std::fs::create_dir_all(&logs_dir).ok();

  let file_appender = tracing_appender::rolling::daily(&logs_dir, "reels.log");
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reels=debug"));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true).with_line_number(true))
    .init();

  guard
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(Command::Completions { shell }) = args.command {
    clap_complete::generate(shell, &mut Args::command(), "reels", &mut std::io::stdout());
    return Ok(());
  }

  let data_dir = config::data_dir().unwrap_or_else(|| PathBuf::from("."));
  let _guard = init_logging(&data_dir);
  info!(version = env!("CARGO_PKG_VERSION"), "starting");

  let config = Config::load();
  let source_url = args.source.clone().or_else(|| config.source_url.clone());
  let source = ContentSource::from_url(source_url.as_deref())?;

  if let Some(Command::Dump { view, query }) = args.command {
    return dump(&source, view, query.as_deref()).await;
  }

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let start = StartOptions {
    tab: args.tab,
    query: args.query,
    video: args.video,
    company: args.company,
    persist_prefs: true,
  };

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, App::new(source, config, start)).await;
  ratatui::restore();
  info!("exiting");
  result
}

async fn dump(source: &ContentSource, view: Option<SortView>, query: Option<&str>) -> Result<()> {
  let catalog = source.catalog().await.with_context(|| format!("Failed to load catalog from {}", source.label()))?;
  let json = if view.is_none() && query.is_none() {
    serde_json::to_string_pretty(&catalog)?
  } else {
    let videos = catalog::browse(&catalog.videos, view.unwrap_or_default(), query.unwrap_or(""));
    serde_json::to_string_pretty(&videos)?
  };
  println!("{}", json);
  Ok(())
}

async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  app.trigger_catalog();
  let poll = Duration::from_millis(constants().poll_interval_ms);

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(poll)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
