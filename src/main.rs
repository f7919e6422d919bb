mod config;
mod hn;
mod issues;
mod open_url;
mod ui;
mod util;

use anyhow::Result;
use clap::Parser;
use console::Term;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newsboard", version, about = "Hacker News top stories and an issue table in your terminal")]
struct Cli {
    /// Path to a config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stories fetched per "Load more"
    #[arg(long)]
    page_size: Option<usize>,

    /// JSON file with the issue list
    #[arg(long)]
    issues: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(config::Overrides {
        config: cli.config,
        page_size: cli.page_size,
        issues_file: cli.issues,
    })?;

    let term = Term::stdout();
    ui::require_terminal(&term)?;
    let _ = term.clear_screen();
    let items = vec![
        "Top stories".to_string(),
        "Issues".to_string(),
        "Quit".to_string(),
    ];
    loop {
        let quit = match ui::prompt_menu(
            "Main Menu (b = back/quit)",
            &items,
            Some(0),
            cfg.header.as_deref(),
        )? {
            ui::MenuChoice::Back | ui::MenuChoice::Quit | ui::MenuChoice::Index(2) => true,
            ui::MenuChoice::Index(0) => hn::run(&cfg).await?,
            ui::MenuChoice::Index(_) => issues::run(&cfg)?,
            ui::MenuChoice::Invalid => false,
        };
        if quit {
            break;
        }
    }
    Ok(())
}
