use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

use supersnek::config::Settings;
use supersnek::input::TerminalInput;
use supersnek::render::TerminalSink;
use supersnek::term::{restore_terminal, TerminalGuard};
use supersnek::Game;

const LOG_FILE: &str = "supersnek.log";

#[derive(Parser)]
#[command(name = "supersnek")]
#[command(version, about = "A wee little terminal snake game")]
struct Cli {
    /// Draw quadrant markers on the board and log at debug level
    #[arg(short, long)]
    debug: bool,

    /// Plain symbols, no colours
    #[arg(long = "no-color", visible_alias = "nc")]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), File::create(LOG_FILE)?)
        .context("failed to initialise logger")?;

    info!("Starting supersnek");
    let settings = Settings::new(cli.debug, !cli.no_color);

    // Setup terminal; the guard puts it back on every exit path, panics included
    enable_raw_mode()?;
    let guard = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let sink = TerminalSink::new(terminal)?;

    let mut game = Game::new(settings, TerminalInput::new(), sink);
    let result = game.run();

    // Cleanup terminal before printing anything
    drop(game);
    drop(guard);

    match result {
        Ok(summary) => {
            println!(
                "Snek ate {} apple(s), reached length {} and lasted {} ticks.",
                summary.apples_eaten, summary.length, summary.ticks
            );
            Ok(())
        }
        Err(err) => {
            error!("game aborted: {}", err);
            Err(err).context("supersnek stopped unexpectedly")
        }
    }
}
