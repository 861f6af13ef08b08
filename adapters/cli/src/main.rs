#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays edit scripts against a Wiregrid world.

mod config;
mod layout_transfer;
mod script;
mod session;
mod terminal;

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use wiregrid_rendering::RenderingBackend;

use crate::{
    config::{BrushChoice, SessionConfig},
    session::Session,
    terminal::TerminalBackend,
};

/// Replays an edit script against a wire grid and prints the settled result.
#[derive(Debug, Parser)]
#[command(name = "wiregrid", version)]
struct Args {
    /// Edit script to replay; read from standard input when omitted.
    script: Option<PathBuf>,
    /// TOML session config providing the initial grid.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Grid width, overriding the config.
    #[arg(long)]
    width: Option<u32>,
    /// Grid height, overriding the config.
    #[arg(long)]
    height: Option<u32>,
    /// Start in debug mode.
    #[arg(long)]
    debug: bool,
    /// Initial brush, overriding the config.
    #[arg(long, value_enum)]
    brush: Option<BrushChoice>,
    /// Layout transfer string to load, overriding the config.
    #[arg(long)]
    layout: Option<String>,
    /// Color cells with ANSI escapes.
    #[arg(long)]
    color: bool,
    /// Raise log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.debug {
            config.debug_mode = true;
        }
        if let Some(brush) = self.brush {
            config.brush = brush;
        }
        if let Some(layout) = &self.layout {
            config.layout = Some(layout.clone());
        }
        Ok(config)
    }

    fn read_script(&self) -> Result<String> {
        match &self.script {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read edit script at {}", path.display())),
            None => {
                let mut source = String::new();
                let _ = io::stdin()
                    .read_to_string(&mut source)
                    .context("failed to read edit script from standard input")?;
                Ok(source)
            }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Entry point for the Wiregrid command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.session_config()?;
    let steps = script::parse(&args.read_script()?).context("invalid edit script")?;
    info!("replaying {} steps", steps.len());

    let mut session = Session::new(&config)?;
    let mut backend = TerminalBackend::new(io::stdout(), args.color);
    let mut out = io::stdout();
    for step in steps {
        session.run_step(step, &mut backend, &mut out)?;
    }
    backend.present(&session.presentation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "wiregrid",
            "--width",
            "6",
            "--debug",
            "--brush",
            "source",
            "-vv",
        ]);

        let config = args.session_config().expect("no config file to read");

        assert_eq!((config.width, config.height), (6, 3));
        assert!(config.debug_mode);
        assert_eq!(config.brush, BrushChoice::PowerSource);
        assert_eq!(args.verbose, 2);
        assert!(args.script.is_none());
    }
}
