//! Command-line configuration. Only I/O and presentation are configurable;
//! the game rules are fixed in `constants`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::constants::GAMEPAD_THRESHOLD;
use crate::input::hold_ticks_for_ms;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "asteroid-arcade")]
#[command(about = "Asteroids for the terminal", version)]
pub struct Args {
    /// Seed for the random number generator; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding the ASCII-art assets
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Where the high score is kept
    #[arg(long, default_value = "asteroids_high_score.json")]
    pub high_score_file: PathBuf,

    #[arg(long, default_value = "asteroid-arcade.log")]
    pub log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// How long a key counts as held when the terminal reports no key releases
    #[arg(long, default_value_t = 550, value_parser = clap::value_parser!(u64).range(1..=10_000))]
    pub key_hold_ms: u64,

    /// Stick deflection that counts as a direction, between 0 and 1
    #[arg(long, default_value_t = GAMEPAD_THRESHOLD, value_parser = parse_threshold)]
    pub gamepad_threshold: f32,

    /// Run headless against an in-memory screen with scripted input
    #[arg(long)]
    pub debug: bool,

    /// Screen width in debug mode
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Screen height in debug mode
    #[arg(long, default_value_t = 24)]
    pub height: u16,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,
}

fn parse_threshold(value: &str) -> Result<f32, String> {
    let threshold: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if (0.0..1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("{} is not in [0, 1)", threshold))
    }
}

impl Args {
    /// Hold window for the keyboard, or `None` when releases are reported.
    pub fn hold_ticks(&self, releases_reported: bool) -> Option<u32> {
        if releases_reported {
            None
        } else {
            Some(hold_ticks_for_ms(self.key_hold_ms))
        }
    }
}
