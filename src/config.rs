use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::interpreter::EngineOptions;

#[derive(Parser, Debug)]
#[command(name = "chip8vm")]
#[command(about = "CHIP-8 interpreter for the terminal", long_about = None)]
pub struct Config {
    /// CHIP-8 program image to run
    pub rom: PathBuf,

    /// Pause between instructions, in microseconds
    #[arg(long, value_name = "US", default_value_t = 1400)]
    pub cycle_delay_us: u64,

    /// Delay and sound timer tick period, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    pub timer_period_ms: u64,

    /// Screen refresh rate
    #[arg(long, value_name = "HZ", default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_rate: u32,

    /// How long a key counts as held after the terminal reports it, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 150)]
    pub key_hold_ms: u64,

    /// Don't use the PC speaker
    #[arg(long)]
    pub mute: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log verbosity; RUST_LOG overrides it
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

impl Config {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            cycle_delay: Duration::from_micros(self.cycle_delay_us),
            timer_period: Duration::from_millis(self.timer_period_ms),
            seed: self.seed,
        }
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}
