//! Command line interface

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

/// Reads RFID badges and prints the audio file for each guest
#[derive(Debug, Parser)]
#[command(name = "sortinghat", version, about)]
pub struct Cli {
    /// TOML file with a [guests] table mapping tags to audio files
    pub tags_file: PathBuf,

    /// Directory the audio filenames are relative to
    pub audio_dir: PathBuf,

    /// Minimum severity of diagnostics written to stderr
    #[arg(long, default_value = "WARNING")]
    pub log_level: LogLevel,

    /// Read this input device instead of searching for one named "rfid"
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,
}

/// Diagnostic verbosity, named the way the classic severities are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" | "CRITICAL" => Ok(LogLevel::Error),
            other => Err(format!(
                "unknown log level '{other}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)"
            )),
        }
    }
}
