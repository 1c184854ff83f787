//! Logger setup driven by the `output` section of the gallery config.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use super::config::OutputConfig;

/// Where gallery logs go. Report JSON and slide lines always go to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Only the configured log file.
    File,
    /// Stderr only, so stdout stays machine readable.
    #[default]
    Terminal,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// `verbose` adds per-probe debug lines.
pub fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn initialize(output: &OutputConfig) {
    let level = level(output.verbose);
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if output.log_destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if output.log_destination.to_file() {
        if let Some(file_logger) = file_logger(&output.log_file, level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

fn file_logger(path: &Path, level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create gallery log {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{level, LogDestination};

    #[test]
    fn destinations_pick_their_sinks() {
        assert!(LogDestination::Terminal.to_terminal());
        assert!(!LogDestination::Terminal.to_file());
        assert!(!LogDestination::File.to_terminal());
        assert!(LogDestination::Both.to_terminal() && LogDestination::Both.to_file());
    }

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(level(true), LevelFilter::Debug);
        assert_eq!(level(false), LevelFilter::Info);
    }
}
