#![deny(missing_docs)]
//! Shared logging utilities for the studyview workspace.
//!
//! This crate provides the `study_*` logging macros used by the engine and
//! the initializers that install a global `simplelog` logger for hosts and
//! for tests.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! study_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! study_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! study_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! study_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! study_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the configured log file only.
    File,
    /// Write to the terminal only.
    Terminal,
    /// Write to both the log file and the terminal.
    Both,
}

/// Host-provided logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level that reaches the sinks.
    pub level: LevelFilter,
    /// Path of the log file used by [`LogDestination::File`] and [`LogDestination::Both`].
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: PathBuf::from("./studyview.log"),
        }
    }
}

/// Installs the global logger for the given destination.
///
/// Returns `false` when no sink could be created or a logger was already
/// installed. A file that cannot be created is reported on stderr and skipped.
pub fn initialize(destination: LogDestination, settings: &LogSettings) -> bool {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(settings, config) {
            Some(file_logger) => vec![file_logger],
            None => return false,
        },
        LogDestination::Terminal => vec![terminal_logger(settings.level, config)],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> =
                vec![terminal_logger(settings.level, config.clone())];
            if let Some(file_logger) = create_file_logger(settings, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    CombinedLogger::init(loggers).is_ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(settings: &LogSettings, config: Config) -> Option<Box<dyn SharedLogger>> {
    match File::create(&settings.file_path) {
        Ok(file) => Some(WriteLogger::new(settings.level, config, file) as Box<dyn SharedLogger>),
        Err(err) => {
            eprintln!(
                "Warning: Could not create log file at {:?}: {}",
                settings.file_path, err
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_log_at_info_to_local_file() {
        let settings = LogSettings::default();
        assert_eq!(settings.level, LevelFilter::Info);
        assert_eq!(settings.file_path, PathBuf::from("./studyview.log"));
    }

    #[test]
    fn unwritable_log_file_yields_no_file_sink() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = LogSettings {
            level: LevelFilter::Debug,
            file_path: temp.path().join("missing").join("studyview.log"),
        };
        assert!(create_file_logger(&settings, build_config()).is_none());
        assert!(!initialize(LogDestination::File, &settings));
    }

    #[test]
    fn file_sink_is_created_in_writable_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = LogSettings {
            level: LevelFilter::Debug,
            file_path: temp.path().join("studyview.log"),
        };
        assert!(create_file_logger(&settings, build_config()).is_some());
        assert!(settings.file_path.exists());
    }
}
