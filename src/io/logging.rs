//! `log` backend that prints above the progress bars

use indicatif::MultiProgress;
use log::{LevelFilter, Log, Metadata, Record};

use crate::io::error::{Result, invalid_parameter};

/// Writes log records to stderr, routed through a [`MultiProgress`] when one is active
pub struct ProgressLogger {
    level: LevelFilter,
    output: Option<MultiProgress>,
}

impl ProgressLogger {
    /// Create a logger that keeps records up to `level`
    pub const fn new(level: LevelFilter, output: Option<MultiProgress>) -> Self {
        Self { level, output }
    }

    /// Text printed for a record
    pub fn format(record: &Record<'_>) -> String {
        format!(
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    // Allow print for log output when no progress display is active
    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format(record);
        let printed = self
            .output
            .as_ref()
            .filter(|output| !output.is_hidden())
            .is_some_and(|output| output.println(&line).is_ok());
        if !printed {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {}
}

/// Install [`ProgressLogger`] as the global logger
///
/// # Errors
///
/// Returns an error if a global logger is already installed
pub fn init(level: LevelFilter, output: Option<MultiProgress>) -> Result<()> {
    log::set_boxed_logger(Box::new(ProgressLogger::new(level, output)))
        .map_err(|error| invalid_parameter("logger", &level, &error))?;
    log::set_max_level(level);
    Ok(())
}
