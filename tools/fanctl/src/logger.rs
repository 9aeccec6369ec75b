use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::OnceLock;

/// Environment variable holding the maximum log level.
pub const LOG_ENV: &str = "FANCTL_LOG";

pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Level named by `value`, `warn` if unset or unparsable.
    #[must_use]
    pub fn level_from(value: Option<&str>) -> LevelFilter {
        value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(LevelFilter::Warn)
    }

    /// Call this once, first thing in `main`.
    #[allow(clippy::missing_errors_doc)]
    pub fn init(self) -> Result<(), SetLoggerError> {
        static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

        let max_level = self.max_level;
        log::set_logger(LOGGER.get_or_init(|| self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\n"
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(StderrLogger::level_from(None), LevelFilter::Warn);
        assert_eq!(StderrLogger::level_from(Some("debug")), LevelFilter::Debug);
        assert_eq!(StderrLogger::level_from(Some(" TRACE ")), LevelFilter::Trace);
        assert_eq!(StderrLogger::level_from(Some("off")), LevelFilter::Off);
        assert_eq!(StderrLogger::level_from(Some("loud")), LevelFilter::Warn);
    }

    #[test]
    fn filters_by_level() {
        let l = StderrLogger::new(LevelFilter::Info);
        let info = Metadata::builder().level(log::Level::Info).build();
        let debug = Metadata::builder().level(log::Level::Debug).build();
        assert!(l.enabled(&info));
        assert!(!l.enabled(&debug));
    }
}
