use anyhow::Result;
use chrono::{DateTime, Local};
use log::{LevelFilter, Record};
use std::fs::OpenOptions;
use std::io::Write;

pub struct SimpleLogger {
    log_file: Option<std::fs::File>,
}

impl SimpleLogger {
    pub fn new(log_file_path: Option<&str>) -> Result<Self> {
        let log_file = if let Some(path) = log_file_path {
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        } else {
            None
        };

        Ok(SimpleLogger { log_file })
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now: DateTime<Local> = Local::now();
            let log_message = format!(
                "[{}] {} [{}:{}] {}\n",
                now.format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            );

            if let Some(file) = &self.log_file {
                let _ = (&*file).write_all(log_message.as_bytes());
            } else {
                // Without a log file, raw-mode stdout is the terminal UI, so
                // lines would tear the display. Stderr survives redirection.
                let _ = std::io::stderr().write_all(log_message.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.log_file {
            let _ = (&*file).flush();
        } else {
            let _ = std::io::stderr().flush();
        }
    }
}

pub fn setup_logging(log_file: Option<&str>, level: LevelFilter) -> Result<()> {
    let logger = SimpleLogger::new(log_file)?;
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level))?;

    log::info!("Logging initialized at level: {}", level);
    log::info!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Ok(())
}

/// Map a config/CLI level string to a filter, defaulting to Info.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Wall-clock display time in the roster's "2:30 PM" style.
pub fn clock_time() -> String {
    Local::now().format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_handles_case_and_unknowns() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn clock_time_uses_twelve_hour_style() {
        let time = clock_time();
        assert!(time.ends_with("AM") || time.ends_with("PM"));
        assert!(time.contains(':'));
        // No zero-padded hour: "2:30 PM", never "02:30 PM".
        assert!(!time.starts_with('0'));
    }

    #[test]
    fn logger_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banter.log");
        let logger = SimpleLogger::new(path.to_str()).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let record = log::Record::builder()
            .args(format_args!("hello from the test"))
            .level(log::Level::Error)
            .target("banter::tests")
            .build();
        log::Log::log(&logger, &record);
        log::Log::flush(&logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello from the test"));
        assert!(contents.contains("ERROR"));
    }
}
