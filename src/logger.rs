//! Console logger for the `log` facade.
//! Lines look like `12:01:33.120 [*] message`, errors get `[-]`.

use anyhow::Result;
use crossterm::style::{Color, Stylize};
use log::{Level, LevelFilter, Metadata, Record};

struct Logger {
    level: LevelFilter,
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{} {} {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            tag(record.level()).with(color(record.level())),
            record.args()
        );
    }

    fn flush(&self) {}
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[-]",
        Level::Warn => "[!]",
        Level::Info => "[*]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

fn color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Cyan,
    }
}

pub fn init(level: LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(Logger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod test {
    use log::{Level, LevelFilter, Log};

    use super::{tag, Logger};

    #[test]
    fn test_tags() {
        assert_eq!(tag(Level::Error), "[-]");
        assert_eq!(tag(Level::Info), "[*]");
        assert_eq!(tag(Level::Debug), "[D]");
    }

    #[test]
    fn test_level_filter() {
        let logger = Logger {
            level: LevelFilter::Info,
        };
        let metadata = |level| log::Metadata::builder().level(level).build();

        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Info)));
        assert!(!logger.enabled(&metadata(Level::Debug)));
    }
}
