//! joe: logchamp
//! joe: call it logchamp
//! joe: please

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use colored::{Color, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};
use time::macros;

const CRATE_TARGET: &str = "mythiq_studio";

struct Logger {
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    fn new(filename: Option<&Path>) -> io::Result<Self> {
        let file = match filename {
            Some(filename) => {
                let file = File::options().append(true).create(true).open(filename)?;
                Some(Mutex::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(Self { file })
    }
}

fn is_crate_target(target: &str) -> bool {
    target.split("::").next() == Some(CRATE_TARGET)
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        is_crate_target(metadata.target()) || metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = time::OffsetDateTime::now_utc()
            .format(macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .unwrap_or_default();
        let target = record.target();
        let level = record.level().as_str();
        let args = record.args();

        let color = match record.level() {
            Level::Error => Color::BrightRed,
            Level::Warn => Color::BrightYellow,
            Level::Info => Color::BrightCyan,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };

        // stdout belongs to the studio's replies
        eprintln!("{} {} {args}", timestamp.color(Color::BrightBlack), level.color(color));

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{timestamp} [{target} {level}] {args}");
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

pub fn init(filename: Option<&Path>) -> io::Result<()> {
    let logger = Logger::new(filename)?;
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(LevelFilter::Debug);

    Ok(())
}

pub fn flush() {
    log::logger().flush();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_crate_target() {
        assert!(is_crate_target("mythiq_studio"));
        assert!(is_crate_target("mythiq_studio::apis::gateway"));
        assert!(!is_crate_target("reqwest::connect"));
        assert!(!is_crate_target("mythiq_studio_extra"));
    }

    fn metadata(target: &'static str, level: Level) -> Metadata<'static> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn test_enabled_levels() {
        let logger = Logger::new(None).unwrap();

        assert!(logger.enabled(&metadata("mythiq_studio::hooks", Level::Debug)));
        assert!(logger.enabled(&metadata("hyper_util::client", Level::Info)));
        assert!(!logger.enabled(&metadata("hyper_util::client", Level::Debug)));
    }

    #[test]
    fn test_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.log");
        let logger = Logger::new(Some(&path)).unwrap();

        logger.log(
            &Record::builder()
                .target("mythiq_studio::studio")
                .level(Level::Warn)
                .args(format_args!("gateway unreachable"))
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.ends_with("[mythiq_studio::studio WARN] gateway unreachable\n"));
    }
}
