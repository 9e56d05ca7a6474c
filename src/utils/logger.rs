// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Installs the console logger. `verbose` enables debug output.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
  let level = if verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let tag = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
      };

      // Progress goes to stdout; diagnostics to stderr
      if record.level() <= Level::Warn {
        let _ = writeln!(std::io::stderr().lock(), "[{}] {}", tag, record.args());
      } else {
        let _ = writeln!(std::io::stdout().lock(), "[{}] {}", tag, record.args());
      }
    }
  }

  fn flush(&self) {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
  }
}
