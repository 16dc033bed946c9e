use std::env;
use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use env_logger::filter::{Builder, Filter};

use log::{Log, Metadata, Record};

/// Small `env_logger`-like logger that reads filters from an environment variable and logs to a
/// file, or to standard error if no file is provided.
///
/// Standard output is left alone so that it only ever carries rendered frames.
pub struct Logger {
    sink: Mutex<Box<dyn Write + Send>>,
    filter: Filter,
}

impl Logger {
    pub fn init(env_var: impl AsRef<OsStr>, path: Option<&Path>) -> anyhow::Result<()> {
        let sink: Box<dyn Write + Send> = match path {
            Some(path) => Box::new(
                OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)
                    .with_context(|| format!("could not open log file {}", path.display()))?,
            ),
            None => Box::new(io::stderr()),
        };

        let mut filter_builder = Builder::new();

        match env::var(env_var) {
            Ok(filter) => {
                filter_builder.parse(&filter);
            }
            Err(_) => {
                filter_builder.filter_level(log::LevelFilter::Warn);
            }
        }

        let filter = filter_builder.build();
        let max_level = filter.filter();

        log::set_boxed_logger(Box::new(Logger {
            sink: Mutex::new(sink),
            filter,
        }))
        .map(|()| log::set_max_level(max_level))
        .context("could not initialize logger")
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.filter.matches(record) {
            if let Ok(mut sink) = self.sink.lock() {
                let _ = writeln!(
                    sink,
                    "{:5} {} {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}
