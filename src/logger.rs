/// Process-wide file logger.
///
/// The terminal is in raw mode on the alternate screen while the game
/// runs, so log lines go to a file instead of stdout. Until `init_logger`
/// is called (or when it was given no file) `log!` is a no-op.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    sink: Option<Mutex<File>>,
}

impl Logger {
    fn new(sink: Option<File>) -> Self {
        Self { sink: sink.map(Mutex::new) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let sink = match &self.sink {
            Some(s) => s,
            None => return,
        };
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        if let Ok(mut f) = sink.lock() {
            let _ = writeln!(f, "[{}][{}:{}] {}", timestamp, file_name, line, message);
        }
    }
}

/// Start logging to `path` (appending). `None` disables logging.
/// Returns the open error, if any; logging stays disabled in that case.
pub fn init_logger(path: Option<&Path>) -> Result<(), String> {
    let (file, err) = match path {
        Some(p) => match OpenOptions::new().create(true).append(true).open(p) {
            Ok(f) => (Some(f), None),
            Err(e) => (None, Some(format!("could not open log {}: {}", p.display(), e))),
        },
        None => (None, None),
    };
    LOGGER.get_or_init(|| Logger::new(file));
    match err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
