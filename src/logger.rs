use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Opens the debug log. Later calls keep the first file.
pub fn init(path: &Path) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    if logger.is_none() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            *logger = Some(file);
        }
    }
}

pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock()
        && let Some(logger) = guard.as_mut()
    {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(logger, "[{}] {}", timestamp, message);
    }
}
