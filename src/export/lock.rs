use std::fs::OpenOptions;
use std::path::Path;

use fs2::FileExt;

/// Check whether another process holds the workbook open for writing
///
/// A missing file is never locked. Otherwise the file is opened read-write
/// and an exclusive advisory lock is attempted without blocking; failing to
/// open or to lock means the file is in use. The probe lock is released
/// before returning, so this says nothing about the file's state later on.
pub fn is_locked(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot open workbook read-write");
            return true;
        }
    };

    match file.try_lock_exclusive() {
        Ok(()) => {
            if let Err(e) = FileExt::unlock(&file) {
                tracing::debug!(error = %e, "failed to release probe lock");
            }
            false
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "workbook is locked");
            true
        }
    }
}
