//! Filesystem checks for the dataset

use std::fs;
use std::path::Path;

use log::warn;

/// Check that a path is a regular file we can open for reading.
///
/// The dataset is opened read-only and never created, so a missing or
/// unreadable file is reported here instead of surfacing as a pool error.
pub fn is_readable_file(path: &str) -> bool {
    let path = Path::new(path);
    if !path.is_file() {
        return false;
    }

    match fs::File::open(path) {
        Ok(_) => true,
        Err(e) => {
            warn!("Dataset {} is not readable: {}", path.display(), e);
            false
        }
    }
}
