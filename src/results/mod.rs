use std::fmt;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};

use crate::dataset::ReadError;

pub mod v1;
pub mod v2;

pub use v1::V1Results;
pub use v2::V2Results;

#[derive(Debug)]
pub enum LoadError {
    Read(ReadError),
    Pattern(glob::PatternError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read(e) => write!(f, "Failed to load result file: {}", e),
            LoadError::Pattern(e) => write!(f, "Invalid file pattern: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<ReadError> for LoadError {
    fn from(err: ReadError) -> LoadError {
        LoadError::Read(err)
    }
}

impl From<glob::PatternError> for LoadError {
    fn from(err: glob::PatternError) -> LoadError {
        LoadError::Pattern(err)
    }
}

/// Enumerates files matching `<dir>/<prefix>*.nc`, non-recursively.
/// A directory that does not exist simply yields no matches; unreadable
/// entries are skipped. The directory is escaped so `[`, `?`, or `*` in
/// its path stay literal; only the trailing `<prefix>*.nc` is a pattern.
pub(crate) fn discover_nc_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, LoadError> {
    let pattern = format!(
        "{}/{}*.nc",
        Pattern::escape(&dir.to_string_lossy()),
        prefix
    );
    let paths = glob(&pattern)?;

    Ok(paths
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .collect())
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
