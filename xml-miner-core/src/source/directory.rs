use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

use tracing::warn;

use super::SourceError;

/// Every file of one directory, in file-name order
pub struct DirectorySource {
    entries: vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        let read_error = |source| SourceError::Read {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(read_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;

        if entries.is_empty() {
            return Err(SourceError::EmptyDirectory(dir.to_path_buf()));
        }
        entries.sort();

        Ok(DirectorySource {
            entries: entries.into_iter(),
        })
    }
}

impl Iterator for DirectorySource {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.entries.next()?;
            if !path.is_file() {
                warn!("{} is not a file, skip", path.display());
                continue;
            }
            return Some(fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source }));
        }
    }
}
