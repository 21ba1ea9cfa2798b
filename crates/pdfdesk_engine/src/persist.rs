use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file filled in next to its final name. Nothing is visible at the target
/// until [`StagedFile::commit`]; dropping it uncommitted removes the partial data.
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
    written: u64,
}

impl StagedFile {
    /// Creates `dir` if needed and opens a hidden `.part` file inside it.
    pub fn create(dir: &Path, file_name: &str) -> Result<Self, PersistError> {
        if dir.is_file() {
            return Err(PersistError::NotADirectory(dir.to_path_buf()));
        }
        fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let target = dir.join(file_name);
        let tmp = tempfile::Builder::new()
            .prefix(".pdfdesk-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|source| PersistError::Write {
                path: target.clone(),
                source,
            })?;
        Ok(Self {
            tmp,
            target,
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(bytes).map_err(|source| PersistError::Write {
            path: self.target.clone(),
            source,
        })?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes to disk and renames over the target, replacing any previous file.
    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        let target = self.target;
        let write_err = |source| PersistError::Write {
            path: target.clone(),
            source,
        };
        self.tmp.flush().map_err(write_err)?;
        self.tmp.as_file().sync_all().map_err(write_err)?;
        self.tmp
            .persist(&target)
            .map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}

/// Writes a whole buffer as `{dir}/{file_name}` in one staged step.
pub fn write_atomic(
    dir: &Path,
    file_name: &str,
    content: impl AsRef<[u8]>,
) -> Result<PathBuf, PersistError> {
    let mut staged = StagedFile::create(dir, file_name)?;
    staged.write_chunk(content.as_ref())?;
    staged.commit()
}
