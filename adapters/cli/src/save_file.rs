//! Progress persistence: a file holding the highest unlocked level.

use std::{
    fs, io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Level loaded when no progress has been recorded.
pub(crate) const FIRST_LEVEL: u32 = 1;

/// Failures raised while reading or writing the save file.
#[derive(Debug, Error)]
pub(crate) enum SaveFileError {
    /// The file exists but could not be read or written.
    #[error("save file {path} is not accessible")]
    Io {
        /// Location of the save file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The file does not hold a decimal level number.
    #[error("save file {path} holds {contents:?}, expected a level number")]
    Parse {
        /// Location of the save file.
        path: PathBuf,
        /// Trimmed file contents.
        contents: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Handle to the on-disk progress record.
#[derive(Clone, Debug)]
pub(crate) struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored level. Missing, empty and zero records load level one.
    pub(crate) fn load(&self) -> Result<u32, SaveFileError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(FIRST_LEVEL),
            Err(source) => {
                return Err(SaveFileError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(FIRST_LEVEL);
        }

        let level = trimmed
            .parse::<u32>()
            .map_err(|source| SaveFileError::Parse {
                path: self.path.clone(),
                contents: trimmed.to_owned(),
                source,
            })?;
        Ok(level.max(FIRST_LEVEL))
    }

    pub(crate) fn store(&self, level: u32) -> Result<(), SaveFileError> {
        fs::write(&self.path, level.to_string()).map_err(|source| SaveFileError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("progress saved at level {level}");
        Ok(())
    }

    /// Forgets all progress.
    pub(crate) fn reset(&self) -> Result<(), SaveFileError> {
        self.store(FIRST_LEVEL)
    }
}
