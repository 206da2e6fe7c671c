use std::path::PathBuf;
use std::{fs, io};

const LOG_FILE: &str = "output.log";

/// Starts a fresh `output.log` in the data directory, creating the directory
/// first when this is the first run.
pub fn file() -> Result<fs::File, Error> {
    let path = crate::data_path(Some(LOG_FILE));

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| Error::DataDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    fs::File::create(&path).map_err(|source| Error::Open { path, source })
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot create data directory {}: {source}", path.display())]
    DataDir { path: PathBuf, source: io::Error },
    #[error("Cannot open log file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Logger already installed: {0}")]
    SetLog(#[from] log::SetLoggerError),
}
