use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table file missing: {}", .0.display())]
    Unavailable(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreError>;
