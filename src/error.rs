use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Could not open file: {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not create worker threads: {0}")]
    ThreadPool(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        CommonError::Io(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for CommonError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        CommonError::ThreadPool(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CommonError>;
