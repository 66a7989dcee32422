use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File too small: {0} bytes")]
    FileTooSmall(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
