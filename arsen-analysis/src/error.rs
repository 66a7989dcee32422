use arsen_ir::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no binary is loaded")]
    NoBinaryLoaded,
    #[error("no analysis result is available")]
    NoAnalysisAvailable,
    #[error("no function at {0}")]
    UnknownFunction(Address),
    #[error(transparent)]
    Unsupported(#[from] arsen_disasm::DisasmError),
    #[error("failed to load binary: {0}")]
    Load(#[from] arsen_file::Error),
    #[error("analysis pass {pass} failed: {message}")]
    Pass { pass: String, message: String },
    #[error("analysis worker terminated before producing a result")]
    WorkerLost,
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error("failed to read configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
