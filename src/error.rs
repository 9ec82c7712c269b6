use thiserror::Error;

pub type SejongResult<T> = Result<T, SejongError>;

/// Sejong tagger error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SejongError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Model contains no {0} entries")]
    EmptyModel(&'static str),

    #[error("Invalid transition key (expected \"Prev_Next\"): {0}")]
    InvalidTransitionKey(String),

    #[error("Invalid data format: {1} at line {0}")]
    InvalidDataFormat(usize, String),

    #[error("Positive cycle detected while decoding the lattice")]
    CycleDetected,

    #[error("End of sentence (EOS) is not connected to beginning of sentence (BOS)")]
    EosBosDisconnect,
}
