use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("column {column} has no value in row 0 to carry forward")]
    UnseededColumn { column: usize },

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not render plot: {0}")]
    Plot(String),

    #[error("could not write wav: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T, E = PinkError> = std::result::Result<T, E>;

pub(crate) fn invalid(msg: impl Into<String>) -> PinkError {
    PinkError::InvalidArgument(msg.into())
}
