use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestingError {
    #[error("unknown test technology '{0}'")]
    UnknownTestType(String),

    #[error("test technology '{0}' is already registered")]
    DuplicateTestType(String),

    #[error("screening interval {0} is not supported (use 2, 3, 7, or none)")]
    InvalidScreeningInterval(u8),

    #[error("testing configuration error: {0}")]
    Config(String),
}

pub type TestingResult<T> = Result<T, TestingError>;
