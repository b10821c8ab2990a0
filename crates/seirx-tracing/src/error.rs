use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("quarantine duration must be at least one day")]
    ZeroDuration,

    #[error("tracing configuration error: {0}")]
    Config(String),
}

pub type TracingResult<T> = Result<T, TracingError>;
