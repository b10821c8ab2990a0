use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transmission parameter '{name}' = {value} is outside [0, 1]")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("close-contact weight must be 1.0 by definition, got {0}")]
    CloseWeightNotUnit(f64),

    #[error("transmission model configuration error: {0}")]
    Config(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
