use thiserror::Error;

use seirx_agent::AgentError;
use seirx_network::NetworkError;
use seirx_testing::TestingError;
use seirx_tracing::TracingError;
use seirx_transmission::ModelError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Testing(#[from] TestingError),

    #[error(transparent)]
    Tracing(#[from] TracingError),
}

pub type SimResult<T> = Result<T, SimError>;
