use seirx_core::AgentType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(
        "no duration combination satisfied exposure ≤ symptoms < infection \
         after {attempts} attempts — check the configured distributions"
    )]
    PathologicalDurations { attempts: u32 },

    #[error("no group configuration for agent type '{0}'")]
    MissingGroupConfig(AgentType),

    #[error("agent configuration error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
