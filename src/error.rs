use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum PrecedenceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("step '{name}': {source}")]
    Step {
        name: String,
        #[source]
        source: GraphError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PrecedenceError>;
