use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad user input, raised before any request is made.
    #[error("{0}")]
    Input(String),

    #[error("{step}: {source}")]
    Transport {
        step: &'static str,
        #[source]
        source: BoxError,
    },

    /// The server answered, but not with what the flow expects.
    #[error("{step}: {message}")]
    Protocol {
        step: &'static str,
        message: String,
    },
}

impl SearchError {
    pub fn transport(step: &'static str, source: impl Into<BoxError>) -> Self {
        SearchError::Transport { step, source: source.into() }
    }

    pub fn protocol(step: &'static str, message: impl Into<String>) -> Self {
        SearchError::Protocol { step, message: message.into() }
    }
}
