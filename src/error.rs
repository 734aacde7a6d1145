use crate::inject::InjectError;
use thiserror::Error;

/// Failures that reach the orchestrator's dispatch point.
#[derive(Debug, Error)]
pub enum CforError {
    #[error("CFOR_OPENAI_API_KEY or OPENAI_API_KEY environment variable must be set")]
    MissingCredentials,

    #[error("unsupported model: {model}")]
    UnsupportedModel { model: String },

    #[error("completion request to '{url}' failed: {source}")]
    BackendRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("completion response could not be parsed: {0}")]
    ResponseParse(#[from] ResponseParseError),

    #[error("command selection failed: {0}")]
    Selector(#[source] std::io::Error),

    #[error(transparent)]
    Inject(#[from] InjectError),
}

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response carried no message content")]
    MissingContent,

    #[error("suggestion {index} has an empty command")]
    EmptyCommand { index: usize },
}
