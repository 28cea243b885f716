use thiserror::Error;

pub type WidgetResult<T> = Result<T, WidgetError>;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("a phrase is required")]
    EmptyPhrase,
    #[error("invalid phrase API url '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("fetch failed for {url}: HTTP {status}")]
    FetchFailed {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed phrase API response: {0}")]
    MalformedResponse(String),
    #[error("transcoding engine is not loaded")]
    EngineNotLoaded,
    #[error("invalid scratch file name '{0}'")]
    InvalidFileName(String),
    #[error("transcode failed: {0}")]
    Transcode(String),
    #[error("scratch filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
