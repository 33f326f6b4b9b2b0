use thiserror::Error;

// Anything that stops a listing from being built out of the governance API
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed {record}: {reason}")]
    Malformed { record: String, reason: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render")]
    NoVotes,
    #[error("failed to load chart font from {path}: {reason}")]
    Font { path: String, reason: String },
    #[error("failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),
}

impl SourceError {
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Malformed {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
