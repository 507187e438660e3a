/// Text-completion errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("completion request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("completion API returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("completion response had no content")]
    EmptyResponse,
}
