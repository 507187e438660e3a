/// Errors raised by search backends. Searchers swallow these and return
/// an empty hit list; they only surface in backend client APIs.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("backend {backend} returned status {status}: {body}")]
    BadStatus {
        backend: String,
        status: u16,
        body: String,
    },

    #[error("malformed response from {backend}: {reason}")]
    MalformedResponse { backend: String, reason: String },

    #[error("backend {backend} is not configured")]
    NotConfigured { backend: String },
}
