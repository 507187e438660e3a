//! Span definitions per operation.

/// Span wrapping one `answer` call.
#[macro_export]
macro_rules! answer_span {
    ($request_id:expr) => {
        tracing::info_span!("tributary.answer", request_id = %$request_id)
    };
}

/// Span wrapping the retrieval half of a request (search, fuse, rerank).
#[macro_export]
macro_rules! retrieval_span {
    ($k:expr) => {
        tracing::info_span!("tributary.retrieval", k = $k)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ANSWER: &str = "tributary.answer";
    pub const RETRIEVAL: &str = "tributary.retrieval";
}
