//! Transport failure type raised by [`Backend`](crate::Backend) calls.

/// Failure of a single backend request/response exchange.
///
/// The paging engine handles every variant the same way (log the call,
/// treat the unit of work as having no data), but transports report what
/// actually went wrong so diagnostics stay useful.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("backend unavailable")]
    Unavailable,
    #[error("request timed out")]
    Timeout,
    #[error("backend error: {message}")]
    Backend { message: String },
    #[error("malformed response: {message}")]
    Decode { message: String },
}
