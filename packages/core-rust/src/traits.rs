//! Backend transport trait.

use crate::error::TransportError;
use crate::messages::{
    AggregateRequest, AggregateResponse, CloseSessionRequest, ContinueSessionRequest,
    OpenSessionRequest, OpenSessionResponse, SessionPageResponse,
};

/// Blocking request/response interface to the monitoring backend.
///
/// Every method is one synchronous exchange; timeout and retry policy
/// belong to the implementation, not to callers. The paging engine holds
/// this as `Arc<dyn Backend>` and treats any [`TransportError`] as
/// "no data" for the unit of work in flight.
pub trait Backend: Send + Sync {
    /// Open a row-key enumeration session, returning page 1.
    fn open_row_key_session(
        &self,
        request: &OpenSessionRequest,
    ) -> Result<OpenSessionResponse, TransportError>;

    /// Fetch a subsequent page of an open session.
    fn continue_row_key_session(
        &self,
        request: &ContinueSessionRequest,
    ) -> Result<SessionPageResponse, TransportError>;

    /// Release a session's server-side resources.
    fn close_row_key_session(&self, request: &CloseSessionRequest) -> Result<(), TransportError>;

    /// Compute a trend aggregate for one row over a time window.
    fn fetch_aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<AggregateResponse, TransportError>;
}
