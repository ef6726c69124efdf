//! Typed request/response schemas for the monitoring backend.
//!
//! Each submodule corresponds to one backend capability the paging
//! engine consumes. All structs use `#[serde(rename_all = "camelCase")]`
//! so transports can serialize them to the backend's wire format
//! without field mapping.

pub mod aggregate;
pub mod session;

pub use aggregate::{
    AggregateRequest, AggregateResponse, HistogramBucket, StatisticsSet, TrendStatistics,
};
pub use session::{
    CloseSessionRequest, ContinueSessionRequest, OpenSessionRequest, OpenSessionResponse,
    SessionPageResponse, TableColumn, TablePage,
};
