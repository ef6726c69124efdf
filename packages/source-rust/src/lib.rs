//! Trend statistics paging engine -- resumable two-level pagination over
//! per-resource row-key enumerations and backend-computed aggregates.
//!
//! A host drives one [`PageAssembler`] per consumer session, calling
//! [`PageAssembler::fetch_page`] until the returned page reports
//! `has_more = false`. Backend failures never surface to the host: the
//! engine logs them, skips the affected unit of work, and keeps moving.

pub mod aggregate;
pub mod config;
pub mod cursor;
pub mod page;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::AggregateFetcher;
pub use config::SourceConfig;
pub use cursor::PageCursor;
pub use page::{Page, PageAssembler, ResultRow};
pub use session::RowKeySessionClient;
