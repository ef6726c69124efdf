//! Row-key session client.
//!
//! Enumerates all trended row keys of one resource through the backend's
//! numbered-session protocol: open returns page 1 and a session id,
//! further pages are requested by `(session_id, page_number)`, and the
//! session is closed explicitly on every exit path.

use std::sync::Arc;

use tracing::{debug, warn};
use trendstats_core::messages::{
    CloseSessionRequest, ContinueSessionRequest, OpenSessionRequest, TablePage,
};
use trendstats_core::{Backend, ResourceRef, TransportError};

use crate::config::SourceConfig;

/// Lifecycle of the server-side session handle during one enumeration.
///
/// Every exit path of [`RowKeySessionClient::fetch_all_row_keys`] must
/// leave this in `Closed` if it ever reached `Open`; the close is issued
/// explicitly rather than through a `Drop` impl so that error paths are
/// visible in the control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Unopened,
    Open { session_id: i64, page_number: u32 },
    Closed,
}

/// Drives the backend's session protocol to enumerate row keys.
pub struct RowKeySessionClient {
    backend: Arc<dyn Backend>,
    metric_id: i32,
    row_filter: Option<String>,
}

impl RowKeySessionClient {
    /// Creates a client for the configured metric and row filter.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: &SourceConfig) -> Self {
        Self {
            backend,
            metric_id: config.metric_id,
            row_filter: config.row_filter.clone(),
        }
    }

    /// Enumerates all trended row keys for `resource`.
    ///
    /// Returns `Some(keys)` (possibly empty) for a completed enumeration
    /// and `None` when a transport failure abandoned it. Failures are
    /// logged here and never propagated; callers treat `None` like an
    /// empty resource but must not cache it.
    pub fn fetch_all_row_keys(&self, resource: &ResourceRef) -> Option<Vec<String>> {
        let mut session = SessionState::Unopened;
        let outcome = self.enumerate(resource, &mut session);
        self.close_if_open(resource, &mut session);

        match outcome {
            Ok(keys) => {
                debug!(resource = %resource.key, count = keys.len(), "row-key enumeration complete");
                Some(keys)
            }
            Err(err) => {
                warn!(resource = %resource.key, error = %err, "row-key enumeration failed");
                None
            }
        }
    }

    /// Runs the open/continue loop. `session` tracks the handle so the
    /// caller can guarantee the close even when this returns `Err`.
    fn enumerate(
        &self,
        resource: &ResourceRef,
        session: &mut SessionState,
    ) -> Result<Vec<String>, TransportError> {
        let open = self.backend.open_row_key_session(&OpenSessionRequest {
            agent_id: resource.agent_id,
            resource_id: resource.resource_id,
            metric_id: self.metric_id,
            filters: self.build_filters(),
        })?;

        let session_id = open.session_id;
        let mut page_number: u32 = 1;
        let mut total_pages = open.total_pages;
        *session = SessionState::Open {
            session_id,
            page_number,
        };

        // An absent payload on page 1 means the table has no trended
        // rows at all, not an error.
        let Some(first) = open.page else {
            return Ok(Vec::new());
        };

        let mut keys = parse_row_keys(&first);
        if keys.is_empty() {
            return Ok(keys);
        }

        loop {
            if let Some(total) = total_pages {
                if page_number >= total {
                    // No further page request will be issued, so release
                    // the session now instead of on the way out.
                    self.close(resource, session_id);
                    *session = SessionState::Closed;
                    return Ok(keys);
                }
            }

            page_number += 1;
            *session = SessionState::Open {
                session_id,
                page_number,
            };

            let response = self
                .backend
                .continue_row_key_session(&ContinueSessionRequest {
                    agent_id: resource.agent_id,
                    resource_id: resource.resource_id,
                    session_id,
                    page_number,
                })?;

            if response.total_pages.is_some() {
                total_pages = response.total_pages;
            }

            let Some(page) = response.page else {
                return Ok(keys);
            };

            let page_keys = parse_row_keys(&page);
            if page_keys.is_empty() {
                return Ok(keys);
            }
            keys.extend(page_keys);
        }
    }

    /// Always include the trend filter selecting rows with real-time or
    /// averaged trending on the metric, then the caller's filter if any.
    fn build_filters(&self) -> Vec<String> {
        let mut filters = vec![format!("trend=avg,{0}|rt,{0}", self.metric_id)];
        if let Some(filter) = self.row_filter.as_deref() {
            if !filter.trim().is_empty() {
                filters.push(filter.to_string());
            }
        }
        filters
    }

    fn close_if_open(&self, resource: &ResourceRef, session: &mut SessionState) {
        if let SessionState::Open { session_id, .. } = *session {
            self.close(resource, session_id);
            *session = SessionState::Closed;
        }
    }

    /// A close failure must never block forward progress, so it is
    /// logged and swallowed.
    fn close(&self, resource: &ResourceRef, session_id: i64) {
        let request = CloseSessionRequest {
            agent_id: resource.agent_id,
            resource_id: resource.resource_id,
            session_id,
        };
        if let Err(err) = self.backend.close_row_key_session(&request) {
            warn!(resource = %resource.key, session_id, error = %err, "failed to close row-key session");
        }
    }
}

/// Extracts row keys from the primary-key column (column 0) of a page.
///
/// `None` and blank cells are skipped silently.
fn parse_row_keys(page: &TablePage) -> Vec<String> {
    let Some(primary_key_column) = page.columns.first() else {
        return Vec::new();
    };
    primary_key_column
        .cells
        .iter()
        .flatten()
        .filter(|cell| !cell.trim().is_empty())
        .cloned()
        .collect()
}
