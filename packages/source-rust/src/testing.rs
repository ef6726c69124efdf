//! Scripted in-memory [`Backend`] for engine tests.
//!
//! Each resource gets a [`ResourceScript`] describing its row-key pages,
//! aggregates, and injected failures. The backend keeps per-resource
//! call counts and a live session table so tests can assert the
//! open/close balance of the session protocol.

use std::collections::HashMap;
use std::sync::Mutex;

use trendstats_core::messages::{
    AggregateRequest, AggregateResponse, CloseSessionRequest, ContinueSessionRequest,
    OpenSessionRequest, OpenSessionResponse, SessionPageResponse, StatisticsSet, TableColumn,
    TablePage, TrendStatistics,
};
use trendstats_core::{Backend, ResourceRef, TransportError};

type ResourceId = (i32, i32);

/// Scripted behavior of one resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceScript {
    /// Primary-key column cells, one inner vec per session page. An
    /// empty outer vec makes the open response carry no payload.
    pub pages: Vec<Vec<Option<String>>>,
    /// Total page count advertised in every response, if any.
    pub total_pages: Option<u32>,
    /// Fail the open call.
    pub fail_open: bool,
    /// Fail the continue call for this page number.
    pub fail_continue_at: Option<u32>,
    /// Fail the close call.
    pub fail_close: bool,
    /// Row keys with an available aggregate.
    pub aggregates: HashMap<String, f64>,
    /// Row keys whose aggregate call fails.
    pub failing_aggregates: Vec<String>,
}

impl ResourceScript {
    /// Script with one page of row keys.
    pub fn single_page(keys: &[&str]) -> Self {
        Self::paged(&[keys])
    }

    /// Script with the given pages of row keys.
    pub fn paged(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|page| page.iter().map(|key| Some((*key).to_string())).collect())
                .collect(),
            ..Self::default()
        }
    }

    /// Script whose open response carries no payload (no trended rows).
    pub fn no_rows() -> Self {
        Self::default()
    }

    pub fn total_pages(mut self, total: u32) -> Self {
        self.total_pages = Some(total);
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn fail_continue_at(mut self, page_number: u32) -> Self {
        self.fail_continue_at = Some(page_number);
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn aggregate(mut self, key: &str, average: f64) -> Self {
        self.aggregates.insert(key.to_string(), average);
        self
    }

    pub fn fail_aggregate(mut self, key: &str) -> Self {
        self.failing_aggregates.push(key.to_string());
        self
    }
}

#[derive(Debug, Default)]
struct State {
    scripts: HashMap<ResourceId, ResourceScript>,
    next_session_id: i64,
    open_sessions: HashMap<i64, ResourceId>,
    opens: HashMap<ResourceId, usize>,
    continues: HashMap<ResourceId, usize>,
    closes: HashMap<ResourceId, usize>,
    last_open_filters: HashMap<ResourceId, Vec<String>>,
    last_aggregate_request: Option<AggregateRequest>,
}

/// In-memory backend driven by [`ResourceScript`]s.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    state: Mutex<State>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the script for `resource`.
    pub fn script(&self, resource: &ResourceRef, script: ResourceScript) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(id_of(resource), script);
    }

    pub fn open_count(&self, resource: &ResourceRef) -> usize {
        self.count(&self.state.lock().unwrap().opens, resource)
    }

    pub fn continue_count(&self, resource: &ResourceRef) -> usize {
        self.count(&self.state.lock().unwrap().continues, resource)
    }

    pub fn close_count(&self, resource: &ResourceRef) -> usize {
        self.count(&self.state.lock().unwrap().closes, resource)
    }

    /// Number of sessions opened but never closed.
    pub fn sessions_outstanding(&self) -> usize {
        self.state.lock().unwrap().open_sessions.len()
    }

    pub fn last_open_filters(&self, resource: &ResourceRef) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .last_open_filters
            .get(&id_of(resource))
            .cloned()
    }

    pub fn last_aggregate_request(&self) -> Option<AggregateRequest> {
        self.state.lock().unwrap().last_aggregate_request.clone()
    }

    fn count(&self, counts: &HashMap<ResourceId, usize>, resource: &ResourceRef) -> usize {
        counts.get(&id_of(resource)).copied().unwrap_or(0)
    }
}

impl Backend for ScriptedBackend {
    fn open_row_key_session(
        &self,
        request: &OpenSessionRequest,
    ) -> Result<OpenSessionResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let id = (request.agent_id, request.resource_id);
        *state.opens.entry(id).or_default() += 1;
        state.last_open_filters.insert(id, request.filters.clone());

        let script = state.scripts.get(&id).cloned().unwrap_or_default();
        if script.fail_open {
            return Err(TransportError::Unavailable);
        }

        state.next_session_id += 1;
        let session_id = state.next_session_id;
        state.open_sessions.insert(session_id, id);

        Ok(OpenSessionResponse {
            session_id,
            total_pages: script.total_pages,
            page: script.pages.first().map(|cells| page_of(cells)),
        })
    }

    fn continue_row_key_session(
        &self,
        request: &ContinueSessionRequest,
    ) -> Result<SessionPageResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let id = (request.agent_id, request.resource_id);
        *state.continues.entry(id).or_default() += 1;

        if state.open_sessions.get(&request.session_id) != Some(&id) {
            return Err(TransportError::Backend {
                message: format!("unknown session {}", request.session_id),
            });
        }

        let script = state.scripts.get(&id).cloned().unwrap_or_default();
        if script.fail_continue_at == Some(request.page_number) {
            return Err(TransportError::Timeout);
        }

        Ok(SessionPageResponse {
            total_pages: script.total_pages,
            page: script
                .pages
                .get(request.page_number as usize - 1)
                .map(|cells| page_of(cells)),
        })
    }

    fn close_row_key_session(&self, request: &CloseSessionRequest) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        let id = (request.agent_id, request.resource_id);
        *state.closes.entry(id).or_default() += 1;

        // The session is reaped either way; a double close shows up as
        // both an error and an inflated close count.
        let known = state.open_sessions.remove(&request.session_id).is_some();
        let script = state.scripts.get(&id).cloned().unwrap_or_default();

        if !known {
            return Err(TransportError::Backend {
                message: format!("unknown session {}", request.session_id),
            });
        }
        if script.fail_close {
            return Err(TransportError::Unavailable);
        }
        Ok(())
    }

    fn fetch_aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<AggregateResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let id = (request.agent_id, request.resource_id);
        state.last_aggregate_request = Some(request.clone());

        let script = state.scripts.get(&id).cloned().unwrap_or_default();
        if script.failing_aggregates.contains(&request.row_key) {
            return Err(TransportError::Timeout);
        }

        Ok(AggregateResponse {
            statistics: script.aggregates.get(&request.row_key).map(|&average| {
                StatisticsSet {
                    values: vec![TrendStatistics { average }],
                }
            }),
        })
    }
}

fn id_of(resource: &ResourceRef) -> ResourceId {
    (resource.agent_id, resource.resource_id)
}

/// Builds a two-column page: the primary-key column plus a dummy data
/// column, so parsing stays honest about only reading column 0.
fn page_of(cells: &[Option<String>]) -> TablePage {
    TablePage {
        columns: vec![
            TableColumn {
                cells: cells.to_vec(),
            },
            TableColumn {
                cells: vec![Some("-".to_string()); cells.len()],
            },
        ],
    }
}
