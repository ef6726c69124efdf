//! Row-key session messages.
//!
//! The backend enumerates a table's row keys through a numbered session:
//! opening one returns the session id together with page 1, subsequent
//! pages are requested by `(session_id, page_number)`, and the session
//! must be closed explicitly once the caller is done with it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Opens a row-key enumeration session for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    /// Agent hosting the resource.
    pub agent_id: i32,
    /// Resource whose table is enumerated.
    pub resource_id: i32,
    /// Table column (metric) whose rows are enumerated.
    pub metric_id: i32,
    /// Server-side row filters, applied in order.
    pub filters: Vec<String>,
}

/// Requests the next page of an open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueSessionRequest {
    /// Agent hosting the resource.
    pub agent_id: i32,
    /// Resource whose table is enumerated.
    pub resource_id: i32,
    /// Session returned by the open call.
    pub session_id: i64,
    /// 1-based page number to fetch.
    pub page_number: u32,
}

/// Releases a session's server-side resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSessionRequest {
    /// Agent hosting the resource.
    pub agent_id: i32,
    /// Resource whose table was enumerated.
    pub resource_id: i32,
    /// Session to close.
    pub session_id: i64,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One column of a table page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    /// Cell values, one per row. `None` for cells without a value.
    pub cells: Vec<Option<String>>,
}

/// Columnar table payload of one session page.
///
/// By backend convention, `columns[0]` is the primary-key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    /// Columns in table order.
    pub columns: Vec<TableColumn>,
}

/// Response to [`OpenSessionRequest`], carrying page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionResponse {
    /// Identifier for subsequent continue/close calls.
    pub session_id: i64,
    /// Total page count, when the backend already knows it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_pages: Option<u32>,
    /// Page 1 of the enumeration. Absent when the table has no
    /// matching rows at all.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<TablePage>,
}

/// Response to [`ContinueSessionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPageResponse {
    /// Total page count, when the backend already knows it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_pages: Option<u32>,
    /// The requested page. Absent past the end of the enumeration.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<TablePage>,
}
