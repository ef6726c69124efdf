//! Trend aggregate messages.
//!
//! A histogram-style request whose buckets are all unbounded makes the
//! backend compute a single whole-window aggregate per row instead of
//! real histogram bins. That is the only shape the paging engine uses.

use serde::{Deserialize, Serialize};

/// One histogram bucket. `None` bounds mean "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// Inclusive lower bound, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lower: Option<f64>,
    /// Exclusive upper bound, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub upper: Option<f64>,
}

impl HistogramBucket {
    /// Bucket with both bounds unspecified, the sentinel that requests a
    /// whole-window aggregate rather than a binned distribution.
    pub const UNBOUNDED: Self = Self {
        lower: None,
        upper: None,
    };
}

/// Requests a trend summary for one `(resource, metric, row key)` over a
/// trailing time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    /// Agent hosting the resource.
    pub agent_id: i32,
    /// Resource the row belongs to.
    pub resource_id: i32,
    /// Table column (metric) to summarize.
    pub metric_id: i32,
    /// Primary key of the row to summarize.
    pub row_key: String,
    /// Window start, epoch milliseconds.
    pub window_start_ms: i64,
    /// Window end, epoch milliseconds.
    pub window_end_ms: i64,
    /// Requested buckets; all-[`HistogramBucket::UNBOUNDED`] for a
    /// whole-window aggregate.
    pub buckets: Vec<HistogramBucket>,
}

/// Statistics for one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStatistics {
    /// Average value over the bucket.
    pub average: f64,
}

/// Container for the per-bucket statistics of one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSet {
    /// Statistics values, one per bucket that has data.
    pub values: Vec<TrendStatistics>,
}

/// Response to [`AggregateRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    /// Computed statistics. Absent when the row has no trend data in
    /// the window.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub statistics: Option<StatisticsSet>,
}
