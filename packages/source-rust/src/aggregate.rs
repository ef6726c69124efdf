//! Per-row trend aggregate fetcher.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;
use trendstats_core::messages::{AggregateRequest, HistogramBucket};
use trendstats_core::{Backend, ResourceRef};

use crate::config::SourceConfig;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Fetches one whole-window average per `(resource, row key)` pair.
pub struct AggregateFetcher {
    backend: Arc<dyn Backend>,
    metric_id: i32,
    trend_window_days: u32,
    // All buckets unbounded: the backend then computes one aggregate
    // over the whole window instead of real histogram bins.
    buckets: Vec<HistogramBucket>,
}

impl AggregateFetcher {
    /// Creates a fetcher, building the bucket set once up front.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: &SourceConfig) -> Self {
        Self {
            backend,
            metric_id: config.metric_id,
            trend_window_days: config.trend_window_days,
            buckets: vec![HistogramBucket::UNBOUNDED; config.bucket_count],
        }
    }

    /// Returns the average for `row_key` over the trailing window, or
    /// `None` when the backend has no statistics for it or the call
    /// failed. Failures are logged, never propagated.
    pub fn fetch_average(&self, resource: &ResourceRef, row_key: &str) -> Option<f64> {
        let window_end_ms = epoch_millis_now();
        let window_start_ms = window_end_ms - i64::from(self.trend_window_days) * MILLIS_PER_DAY;

        let request = AggregateRequest {
            agent_id: resource.agent_id,
            resource_id: resource.resource_id,
            metric_id: self.metric_id,
            row_key: row_key.to_string(),
            window_start_ms,
            window_end_ms,
            buckets: self.buckets.clone(),
        };

        match self.backend.fetch_aggregate(&request) {
            Ok(response) => response
                .statistics
                .and_then(|set| set.values.first().copied())
                .map(|stats| stats.average),
            Err(err) => {
                warn!(resource = %resource.key, row_key, error = %err, "failed to fetch aggregate");
                None
            }
        }
    }
}

/// Current time as epoch milliseconds.
fn epoch_millis_now() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    i64::try_from(millis).unwrap_or(i64::MAX)
}
