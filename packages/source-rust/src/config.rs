//! Configuration snapshot for one data-source invocation.

/// Immutable configuration for one pagination session.
///
/// No `Default` impl because the metric id has no sensible default;
/// everything else defaults to the values of [`SourceConfig::new`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Maximum number of result rows per page.
    pub max_page_size: usize,
    /// Table column (metric) to aggregate.
    pub metric_id: i32,
    /// Trailing window length for aggregates, in days.
    pub trend_window_days: u32,
    /// Number of aggregation buckets requested per aggregate call.
    pub bucket_count: usize,
    /// Optional extra row filter in the backend's native filter syntax.
    pub row_filter: Option<String>,
}

impl SourceConfig {
    /// Creates a configuration for `metric_id` with default paging and
    /// windowing values.
    #[must_use]
    pub fn new(metric_id: i32) -> Self {
        Self {
            max_page_size: 10,
            metric_id,
            trend_window_days: 30,
            bucket_count: 100,
            row_filter: None,
        }
    }
}
