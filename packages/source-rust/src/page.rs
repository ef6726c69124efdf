//! Page assembler -- the two-level pagination engine.
//!
//! Walks the resource list with an outer loop and each resource's
//! row-key enumeration with an inner loop, emitting at most one page of
//! result rows per call and resuming from a [`PageCursor`] on the next.
//! Hosts call [`PageAssembler::fetch_page`] repeatedly until `has_more`
//! is false.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, error, warn};
use trendstats_core::{Backend, ResourceRef};

use crate::aggregate::AggregateFetcher;
use crate::config::SourceConfig;
use crate::cursor::PageCursor;
use crate::session::RowKeySessionClient;

/// One output row: a resource, one of its table rows, and the
/// backend-computed average for the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    /// Display key of the resource.
    pub resource_key: String,
    /// Primary key of the table row.
    pub row_key: String,
    /// Whole-window average.
    pub average: f64,
}

/// One bounded page of output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Rows in resource order, then row-key enumeration order.
    pub rows: Vec<ResultRow>,
    /// Whether another call will yield more rows.
    pub has_more: bool,
}

/// Resumable two-level pagination engine.
///
/// Owns the only mutable state carried between calls (the cursor plus
/// the row-key cache); the resource list is fixed for the lifetime of
/// the assembler, and slot order must be stable since the cursor indexes
/// into it. Not meant to be shared across threads: one assembler serves
/// one consumer session, called strictly sequentially.
pub struct PageAssembler {
    resources: Vec<Option<ResourceRef>>,
    max_page_size: usize,
    session_client: RowKeySessionClient,
    fetcher: AggregateFetcher,
    cursor: PageCursor,
    /// Most recent successful row-key fetch, keyed by resource index.
    /// Lets the look-ahead probe and the next `fetch_page` share one
    /// backend enumeration at resource boundaries. Failed fetches are
    /// never cached.
    row_key_cache: Option<(usize, Arc<[String]>)>,
}

impl PageAssembler {
    /// Creates an assembler over a fixed, ordered resource list.
    ///
    /// `None` slots are tolerated and skipped during paging, mirroring
    /// discovery results with holes.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        config: &SourceConfig,
        resources: Vec<Option<ResourceRef>>,
    ) -> Self {
        Self {
            resources,
            max_page_size: config.max_page_size,
            session_client: RowKeySessionClient::new(Arc::clone(&backend), config),
            fetcher: AggregateFetcher::new(backend, config),
            cursor: PageCursor::start(),
            row_key_cache: None,
        }
    }

    /// Current cursor position. Exposed for host diagnostics.
    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Assembles the next page of result rows.
    ///
    /// Always returns within the page-size bound and never re-emits a
    /// row from an earlier call. An unexpected internal fault returns
    /// the rows accumulated so far with `has_more = false`: terminating
    /// the host's paging loop matters more than the flag's accuracy.
    pub fn fetch_page(&mut self) -> Page {
        let mut rows = Vec::new();

        let has_more = match self.fill_page(&mut rows) {
            Ok(()) => self.has_more(),
            Err(err) => {
                error!(error = %err, "unexpected failure while assembling page");
                false
            }
        };

        debug!(rows = rows.len(), has_more, "assembled page");
        Page { rows, has_more }
    }

    /// Whether any output remains past the current cursor position.
    ///
    /// Does not mutate the cursor. Mid-resource the answer is a cheap
    /// `true`; at the start of a resource its row keys are fetched
    /// (through the cache) purely to check non-emptiness.
    pub fn has_more(&mut self) -> bool {
        let index = self.cursor.resource_index;
        if index >= self.resources.len() {
            return false;
        }
        if self.cursor.row_offset > 0 {
            // Mid-resource: remaining row keys certainly exist.
            return true;
        }

        let subsequent_exists = index + 1 < self.resources.len();
        match self.resources[index].clone() {
            Some(resource) => match self.row_keys_for(index, &resource) {
                Some(keys) => !keys.is_empty() || subsequent_exists,
                // Fetch failed: conservatively defer to later resources.
                None => subsequent_exists,
            },
            None => subsequent_exists,
        }
    }

    /// The fill loop, separated so `fetch_page` can catch anything
    /// unexpected and still hand back the rows gathered so far.
    fn fill_page(&mut self, rows: &mut Vec<ResultRow>) -> anyhow::Result<()> {
        while rows.len() < self.max_page_size && self.cursor.resource_index < self.resources.len()
        {
            let index = self.cursor.resource_index;
            let slot = self
                .resources
                .get(index)
                .context("cursor points past the resource list")?;
            let Some(resource) = slot.clone() else {
                warn!(index, "empty resource slot, skipping");
                self.cursor.advance_resource();
                continue;
            };

            let Some(row_keys) = self.row_keys_for(index, &resource) else {
                // Enumeration failed; the resource contributes nothing.
                self.cursor.advance_resource();
                continue;
            };
            if row_keys.is_empty() {
                warn!(resource = %resource.key, "no trended row keys, skipping resource");
                self.cursor.advance_resource();
                continue;
            }

            while self.cursor.row_offset < row_keys.len() && rows.len() < self.max_page_size {
                let offset = self.cursor.row_offset;
                let row_key = &row_keys[offset];
                if row_key.trim().is_empty() {
                    warn!(resource = %resource.key, offset, "blank row key, skipping");
                    self.cursor.advance_row(offset + 1);
                    continue;
                }

                if let Some(average) = self.fetcher.fetch_average(&resource, row_key) {
                    debug!(
                        resource = %resource.key,
                        row_key = %row_key,
                        average,
                        count = rows.len() + 1,
                        "row assembled"
                    );
                    rows.push(ResultRow {
                        resource_key: resource.key.clone(),
                        row_key: row_key.clone(),
                        average,
                    });
                }
                // Rows without an aggregate advance the cursor too; they
                // just contribute nothing to the page.
                self.cursor.advance_row(offset + 1);
            }

            if self.cursor.row_offset >= row_keys.len() {
                self.cursor.advance_resource();
            } else {
                // Page filled mid-resource; stay on this resource.
                break;
            }
        }

        Ok(())
    }

    /// Row keys for the resource at `index`, served from the cache when
    /// the last successful fetch was for the same index.
    fn row_keys_for(&mut self, index: usize, resource: &ResourceRef) -> Option<Arc<[String]>> {
        if let Some((cached_index, keys)) = &self.row_key_cache {
            if *cached_index == index {
                return Some(Arc::clone(keys));
            }
        }

        let keys: Arc<[String]> = self.session_client.fetch_all_row_keys(resource)?.into();
        self.row_key_cache = Some((index, Arc::clone(&keys)));
        Some(keys)
    }
}
