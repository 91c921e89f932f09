//! Paginated follow-edge fetching
//!
//! One call fetches one page; [`FollowsFetcher::fetch_all`] walks the cursor
//! chain with an explicit bounded loop so the per-entity edge cap is a loop
//! invariant rather than a recursion-depth side effect.

use tracing::debug;

use crate::api::{ApiResult, HelixClient};
use crate::{Direction, FollowRecord};

/// One page of follow edges plus its continuation state.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowPage {
    /// Edges on this page, at most the requested page size
    pub records: Vec<FollowRecord>,
    /// Continuation cursor; `None` on the last page
    pub cursor: Option<String>,
    /// Total matching edges reported by the API
    pub total: Option<u64>,
}

/// Accumulated edges for one entity, bounded by the configured edge cap.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    /// Edges in page order
    pub records: Vec<FollowRecord>,
    /// Total reported by the API on the first page; may exceed `records.len()`
    pub total: Option<u64>,
}

/// Fetches follow edges page by page through a [`HelixClient`].
pub struct FollowsFetcher<'a> {
    client: &'a HelixClient,
    page_size: u32,
    edge_cap: usize,
}

impl<'a> FollowsFetcher<'a> {
    /// Create a fetcher with an explicit page size and edge cap.
    pub fn new(client: &'a HelixClient, page_size: u32, edge_cap: usize) -> Self {
        Self {
            client,
            page_size,
            edge_cap,
        }
    }

    /// Fetch one page of edges for `id` in `direction`.
    ///
    /// Returns `None` whenever the client yields no usable records for any
    /// reason, including after the client's exhausted 429 retry.
    pub async fn fetch_page(
        &self,
        id: u64,
        direction: Direction,
        cursor: Option<&str>,
    ) -> ApiResult<Option<FollowPage>> {
        let mut params = vec![
            (direction.query_param(), id.to_string()),
            ("first", self.page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("after", cursor.to_string()));
        }

        let envelope = self
            .client
            .get::<FollowRecord>("/users/follows", &params)
            .await?;

        let cursor = envelope.cursor().map(|c| c.to_string());
        let total = envelope.total;
        let Some(mut records) = envelope.into_records() else {
            return Ok(None);
        };

        // The page-size bound is an invariant, not a hope about the server.
        records.truncate(self.page_size as usize);

        Ok(Some(FollowPage {
            records,
            cursor,
            total,
        }))
    }

    /// Fetch all edges for `id` in `direction`, up to the edge cap.
    ///
    /// The cap is checked between pages, never mid-page: a partial final page
    /// is kept in full, and worst-case work per entity is `cap / page_size`
    /// API calls regardless of true graph size.
    pub async fn fetch_all(&self, id: u64, direction: Direction) -> ApiResult<Option<EdgeSet>> {
        let Some(first) = self.fetch_page(id, direction, None).await? else {
            return Ok(None);
        };

        let total = first.total;
        let mut records = first.records;
        let mut cursor = first.cursor;

        while let Some(next) = cursor.take() {
            if records.len() >= self.edge_cap {
                debug!(
                    id,
                    edges = records.len(),
                    cap = self.edge_cap,
                    "Edge cap reached; stopping pagination"
                );
                break;
            }

            match self.fetch_page(id, direction, Some(&next)).await? {
                Some(page) => {
                    records.extend(page.records);
                    cursor = page.cursor;
                }
                // A mid-chain empty page ends the walk; keep what we have.
                None => break,
            }
        }

        debug!(id, direction = %direction, edges = records.len(), "Edge fetch complete");
        Ok(Some(EdgeSet { records, total }))
    }
}
