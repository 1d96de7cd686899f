//! Cursor-following merge for paginated listings.
//!
//! [`collect_pages`] follows a single connection to its end. [`merge_paired`]
//! handles two connections fetched together in one round trip: while both
//! report a further page it advances both cursors with one combined request;
//! once only one does, it falls back to the cheaper single-field request for
//! that one. Nodes are concatenated in page order with no reordering or
//! de-duplication.
//!
//! Every loop is capped at [`MAX_PAGE_ROUNDS`] follow-up requests so a store
//! that never reports the last page fails the run instead of spinning.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{StoreError, SyncError};

/// Maximum number of follow-up requests issued for one listing.
pub const MAX_PAGE_ROUNDS: usize = 100;

/// Continuation state returned with every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Page info for the final page.
    pub fn last() -> Self {
        Self::default()
    }

    /// Page info announcing a further page after `cursor`.
    pub fn more(cursor: impl Into<String>) -> Self {
        Self {
            has_next_page: true,
            end_cursor: Some(cursor.into()),
        }
    }

    /// The cursor to continue from, or `None` if this was the last page.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// One page of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(nodes: Vec<T>, page_info: PageInfo) -> Self {
        Self { nodes, page_info }
    }
}

/// Follows `first` to the end of its connection, calling `fetch` with each
/// continuation cursor.
pub async fn collect_pages<T, E, F, Fut>(first: Page<T>, mut fetch: F) -> Result<Vec<T>, SyncError>
where
    E: Into<SyncError>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut nodes = first.nodes;
    let mut cursor = first.page_info.next_cursor().map(str::to_owned);
    let mut rounds = 0;

    while let Some(after) = cursor {
        if rounds == MAX_PAGE_ROUNDS {
            return Err(SyncError::PaginationRunaway { rounds });
        }
        rounds += 1;

        let page = fetch(after).await.map_err(Into::into)?;
        cursor = page.page_info.next_cursor().map(str::to_owned);
        nodes.extend(page.nodes);
    }

    Ok(nodes)
}

/// Two connections that can be fetched together or one at a time.
#[async_trait]
pub trait PairedPageSource: Send + Sync {
    type First: Send;
    type Second: Send;

    /// Advances both connections in a single request.
    async fn fetch_both(
        &self,
        first_after: &str,
        second_after: &str,
    ) -> Result<(Page<Self::First>, Page<Self::Second>), StoreError>;

    /// Advances only the first connection.
    async fn fetch_first(&self, after: &str) -> Result<Page<Self::First>, StoreError>;

    /// Advances only the second connection.
    async fn fetch_second(&self, after: &str) -> Result<Page<Self::Second>, StoreError>;
}

/// Completes two connections whose first pages were fetched together.
pub async fn merge_paired<S>(
    source: &S,
    first: Page<S::First>,
    second: Page<S::Second>,
) -> Result<(Vec<S::First>, Vec<S::Second>), SyncError>
where
    S: PairedPageSource + ?Sized,
{
    let mut first_nodes = first.nodes;
    let mut second_nodes = second.nodes;
    let mut first_info = first.page_info;
    let mut second_info = second.page_info;

    for _ in 0..MAX_PAGE_ROUNDS {
        let first_cursor = first_info.next_cursor().map(str::to_owned);
        let second_cursor = second_info.next_cursor().map(str::to_owned);

        match (first_cursor, second_cursor) {
            (Some(a), Some(b)) => {
                let (next_first, next_second) = source.fetch_both(&a, &b).await?;
                first_nodes.extend(next_first.nodes);
                second_nodes.extend(next_second.nodes);
                first_info = next_first.page_info;
                second_info = next_second.page_info;
            }
            (Some(_), None) => {
                let rest = Page::new(first_nodes, first_info);
                let all = collect_pages(rest, |after| async move {
                    source.fetch_first(&after).await
                })
                .await?;
                return Ok((all, second_nodes));
            }
            (None, Some(_)) => {
                let rest = Page::new(second_nodes, second_info);
                let all = collect_pages(rest, |after| async move {
                    source.fetch_second(&after).await
                })
                .await?;
                return Ok((first_nodes, all));
            }
            (None, None) => return Ok((first_nodes, second_nodes)),
        }
    }

    Err(SyncError::PaginationRunaway {
        rounds: MAX_PAGE_ROUNDS,
    })
}
