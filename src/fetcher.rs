//! Page-by-page retrieval of GitHub list endpoints.

use crate::error::Result;
use std::future::Future;

/// GitHub's largest allowed page size.
pub const PER_PAGE: u8 = 100;

/// GitHub REST pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page to request next, or `None` on the last page.
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    pub fn empty() -> Self {
        Self::last(Vec::new())
    }
}

/// Requests pages starting at [`FIRST_PAGE`] until one reports no successor,
/// returning every item in page order.
///
/// The first failing page aborts the whole listing; items gathered from earlier
/// pages are dropped along with it.
pub async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let current = fetch(page).await?;
        tracing::debug!(page, count = current.items.len(), "Fetched page");
        items.extend(current.items);

        match current.next_page {
            Some(next) if next != 0 => page = next,
            _ => break,
        }
    }

    Ok(items)
}
