use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DataError;
use crate::provider::{EntityProvider, Table};

/// Paging parameters, deserializable from `?pageIndex=&pageSize=&countOnly=`.
///
/// `page_size` is signed so that zero or negative sizes coming from a request
/// reach the paging adapter, which treats them as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page_index: u64,
    pub page_size: i64,
    pub count_only: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: i64::MAX,
            count_only: false,
        }
    }
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: i64) -> Self {
        Self {
            page_index,
            page_size,
            count_only: false,
        }
    }

    /// Request only the total count; no rows are materialized.
    pub fn count_only(mut self) -> Self {
        self.count_only = true;
        self
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub page_index: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedList<T> {
    /// Build a page. A `page_size` of zero is treated as `1`.
    pub fn new(items: Vec<T>, page_index: u64, page_size: u64, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size);
        Self {
            items,
            page_index,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page_index > 0,
            has_next_page: page_index.saturating_add(1) < total_pages,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> std::ops::Deref for PagedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'p, E, P> Table<'p, E, P>
where
    E: Entity,
    P: EntityProvider<E>,
{
    /// Materialize one page of this view.
    ///
    /// The total is always counted first. Unless `count_only` is set, the
    /// view then skips `page_index * page_size` rows and takes `page_size`.
    /// Count and page are two separate queries and may disagree if the table
    /// changes in between.
    pub async fn to_paged_list(
        self,
        page_index: u64,
        page_size: i64,
        count_only: bool,
    ) -> Result<PagedList<E>, DataError> {
        let page_size = page_size.max(1) as u64;
        let total_count = self.count().await?;

        if count_only {
            return Ok(PagedList::new(Vec::new(), page_index, page_size, total_count));
        }

        let items = self
            .skip(page_index.saturating_mul(page_size))
            .take(page_size)
            .to_list()
            .await?;
        Ok(PagedList::new(items, page_index, page_size, total_count))
    }
}
