//! Flattened URL index and listing helpers.

use std::collections::BTreeMap;
use std::sync::Arc;

use mdw_meta::MetaValue;

use crate::navigation::NavigationNode;
use crate::page::Page;

/// URL path to page map built from a navigation tree.
///
/// Holds every page of the tree exactly once. Built in one pass and never
/// mutated; a rebuild produces a new index.
#[derive(Clone, Debug, Default)]
pub struct SiteIndex {
    by_url: BTreeMap<String, Arc<Page>>,
    pages: Vec<Arc<Page>>,
}

impl SiteIndex {
    /// Index every page of the tree rooted at `root`.
    ///
    /// Pages are collected in pre-order: a level's own page, then its child
    /// pages, then its child levels.
    #[must_use]
    pub fn flatten(root: &NavigationNode) -> Self {
        let mut index = Self::default();
        for nav in root.walk() {
            if let Some(page) = nav.page() {
                index.insert(page);
            }
            for page in nav.child_pages() {
                index.insert(page);
            }
        }
        index
    }

    fn insert(&mut self, page: &Arc<Page>) {
        let url = page.url_path();
        debug_assert!(!self.by_url.contains_key(url), "duplicate URL path '{url}'");
        if self.by_url.contains_key(url) {
            tracing::warn!(url, path = %page.file_path().display(), "Duplicate URL path ignored");
            return;
        }
        self.by_url.insert(url.to_owned(), Arc::clone(page));
        self.pages.push(Arc::clone(page));
    }

    /// Page for a URL path. Leading and trailing slashes are ignored.
    #[must_use]
    pub fn lookup(&self, url: &str) -> Option<&Arc<Page>> {
        self.by_url.get(url.trim_matches('/'))
    }

    /// All pages in pre-order.
    #[must_use]
    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    /// All URL paths in sorted order.
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_url.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Sort pages by a metainf field.
///
/// The key is `by_field` when the page has a non-null value for it (schema
/// or custom field), otherwise the page's `order`. Text compares
/// case-insensitively; keys of different kinds are ordered by kind. The
/// sort is stable, `reverse` flips the comparison, and `limit` truncates
/// the sorted result.
pub fn sort_pages<'a>(
    pages: impl IntoIterator<Item = &'a Arc<Page>>,
    by_field: &str,
    limit: Option<usize>,
    reverse: bool,
) -> Vec<Arc<Page>> {
    let mut keyed: Vec<(MetaValue, Arc<Page>)> = pages
        .into_iter()
        .map(|page| (sort_key(page, by_field), Arc::clone(page)))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.sort_cmp(b);
        if reverse { ordering.reverse() } else { ordering }
    });

    let sorted = keyed.into_iter().map(|(_, page)| page);
    match limit {
        Some(limit) => sorted.take(limit).collect(),
        None => sorted.collect(),
    }
}

fn sort_key(page: &Page, by_field: &str) -> MetaValue {
    let meta = page.meta_inf();
    meta.get(by_field)
        .filter(|value| !value.is_null())
        .cloned()
        .or_else(|| meta.custom(by_field).map(|v| MetaValue::Text(v.to_owned())))
        .unwrap_or(MetaValue::Int(page.order()))
}

/// Keep only published pages.
pub fn published<'a>(pages: impl IntoIterator<Item = &'a Arc<Page>>) -> Vec<Arc<Page>> {
    pages
        .into_iter()
        .filter(|page| page.is_published())
        .map(Arc::clone)
        .collect()
}
