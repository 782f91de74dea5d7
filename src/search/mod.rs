mod debounce;

pub(crate) use debounce::Debouncer;

use crate::collapse::CollapseStateStore;
use crate::index::BookmarkIndex;
use crate::storage::KvStore;
use std::sync::Arc;

pub(crate) const DEFAULT_DEBOUNCE_MS: i32 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CategoryVisibility {
    pub visible: bool,
    /// Per-link flags. Meaningless while `visible` is false.
    pub links: Vec<bool>,
}

/// Visibility decisions for every category and link of an index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FilterView {
    categories: Vec<CategoryVisibility>,
}

impl FilterView {
    pub fn all_visible(index: &BookmarkIndex) -> Self {
        Self {
            categories: index
                .categories()
                .iter()
                .map(|c| CategoryVisibility {
                    visible: true,
                    links: vec![true; c.links.len()],
                })
                .collect(),
        }
    }

    pub fn is_category_visible(&self, category: usize) -> bool {
        self.categories
            .get(category)
            .map(|c| c.visible)
            .unwrap_or(true)
    }

    pub fn is_link_visible(&self, category: usize, link: usize) -> bool {
        self.categories
            .get(category)
            .and_then(|c| c.links.get(link).copied())
            .unwrap_or(true)
    }

    /// Links a user can actually see: visible link in a visible category.
    pub fn visible_link_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.links.iter().filter(|v| **v).count())
            .sum()
    }
}

/// Lowercased, trimmed query. Empty means "show all".
pub(crate) fn normalize_query(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// Incremental text filter over a fixed [`BookmarkIndex`].
///
/// Raw keystrokes go through a 300 ms trailing debounce; only the last
/// value in a burst produces a filter pass.
pub(crate) struct SearchFilterEngine {
    index: Arc<BookmarkIndex>,
    query: String,
    debounce: Debouncer<String>,
    view: FilterView,
    passes: u64,
}

impl SearchFilterEngine {
    pub fn new(index: Arc<BookmarkIndex>, debounce_ms: i32) -> Self {
        let view = FilterView::all_visible(&index);
        Self {
            index,
            query: String::new(),
            debounce: Debouncer::new(i64::from(debounce_ms)),
            view,
            passes: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> &FilterView {
        &self.view
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn debounce_ms(&self) -> i64 {
        self.debounce.delay_ms()
    }

    /// Schedule `raw` for filtering. Returns the generation the caller's
    /// timer must hand back to [`Self::fire`].
    pub fn on_query_changed(&mut self, raw: &str) -> u64 {
        self.debounce.push(raw.to_string())
    }

    /// Timer callback. Runs a pass only for the latest scheduled query.
    ///
    /// Returns the indices of categories auto-expanded by the pass.
    pub fn fire<S: KvStore>(
        &mut self,
        generation: u64,
        collapse: &mut CollapseStateStore<S>,
    ) -> Option<Vec<usize>> {
        let raw = self.debounce.take(generation)?;
        Some(self.apply(&raw, collapse))
    }

    /// Explicit clear (Escape). Drops any pending keystrokes and filters
    /// with the empty query right away.
    pub fn clear<S: KvStore>(&mut self, collapse: &mut CollapseStateStore<S>) -> Vec<usize> {
        self.debounce.cancel();
        self.apply("", collapse)
    }

    /// One filter pass. Collapsed categories with a matching link are
    /// expanded through `collapse`; their indices are returned.
    pub fn apply<S: KvStore>(
        &mut self,
        raw: &str,
        collapse: &mut CollapseStateStore<S>,
    ) -> Vec<usize> {
        let query = normalize_query(raw);
        let mut expanded = vec![];
        let mut categories = Vec::with_capacity(self.index.categories().len());

        for (i, category) in self.index.categories().iter().enumerate() {
            let links: Vec<bool> = category
                .links
                .iter()
                .map(|l| {
                    l.title.to_lowercase().contains(&query)
                        || l.url.to_lowercase().contains(&query)
                })
                .collect();

            let any_link = links.iter().any(|m| *m);
            let title_match = category.title.to_lowercase().contains(&query);

            if !query.is_empty() && any_link && collapse.is_collapsed(&category.title) {
                collapse.set_collapsed(&category.title, false);
                log::debug!("expanded {:?} for query {query:?}", category.title);
                expanded.push(i);
            }

            categories.push(CategoryVisibility {
                visible: query.is_empty() || title_match || any_link,
                links,
            });
        }

        // The empty query always restores the full pre-search view.
        self.view = if query.is_empty() {
            FilterView::all_visible(&self.index)
        } else {
            FilterView { categories }
        };
        self.query = query;
        self.passes += 1;

        log::debug!(
            "filter pass {} for {:?}: {} links visible",
            self.passes,
            self.query,
            self.view.visible_link_count()
        );
        expanded
    }
}
