use crate::collapse::CollapseStateStore;
use crate::config::AppConfig;
use crate::export::{ExportArtifact, ExportEngine, ExportFormat};
use crate::index::BookmarkIndex;
use crate::models::{RecentEntry, Theme};
use crate::recent::RecentlyUsedTracker;
use crate::search::{FilterView, SearchFilterEngine};
use crate::storage::KvStore;
use crate::theme::ThemeStore;
use leptos::prelude::*;
use std::sync::Arc;

/// Everything stateful on the page, owned in one place.
///
/// UI handlers, keyboard shortcuts and timers all go through these
/// methods; nothing else mutates the components.
pub(crate) struct Session<S: KvStore + Clone> {
    index: Arc<BookmarkIndex>,
    search: SearchFilterEngine,
    collapse: CollapseStateStore<S>,
    /// Rendered collapse flag per category, position-aligned with the index.
    collapsed: Vec<bool>,
    recent: RecentlyUsedTracker<S>,
    theme: ThemeStore<S>,
}

impl<S: KvStore + Clone> Session<S> {
    pub fn new(index: BookmarkIndex, store: S, config: &AppConfig, prefers_dark: bool) -> Self {
        let index = Arc::new(index);
        let collapse = CollapseStateStore::load(store.clone());
        let collapsed = collapse.restore_all(&index.titles());

        Self {
            search: SearchFilterEngine::new(index.clone(), config.debounce_ms),
            recent: RecentlyUsedTracker::load(store.clone(), config.recent_limit),
            theme: ThemeStore::load(store, prefers_dark),
            index,
            collapse,
            collapsed,
        }
    }

    pub fn index(&self) -> &BookmarkIndex {
        &self.index
    }

    pub fn view(&self) -> &FilterView {
        self.search.view()
    }

    #[allow(dead_code)]
    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn debounce_ms(&self) -> i64 {
        self.search.debounce_ms()
    }

    pub fn is_collapsed_at(&self, category: usize) -> bool {
        self.collapsed.get(category).copied().unwrap_or(false)
    }

    pub fn recent(&self) -> &[RecentEntry] {
        self.recent.entries()
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn on_query_changed(&mut self, raw: &str) -> u64 {
        self.search.on_query_changed(raw)
    }

    /// Debounce timer callback. `true` if a filter pass ran.
    pub fn fire_search(&mut self, generation: u64) -> bool {
        match self.search.fire(generation, &mut self.collapse) {
            Some(expanded) => {
                self.mark_expanded(&expanded);
                true
            }
            None => false,
        }
    }

    pub fn clear_search(&mut self) {
        let expanded = self.search.clear(&mut self.collapse);
        self.mark_expanded(&expanded);
    }

    /// User click on a category's collapse button.
    pub fn toggle_category(&mut self, category: usize) -> Option<bool> {
        let title = self.index.categories().get(category)?.title.clone();
        let collapsed = self.collapse.toggle(&title);
        self.set_rendered(&title, collapsed);
        Some(collapsed)
    }

    pub fn record_click(&mut self, category: usize, link: usize, now_ms: i64) {
        let Some(link) = self.index.link(category, link) else {
            return;
        };
        self.recent.record(link, now_ms);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    pub fn export(&self, format: ExportFormat) -> ExportArtifact {
        ExportEngine::export(&self.index, format)
    }

    fn mark_expanded(&mut self, expanded: &[usize]) {
        for &i in expanded {
            if let Some(title) = self.index.categories().get(i).map(|c| c.title.clone()) {
                self.set_rendered(&title, false);
            }
        }
    }

    // Categories sharing a title share one collapse entry.
    fn set_rendered(&mut self, title: &str, collapsed: bool) {
        for (flag, category) in self.collapsed.iter_mut().zip(self.index.categories()) {
            if category.title == title {
                *flag = collapsed;
            }
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub RwSignal<Session<crate::storage::LocalStore>>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookmarkCategory, BookmarkLink};
    use crate::storage::{MemoryStore, COLLAPSE_STATES_KEY, RECENTLY_USED_KEY, THEME_KEY};

    fn index() -> BookmarkIndex {
        BookmarkIndex::from_categories(vec![
            BookmarkCategory::new(
                "Dev",
                vec![
                    BookmarkLink::new("Rust", "https://www.rust-lang.org/"),
                    BookmarkLink::new("Crates", "https://crates.io/"),
                ],
            ),
            BookmarkCategory::new("News", vec![BookmarkLink::new("LWN", "https://lwn.net/")]),
            BookmarkCategory::new("Dev", vec![BookmarkLink::new("Docs", "https://docs.rs/")]),
        ])
    }

    fn session(mem: &MemoryStore) -> Session<MemoryStore> {
        Session::new(index(), mem.clone(), &AppConfig::default(), false)
    }

    #[test]
    fn test_restores_persisted_collapse_on_load() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, r#"{"News":true,"Old":true}"#);
        let s = session(&mem);
        assert!(!s.is_collapsed_at(0));
        assert!(s.is_collapsed_at(1));
    }

    #[test]
    fn test_toggle_survives_reload() {
        let mem = MemoryStore::default();
        let mut s = session(&mem);
        assert_eq!(s.toggle_category(1), Some(true));
        assert_eq!(s.toggle_category(9), None);

        let reloaded = session(&mem);
        assert!(reloaded.is_collapsed_at(1));
    }

    #[test]
    fn test_same_titled_categories_move_together() {
        let mem = MemoryStore::default();
        let mut s = session(&mem);
        s.toggle_category(2);
        assert!(s.is_collapsed_at(0));
        assert!(s.is_collapsed_at(2));
    }

    #[test]
    fn test_search_expands_collapsed_match_and_clear_keeps_it() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, r#"{"News":true}"#);
        let mut s = session(&mem);

        let g = s.on_query_changed("LWN");
        assert!(s.fire_search(g));
        assert!(!s.is_collapsed_at(1));
        assert!(!s.view().is_category_visible(0));
        assert_eq!(mem.raw(COLLAPSE_STATES_KEY).as_deref(), Some(r#"{"News":false}"#));

        s.clear_search();
        assert_eq!(s.view().visible_link_count(), 4);
        assert!(!s.is_collapsed_at(1));
    }

    #[test]
    fn test_only_last_keystroke_timer_filters() {
        let mem = MemoryStore::default();
        let mut s = session(&mem);
        let first = s.on_query_changed("r");
        let last = s.on_query_changed("rust");
        assert!(!s.fire_search(first));
        assert!(s.fire_search(last));
        assert_eq!(s.query(), "rust");
    }

    #[test]
    fn test_click_records_recent() {
        let mem = MemoryStore::default();
        let mut s = session(&mem);
        s.record_click(0, 1, 42);
        s.record_click(7, 0, 43);

        assert_eq!(s.recent().len(), 1);
        assert_eq!(s.recent()[0].url, "https://crates.io/");
        assert!(mem.raw(RECENTLY_USED_KEY).is_some());
    }

    #[test]
    fn test_theme_and_export_share_session() {
        let mem = MemoryStore::default();
        let mut s = session(&mem);
        assert_eq!(s.toggle_theme(), Theme::Dark);
        assert_eq!(mem.raw(THEME_KEY).as_deref(), Some("dark"));

        let csv = s.export(ExportFormat::Csv);
        // Duplicate "Dev" collapses into one mapping entry.
        assert_eq!(String::from_utf8_lossy(&csv.bytes).lines().count(), 3);
    }

    #[test]
    fn test_storage_failure_degrades_every_writer() {
        let mem = MemoryStore::default();
        mem.fail_writes(true);
        let mut s = session(&mem);

        s.toggle_category(0);
        s.record_click(0, 0, 1);
        s.toggle_theme();

        assert!(s.is_collapsed_at(0));
        assert_eq!(s.recent().len(), 1);
        assert_eq!(s.theme(), Theme::Dark);
        assert!(mem.raw(COLLAPSE_STATES_KEY).is_none());
    }
}
