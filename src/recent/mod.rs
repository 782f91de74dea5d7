use crate::models::{BookmarkLink, RecentEntry};
use crate::storage::{
    load_json_or_default, upsert_lru_by_key, KvStore, WriteThrough, RECENTLY_USED_KEY,
};

pub(crate) const DEFAULT_RECENT_LIMIT: usize = 10;

/// Most-recent-first click history, unique by URL and bounded by `limit`.
pub(crate) struct RecentlyUsedTracker<S: KvStore> {
    store: S,
    limit: usize,
    entries: Vec<RecentEntry>,
    write: WriteThrough,
}

impl<S: KvStore> RecentlyUsedTracker<S> {
    pub fn load(store: S, limit: usize) -> Self {
        let entries: Vec<RecentEntry> = load_json_or_default(&store, RECENTLY_USED_KEY);
        Self {
            store,
            limit,
            entries,
            write: WriteThrough::default(),
        }
    }

    pub fn record(&mut self, link: &BookmarkLink, now_ms: i64) {
        let entry = RecentEntry {
            title: link.title.trim().to_string(),
            url: link.url.clone(),
            timestamp: now_ms,
        };

        let entries = std::mem::take(&mut self.entries);
        self.entries = upsert_lru_by_key(entries, entry, |a, b| a.url == b.url, self.limit);
        self.write
            .flush(&self.store, RECENTLY_USED_KEY, &self.entries);
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn link(n: usize) -> BookmarkLink {
        BookmarkLink::new(format!("Site {n}"), format!("https://site{n}.example/"))
    }

    fn urls(t: &RecentlyUsedTracker<MemoryStore>) -> Vec<String> {
        t.entries().iter().map(|e| e.url.clone()).collect()
    }

    #[test]
    fn test_eleven_distinct_links_keep_newest_ten() {
        let mem = MemoryStore::default();
        let mut tracker = RecentlyUsedTracker::load(mem.clone(), DEFAULT_RECENT_LIMIT);

        for n in 0..11 {
            tracker.record(&link(n), 1_000 + n as i64);
        }

        let got = urls(&tracker);
        assert_eq!(got.len(), 10);
        assert_eq!(got[0], "https://site10.example/");
        assert_eq!(got[9], "https://site1.example/");
        assert!(!got.contains(&"https://site0.example/".to_string()));

        let stored: Vec<RecentEntry> =
            serde_json::from_str(&mem.raw(RECENTLY_USED_KEY).expect("persisted")).expect("json");
        assert_eq!(stored, tracker.entries());
    }

    #[test]
    fn test_duplicate_moves_to_front_without_growing() {
        let mut tracker = RecentlyUsedTracker::load(MemoryStore::default(), DEFAULT_RECENT_LIMIT);
        tracker.record(&link(1), 1);
        tracker.record(&link(2), 2);
        tracker.record(&link(3), 3);

        tracker.record(&link(1), 4);

        assert_eq!(
            urls(&tracker),
            vec![
                "https://site1.example/",
                "https://site3.example/",
                "https://site2.example/"
            ]
        );
        assert_eq!(tracker.entries()[0].timestamp, 4);
    }

    #[test]
    fn test_url_identity_is_case_sensitive() {
        let mut tracker = RecentlyUsedTracker::load(MemoryStore::default(), DEFAULT_RECENT_LIMIT);
        tracker.record(&BookmarkLink::new("a", "https://x.example/Path"), 1);
        tracker.record(&BookmarkLink::new("a", "https://x.example/path"), 2);
        assert_eq!(tracker.entries().len(), 2);
    }

    #[test]
    fn test_title_is_trimmed() {
        let mut tracker = RecentlyUsedTracker::load(MemoryStore::default(), DEFAULT_RECENT_LIMIT);
        tracker.record(&BookmarkLink::new("  Rust \n", "https://www.rust-lang.org/"), 1);
        assert_eq!(tracker.entries()[0].title, "Rust");
    }

    #[test]
    fn test_load_existing_and_malformed() {
        let mem = MemoryStore::with(
            RECENTLY_USED_KEY,
            r#"[{"title":"Docs","url":"https://docs.rs/","timestamp":5}]"#,
        );
        let tracker = RecentlyUsedTracker::load(mem, DEFAULT_RECENT_LIMIT);
        assert_eq!(tracker.entries().len(), 1);

        let broken = MemoryStore::with(RECENTLY_USED_KEY, "{oops");
        let tracker = RecentlyUsedTracker::load(broken, DEFAULT_RECENT_LIMIT);
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_read_failure_starts_empty_and_keeps_tracking() {
        let mem = MemoryStore::with(
            RECENTLY_USED_KEY,
            r#"[{"title":"Docs","url":"https://docs.rs/","timestamp":5}]"#,
        );
        mem.fail_reads(true);
        let mut tracker = RecentlyUsedTracker::load(mem, DEFAULT_RECENT_LIMIT);
        assert!(tracker.entries().is_empty());

        tracker.record(&link(1), 1);
        assert_eq!(urls(&tracker), vec!["https://site1.example/"]);
    }

    #[test]
    fn test_write_failure_still_tracks_in_memory() {
        let mem = MemoryStore::default();
        mem.fail_writes(true);
        let mut tracker = RecentlyUsedTracker::load(mem.clone(), DEFAULT_RECENT_LIMIT);

        tracker.record(&link(1), 1);
        tracker.record(&link(2), 2);

        assert_eq!(tracker.entries().len(), 2);
        assert!(mem.raw(RECENTLY_USED_KEY).is_none());
    }
}
