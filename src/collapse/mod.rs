use crate::storage::{load_json_or_default, KvStore, WriteThrough, COLLAPSE_STATES_KEY};
use serde_json::{Map, Value};

/// Per-category collapse flags keyed by category title.
///
/// Entries appear lazily on the first toggle; a missing entry means
/// expanded. Entries for titles no longer on the page are kept as-is.
/// Keys keep first-insertion order when written back.
pub(crate) struct CollapseStateStore<S: KvStore> {
    store: S,
    states: Map<String, Value>,
    write: WriteThrough,
}

impl<S: KvStore> CollapseStateStore<S> {
    pub fn load(store: S) -> Self {
        let states: Map<String, Value> = load_json_or_default(&store, COLLAPSE_STATES_KEY);
        Self {
            store,
            states,
            write: WriteThrough::default(),
        }
    }

    pub fn is_collapsed(&self, title: &str) -> bool {
        self.states.get(title).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn toggle(&mut self, title: &str) -> bool {
        let next = !self.is_collapsed(title);
        self.states.insert(title.to_string(), Value::Bool(next));
        self.flush();
        next
    }

    pub fn set_collapsed(&mut self, title: &str, collapsed: bool) {
        self.states.insert(title.to_string(), Value::Bool(collapsed));
        self.flush();
    }

    /// Initial collapsed flags for `titles`, position-aligned.
    ///
    /// Lookup is by exact title. Persisted titles with no matching category
    /// are skipped.
    pub fn restore_all(&self, titles: &[&str]) -> Vec<bool> {
        for (stored, collapsed) in &self.states {
            let on_page = titles.iter().any(|t| *t == stored.as_str());
            if collapsed.as_bool() == Some(true) && !on_page {
                log::debug!("no category titled {stored:?}; collapse entry ignored");
            }
        }

        titles.iter().map(|t| self.is_collapsed(t)).collect()
    }

    #[allow(dead_code)]
    pub fn is_in_memory_only(&self) -> bool {
        self.write.is_in_memory_only()
    }

    fn flush(&mut self) {
        self.write.flush(&self.store, COLLAPSE_STATES_KEY, &self.states);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_default_is_expanded() {
        let store = CollapseStateStore::load(MemoryStore::default());
        assert!(!store.is_collapsed("Dev"));
    }

    #[test]
    fn test_toggle_twice_restores_and_persists_original() {
        let mem = MemoryStore::default();
        let mut store = CollapseStateStore::load(mem.clone());

        assert!(store.toggle("Dev"));
        assert_eq!(mem.raw(COLLAPSE_STATES_KEY).as_deref(), Some(r#"{"Dev":true}"#));

        assert!(!store.toggle("Dev"));
        assert!(!store.is_collapsed("Dev"));
        assert_eq!(mem.raw(COLLAPSE_STATES_KEY).as_deref(), Some(r#"{"Dev":false}"#));
    }

    #[test]
    fn test_state_survives_reload() {
        let mem = MemoryStore::default();
        let mut first = CollapseStateStore::load(mem.clone());
        first.set_collapsed("News", true);

        let second = CollapseStateStore::load(mem);
        assert!(second.is_collapsed("News"));
    }

    #[test]
    fn test_restore_all_ignores_stale_titles() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, r#"{"Gone":true,"Dev":true,"News":false}"#);
        let store = CollapseStateStore::load(mem.clone());

        assert_eq!(store.restore_all(&["Dev", "News", "Tools"]), vec![true, false, false]);
        // Stale entries are never purged.
        assert!(mem
            .raw(COLLAPSE_STATES_KEY)
            .is_some_and(|raw| raw.contains("Gone")));
    }

    #[test]
    fn test_persisted_keys_follow_insertion_order() {
        let mem = MemoryStore::default();
        let mut store = CollapseStateStore::load(mem.clone());
        store.toggle("Zeta");
        store.toggle("Alpha");
        store.toggle("Zeta");
        assert_eq!(
            mem.raw(COLLAPSE_STATES_KEY).as_deref(),
            Some(r#"{"Zeta":false,"Alpha":true}"#)
        );

        // Reloaded maps keep their stored order.
        let mut reloaded = CollapseStateStore::load(mem.clone());
        reloaded.toggle("Mid");
        assert_eq!(
            mem.raw(COLLAPSE_STATES_KEY).as_deref(),
            Some(r#"{"Zeta":false,"Alpha":true,"Mid":true}"#)
        );
    }

    #[test]
    fn test_restore_all_requires_exact_title() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, r#"{"Dev":true}"#);
        let store = CollapseStateStore::load(mem);
        assert_eq!(store.restore_all(&["dev", " Dev"]), vec![false, false]);
    }

    #[test]
    fn test_duplicate_titles_share_one_entry() {
        let mut store = CollapseStateStore::load(MemoryStore::default());
        store.toggle("Dup");
        assert_eq!(store.restore_all(&["Dup", "Dup"]), vec![true, true]);
    }

    #[test]
    fn test_malformed_persisted_map_loads_empty() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, "[true");
        let store = CollapseStateStore::load(mem);
        assert!(!store.is_collapsed("Dev"));
    }

    #[test]
    fn test_read_failure_loads_everything_expanded() {
        let mem = MemoryStore::with(COLLAPSE_STATES_KEY, r#"{"Dev":true}"#);
        mem.fail_reads(true);
        let mut store = CollapseStateStore::load(mem.clone());
        assert_eq!(store.restore_all(&["Dev"]), vec![false]);

        // Writes still go through.
        assert!(store.toggle("Dev"));
        assert_eq!(mem.raw(COLLAPSE_STATES_KEY).as_deref(), Some(r#"{"Dev":true}"#));
    }

    #[test]
    fn test_write_failure_keeps_state_in_memory() {
        let mem = MemoryStore::default();
        mem.fail_writes(true);
        let mut store = CollapseStateStore::load(mem.clone());

        assert!(store.toggle("Dev"));
        assert!(store.is_collapsed("Dev"));
        assert!(store.is_in_memory_only());
        assert!(mem.raw(COLLAPSE_STATES_KEY).is_none());
    }
}
