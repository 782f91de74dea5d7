use serde::{Deserialize, Serialize};

pub(crate) const THEME_KEY: &str = "theme";
pub(crate) const COLLAPSE_STATES_KEY: &str = "collapseStates";
pub(crate) const RECENTLY_USED_KEY: &str = "recentlyUsed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StoreErrorKind {
    /// No window or `localStorage` is disabled.
    Unavailable,
    /// The storage rejected the write (quota exceeded, private mode).
    Write,
    /// Stored value exists but is not the JSON we expect.
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    fn unavailable() -> Self {
        Self {
            kind: StoreErrorKind::Unavailable,
            message: "localStorage is unavailable".to_string(),
        }
    }

    fn write(key: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            kind: StoreErrorKind::Write,
            message: format!("write to {key} failed: {detail}"),
        }
    }

    fn malformed(key: &str, e: serde_json::Error) -> Self {
        Self {
            kind: StoreErrorKind::Malformed,
            message: format!("{key} holds malformed JSON: {e}"),
        }
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Origin-scoped string key-value storage.
///
/// `get` on a missing key is `Ok(None)`, never an error.
pub(crate) trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStore;

impl LocalStore {
    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(StoreError::unavailable)
    }
}

impl KvStore for LocalStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let storage = Self::storage()?;
        storage
            .get_item(key)
            .map_err(|_| StoreError::unavailable())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let storage = Self::storage()?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::write(key, format!("{e:?}")))
    }
}

/// Read and parse a JSON value. Absence is `Ok(None)`.
pub(crate) fn load_json<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: for<'de> Deserialize<'de>,
    S: KvStore + ?Sized,
{
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| StoreError::malformed(key, e))
}

/// Like [`load_json`] but every failure degrades to `T::default()`.
pub(crate) fn load_json_or_default<T, S>(store: &S, key: &str) -> T
where
    T: for<'de> Deserialize<'de> + Default,
    S: KvStore + ?Sized,
{
    match load_json(store, key) {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => {
            log::warn!("ignoring stored {key}: {e}");
            T::default()
        }
    }
}

pub(crate) fn save_json<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| StoreError::write(key, e))?;
    store.set(key, &json)
}

pub(crate) fn upsert_lru_by_key<T: Clone>(
    mut items: Vec<T>,
    item: T,
    same_key: impl Fn(&T, &T) -> bool,
    max: usize,
) -> Vec<T> {
    items.retain(|x| !same_key(x, &item));
    items.insert(0, item);
    if items.len() > max {
        items.truncate(max);
    }
    items
}

/// Write-through flag shared by every persisted component.
///
/// The first failed write flips the owner into in-memory-only mode for the
/// rest of the session.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WriteThrough {
    in_memory_only: bool,
}

impl WriteThrough {
    pub fn is_in_memory_only(&self) -> bool {
        self.in_memory_only
    }

    pub fn flush<T, S>(&mut self, store: &S, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
        S: KvStore + ?Sized,
    {
        if self.in_memory_only {
            return;
        }
        if let Err(e) = save_json(store, key, value) {
            log::warn!("{e}; keeping {key} in memory for this session");
            self.in_memory_only = true;
        }
    }

    pub fn flush_raw<S>(&mut self, store: &S, key: &str, value: &str)
    where
        S: KvStore + ?Sized,
    {
        if self.in_memory_only {
            return;
        }
        if let Err(e) = store.set(key, value) {
            log::warn!("{e}; keeping {key} in memory for this session");
            self.in_memory_only = true;
        }
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
