use crate::recent::DEFAULT_RECENT_LIMIT;
use crate::search::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};

const ENV_GLOBAL: &str = "BOOKMARKS_ENV";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub debounce_ms: i32,
    pub recent_limit: usize,
    /// `None` disables service-worker registration.
    pub service_worker_url: Option<String>,
    /// Container holding the category cards; re-rendered after indexing.
    pub mount_selector: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            recent_limit: DEFAULT_RECENT_LIMIT,
            service_worker_url: Some("/sw.js".to_string()),
            mount_selector: ".bookmarks".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `window.BOOKMARKS_ENV`, if the page sets one.
    ///
    /// Both `DEBOUNCE_MS` and `debounce_ms` spellings are accepted.
    pub fn from_window() -> Self {
        let mut cfg = Self::default();

        let Some(env) = web_sys::window().and_then(|w| w.get(ENV_GLOBAL)) else {
            return cfg;
        };
        if env.is_undefined() || !env.is_object() {
            return cfg;
        }

        let lookup = |name: &str| -> Option<wasm_bindgen::JsValue> {
            [name.to_uppercase(), name.to_string()]
                .iter()
                .filter_map(|k| js_sys::Reflect::get(&env, &k.as_str().into()).ok())
                .find(|v| !v.is_undefined() && !v.is_null())
        };

        if let Some(ms) = lookup("debounce_ms").and_then(|v| v.as_f64()) {
            cfg.debounce_ms = ms.max(0.0) as i32;
        }
        if let Some(n) = lookup("recent_limit").and_then(|v| v.as_f64()) {
            cfg.recent_limit = (n.max(1.0)) as usize;
        }
        if let Some(url) = lookup("service_worker_url").and_then(|v| v.as_string()) {
            cfg.apply_service_worker_url(url);
        }
        if let Some(sel) = lookup("mount_selector").and_then(|v| v.as_string()) {
            cfg.mount_selector = sel;
        }

        cfg
    }

    fn apply_service_worker_url(&mut self, url: String) {
        self.service_worker_url = if url.trim().is_empty() { None } else { Some(url) };
    }
}
