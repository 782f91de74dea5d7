use crate::models::Theme;
use crate::storage::{KvStore, WriteThrough, THEME_KEY};
use std::str::FromStr;

pub(crate) struct ThemeStore<S: KvStore> {
    store: S,
    theme: Theme,
    write: WriteThrough,
}

impl<S: KvStore> ThemeStore<S> {
    /// A stored preference wins over the system one. The resolved theme is
    /// written back, so the choice sticks even if the system setting changes.
    pub fn load(store: S, prefers_dark: bool) -> Self {
        let system = if prefers_dark { Theme::Dark } else { Theme::Light };
        let theme = match store.get(THEME_KEY) {
            Ok(Some(raw)) => Theme::from_str(&raw).unwrap_or_else(|_| {
                log::warn!("unknown stored theme {raw:?}");
                system
            }),
            Ok(None) => system,
            Err(e) => {
                log::warn!("{e}");
                system
            }
        };
        let mut this = Self {
            store,
            theme,
            write: WriteThrough::default(),
        };
        this.set(theme);
        this
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        self.write.flush_raw(&self.store, THEME_KEY, theme.as_ref());
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.other());
        self.theme
    }
}

/// Tooltip for the theme toggle button.
pub(crate) fn toggle_title(current: Theme) -> String {
    format!("Switch to {} mode", current.other())
}

pub(crate) fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}

pub(crate) fn apply_to_document(theme: Theme) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        let _ = root.set_attribute("data-theme", theme.as_ref());
    }
}
