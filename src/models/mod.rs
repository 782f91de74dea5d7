use serde::{Deserialize, Serialize};

/// A single bookmark. Identity is the exact `url` string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BookmarkLink {
    pub title: String,
    pub url: String,
}

impl BookmarkLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A named group of links.
///
/// `title` doubles as the collapse-state key, so two categories with the
/// same title share one collapse entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BookmarkCategory {
    pub title: String,
    pub links: Vec<BookmarkLink>,
}

impl BookmarkCategory {
    pub fn new(title: impl Into<String>, links: Vec<BookmarkLink>) -> Self {
        Self {
            title: title.into(),
            links,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecentEntry {
    pub title: String,
    pub url: String,
    /// Epoch millis at the time of the click.
    pub timestamp: i64,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn other(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
