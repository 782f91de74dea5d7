use crate::models::{BookmarkCategory, BookmarkLink};
use wasm_bindgen::JsCast;

pub(crate) const CARD_SELECTOR: &str = ".category-card";
pub(crate) const TITLE_SELECTOR: &str = ".category-title";
pub(crate) const LINK_SELECTOR: &str = ".bookmark-link";

/// Categories and links captured once per page load, in document order.
///
/// Read-only after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BookmarkIndex {
    categories: Vec<BookmarkCategory>,
}

impl BookmarkIndex {
    pub fn from_categories(categories: Vec<BookmarkCategory>) -> Self {
        Self { categories }
    }

    /// Scan the rendered category cards under `root`.
    ///
    /// Missing structure yields an empty index rather than an error.
    pub fn scan(root: &web_sys::Element) -> Self {
        let Ok(cards) = root.query_selector_all(CARD_SELECTOR) else {
            return Self::default();
        };

        let mut categories = Vec::with_capacity(cards.length() as usize);
        for i in 0..cards.length() {
            let Some(card) = cards.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };

            let title = card
                .query_selector(TITLE_SELECTOR)
                .ok()
                .flatten()
                .and_then(|t| t.text_content())
                .unwrap_or_default();

            categories.push(BookmarkCategory::new(title, scan_links(&card)));
        }

        log::debug!("indexed {} categories", categories.len());
        Self { categories }
    }

    pub fn categories(&self) -> &[BookmarkCategory] {
        &self.categories
    }

    pub fn titles(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.title.as_str()).collect()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn link_count(&self) -> usize {
        self.categories.iter().map(|c| c.links.len()).sum()
    }

    pub fn link(&self, category: usize, link: usize) -> Option<&BookmarkLink> {
        self.categories.get(category)?.links.get(link)
    }
}

fn scan_links(card: &web_sys::Element) -> Vec<BookmarkLink> {
    let Ok(nodes) = card.query_selector_all(LINK_SELECTOR) else {
        return vec![];
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
        .map(|el| {
            let title = el.text_content().unwrap_or_default();
            // Anchors report the resolved absolute href.
            let url = match el.dyn_ref::<web_sys::HtmlAnchorElement>() {
                Some(a) => a.href(),
                None => el.get_attribute("href").unwrap_or_default(),
            };
            BookmarkLink::new(title, url)
        })
        .collect()
}
