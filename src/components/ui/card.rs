use leptos::prelude::*;
use leptos_ui::clx;

// Class names double as the selectors the page stylesheet and the index
// scan rely on (`category-title` in particular).
mod components {
    use super::*;
    clx! {Toolbar, div, "bookmarks-toolbar flex items-center gap-2 py-4"}
    clx! {CategoryHeader, div, "category-header flex items-center justify-between gap-2"}
    clx! {CategoryTitle, h2, "category-title leading-none font-semibold"}
    clx! {RecentPanel, aside, "recently-used flex flex-col gap-2 rounded-xl border p-4"}
    clx! {RecentHeading, h3, "text-sm font-medium text-muted-foreground"}
}

pub use components::*;
