use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, CategoryHeader, CategoryTitle, RecentHeading, RecentPanel,
    Toolbar,
};
use crate::config::AppConfig;
use crate::export::{download, ExportFormat};
use crate::index::BookmarkIndex;
use crate::models::{BookmarkCategory, Theme};
use crate::shortcuts::{action_for, ShortcutAction};
use crate::state::{AppContext, Session};
use crate::storage::LocalStore;
use crate::theme::{apply_to_document, system_prefers_dark, toggle_title};
use crate::util::{now_ms, register_service_worker};
use icons::{Download, Moon, Sun};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Index the server-rendered cards, then take over the container.
pub(crate) fn mount() {
    let config = AppConfig::from_window();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document; nothing to mount");
        return;
    };

    let container = document
        .query_selector(&config.mount_selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());

    let index = match &container {
        Some(el) => BookmarkIndex::scan(el),
        None => {
            log::warn!("{} not found; indexing the whole document", config.mount_selector);
            document
                .document_element()
                .map(|root| BookmarkIndex::scan(&root))
                .unwrap_or_default()
        }
    };

    let session = Session::new(index, LocalStore, &config, system_prefers_dark());

    if let Some(url) = &config.service_worker_url {
        register_service_worker(url);
    }

    let app = move || {
        provide_context(AppContext(RwSignal::new(session)));
        view! { <App /> }
    };

    match container {
        Some(el) => {
            el.set_inner_html("");
            leptos::mount::mount_to(el, app).forget();
        }
        None => mount_to_body(app),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let session = expect_context::<AppContext>().0;

    let search_ref: NodeRef<html::Input> = NodeRef::new();
    // Pending debounce timer handle.
    let search_timer_id: RwSignal<Option<i32>> = RwSignal::new(None);

    Effect::new(move |_| apply_to_document(session.with(|s| s.theme())));

    let cancel_search_timer = move || {
        if let (Some(win), Some(tid)) = (web_sys::window(), search_timer_id.get_untracked()) {
            let _ = win.clear_timeout_with_handle(tid);
        }
        search_timer_id.set(None);
    };

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let Some((generation, delay)) = session
            .try_update_untracked(|s| (s.on_query_changed(&value), s.debounce_ms()))
        else {
            return;
        };

        cancel_search_timer();
        let Some(win) = web_sys::window() else {
            return;
        };
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            search_timer_id.set(None);
            session.update(|s| {
                s.fire_search(generation);
            });
        });
        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay as i32,
            )
            .unwrap_or(0);
        search_timer_id.set(Some(tid));
    };

    let clear_search = move || {
        cancel_search_timer();
        if let Some(input) = search_ref.get_untracked() {
            input.set_value("");
        }
        session.update(|s| s.clear_search());
    };

    let toggle_theme = move || {
        session.update(|s| {
            let theme = s.toggle_theme();
            log::debug!("theme -> {theme}");
        });
    };

    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let in_search = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.matches(".search-input").unwrap_or(false))
            .unwrap_or(false);

        let Some(action) = action_for(&ev.key(), ev.ctrl_key() || ev.meta_key(), in_search)
        else {
            return;
        };
        ev.prevent_default();

        match action {
            ShortcutAction::FocusSearch => {
                if let Some(input) = search_ref.get_untracked() {
                    let _ = input.focus();
                    input.select();
                }
            }
            ShortcutAction::ToggleTheme => toggle_theme(),
            ShortcutAction::ClearSearch => clear_search(),
        }
    });

    let export = move |format: ExportFormat| {
        let artifact = session.with_untracked(|s| s.export(format));
        if let Err(e) = download(&artifact) {
            log::warn!("{} download failed: {e}", artifact.filename);
        }
    };

    let theme = move || session.with(|s| s.theme());
    let categories: Vec<BookmarkCategory> =
        session.with_untracked(|s| s.index().categories().to_vec());

    view! {
        <div class="bookmarks-app">
            <Toolbar>
                <input
                    class="search-input"
                    type="search"
                    placeholder="Search bookmarks (Ctrl+K)"
                    autocomplete="off"
                    node_ref=search_ref
                    on:input=on_input
                />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="theme-toggle"
                    attr:title=move || toggle_title(theme())
                    on:click=move |_| toggle_theme()
                >
                    {move || match theme() {
                        Theme::Light => view! { <Moon /> }.into_any(),
                        Theme::Dark => view! { <Sun /> }.into_any(),
                    }}
                </Button>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| export(ExportFormat::Json)
                >
                    <Download />
                    "Export JSON"
                </Button>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| export(ExportFormat::Csv)
                >
                    <Download />
                    "Export CSV"
                </Button>
            </Toolbar>

            <RecentlyUsed />

            <div class="category-grid">
                {categories
                    .into_iter()
                    .enumerate()
                    .map(|(ci, category)| view! { <CategoryCard ci=ci category=category /> })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn CategoryCard(ci: usize, category: BookmarkCategory) -> impl IntoView {
    let session = expect_context::<AppContext>().0;

    let hidden = move || !session.with(|s| s.view().is_category_visible(ci));
    let collapsed = move || session.with(|s| s.is_collapsed_at(ci));

    let links = category
        .links
        .into_iter()
        .enumerate()
        .map(|(li, link)| {
            let link_hidden = move || !session.with(|s| s.view().is_link_visible(ci, li));
            view! {
                <li>
                    <a
                        class="bookmark-link"
                        class:hidden=link_hidden
                        href=link.url
                        target="_blank"
                        rel="noopener noreferrer"
                        on:click=move |_| session.update(|s| s.record_click(ci, li, now_ms()))
                    >
                        {link.title}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <section
            class="category-card fade-in"
            class:hidden=hidden
            style=format!("animation-delay: {:.1}s", ci as f64 * 0.1)
        >
            <CategoryHeader>
                <CategoryTitle>{category.title}</CategoryTitle>
                <button
                    class="collapse-btn"
                    on:click=move |_| {
                        session.update(|s| {
                            s.toggle_category(ci);
                        })
                    }
                >
                    {move || if collapsed() { "+" } else { "−" }}
                </button>
            </CategoryHeader>
            <ul class="bookmark-list" class:collapsed=collapsed>
                {links}
            </ul>
        </section>
    }
}

#[component]
fn RecentlyUsed() -> impl IntoView {
    let session = expect_context::<AppContext>().0;
    let entries = move || session.with(|s| s.recent().to_vec());

    view! {
        <Show when=move || !entries().is_empty() fallback=|| ().into_view()>
            <RecentPanel>
                <RecentHeading>"Recently used"</RecentHeading>
                <ul class="recent-list">
                    {move || {
                        entries()
                            .into_iter()
                            .map(|e| {
                                view! {
                                    <li>
                                        <a class="recent-link" href=e.url.clone() title=e.url>
                                            {e.title}
                                        </a>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </RecentPanel>
        </Show>
    }
}

