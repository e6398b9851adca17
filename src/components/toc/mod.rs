mod anchors;
mod page_item;
mod search;

pub use anchors::Anchors;
pub use page_item::PageItem;
pub use search::{Search, SEARCH_DEBOUNCE_MS};

use crate::cache::AnchorLoader;
use crate::components::ui::{ErrorMessage, Placeholder};
use crate::hierarchy::filter_by_substring;
use crate::models::{AnchorId, PageId, PagesMap};
use crate::state::{PendingSelection, TocStore};
use leptos::prelude::*;
use page_item::page_group;
use tw_merge::tw_merge;

/// Indentation levels of the shimmer rows shown while the tree loads.
const PLACEHOLDER_LEVELS: [u32; 10] = [0, 1, 1, 1, 2, 2, 2, 2, 0, 0];

/// Which of the three views the widget shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TocStatus {
    Loading,
    Error,
    Ready,
}

impl TocStatus {
    /// Loading wins over error; there is no partially loaded view.
    pub fn from_flags(is_loading: bool, is_error: bool) -> Self {
        if is_loading {
            TocStatus::Loading
        } else if is_error {
            TocStatus::Error
        } else {
            TocStatus::Ready
        }
    }
}

/// Table of contents tree.
///
/// Each instance owns its own selection/expansion store. Anchor lists come from an
/// [`AnchorLoader`] found in context, or one built from [`crate::api::EnvConfig`].
#[component]
pub fn Toc(
    /// The page data is still being fetched.
    #[prop(into)]
    is_loading: Signal<bool>,

    /// Fetching the page data failed.
    #[prop(into)]
    is_error: Signal<bool>,

    /// Show the search box above the tree.
    #[prop(optional)]
    has_search: bool,

    /// Externally controlled selection. May name a page that has not arrived yet.
    #[prop(optional, into)]
    selected_id: MaybeProp<PageId>,

    /// Every known page.
    #[prop(into)]
    pages: Signal<PagesMap>,

    /// Roots of the tree, in display order.
    #[prop(into)]
    top_level_ids: Signal<Vec<PageId>>,

    /// Fired with every settled change of the selected page.
    #[prop(optional, into)]
    on_page_select: Option<Callback<Option<PageId>>>,

    /// Fired with every settled change of the selected anchor.
    #[prop(optional, into)]
    on_anchor_select: Option<Callback<Option<AnchorId>>>,
) -> impl IntoView {
    let store = TocStore::new();
    provide_context(store);

    if use_context::<AnchorLoader>().is_none() {
        provide_context(AnchorLoader::from_env());
    }

    let query = Memo::new(move |_| store.query());

    // Visible hierarchy for the committed query; the full one when there is none.
    let visible = Memo::new(move |_| {
        let q = query.get().unwrap_or_default();
        pages.with(|p| top_level_ids.with(|t| filter_by_substring(&q, t, p)))
    });

    let pending_selection = PendingSelection::new();

    Effect::new(move |_| {
        visible.with(|v| store.show_filtered(v.pages.clone(), &v.matches));
        pending_selection.apply(store);
    });

    Effect::new(move |_| pending_selection.request(store, selected_id.get()));

    let selected_page = Memo::new(move |_| store.selected_page());
    let selected_anchor = Memo::new(move |_| store.selected_anchor());

    Effect::new(move |_| {
        let id = selected_page.get();
        if let Some(cb) = on_page_select {
            cb.run(id);
        }
    });

    Effect::new(move |_| {
        let id = selected_anchor.get();
        if let Some(cb) = on_anchor_select {
            cb.run(id);
        }
    });

    Effect::new(move |_| {
        if let Some(id) = selected_page.get() {
            scroll_into_view_if_hidden(&id);
        }
    });

    let status = Memo::new(move |_| TocStatus::from_flags(is_loading.get(), is_error.get()));
    let roots = Signal::derive(move || visible.with(|v| v.top_level_ids.clone()));
    let tree_class = tw_merge!(
        "overflow-auto scroll-smooth scroll-p-6 pb-6",
        if has_search { "" } else { "pt-6" }
    );

    view! {
        <div
            data-name="Toc"
            data-state=move || status.get().to_string()
            class="flex flex-col h-full"
        >
            {move || match status.get() {
                TocStatus::Loading => PLACEHOLDER_LEVELS
                    .iter()
                    .map(|level| view! { <Placeholder level=*level /> })
                    .collect_view()
                    .into_any(),
                TocStatus::Error => view! {
                    <ErrorMessage>"Unable to load table of contents"</ErrorMessage>
                }
                .into_any(),
                TocStatus::Ready => view! {
                    {has_search.then(|| view! { <div class="pt-6"><Search /></div> })}
                    <div class=tree_class.clone()>{page_group(roots)}</div>
                }
                .into_any(),
            }}
        </div>
    }
}

fn scroll_into_view_if_hidden(id: &str) {
    let Some(el) = document().get_element_by_id(id) else {
        return;
    };

    let rect = el.get_bounding_client_rect();
    let viewport_height = window()
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);

    if rect.top() > 0.0 && rect.bottom() <= viewport_height {
        return;
    }
    el.scroll_into_view();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_flags() {
        assert_eq!(TocStatus::from_flags(true, false), TocStatus::Loading);
        assert_eq!(TocStatus::from_flags(true, true), TocStatus::Loading);
        assert_eq!(TocStatus::from_flags(false, true), TocStatus::Error);
        assert_eq!(TocStatus::from_flags(false, false), TocStatus::Ready);
    }

    #[test]
    fn test_status_names_are_kebab_case() {
        assert_eq!(TocStatus::Loading.as_ref(), "loading");
        assert_eq!(TocStatus::Ready.to_string(), "ready");
    }

    #[test]
    fn test_placeholder_levels_shape() {
        assert_eq!(PLACEHOLDER_LEVELS.len(), 10);
        assert_eq!(PLACEHOLDER_LEVELS.iter().filter(|l| **l == 0).count(), 3);
    }
}
