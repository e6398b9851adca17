use super::Anchors;
use crate::components::ui::Collapsible;
use crate::models::PageId;
use crate::state::TocStore;
use crate::util::padding_left_class;
use icons::ChevronRight;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// One row of the tree plus, when open, its anchors and child pages.
#[component]
pub fn PageItem(#[prop(into)] id: PageId) -> impl IntoView {
    let store = expect_context::<TocStore>();
    let id = StoredValue::new(id);

    let page = Memo::new(move |_| id.with_value(|id| store.page(id)));
    let is_selected = Memo::new(move |_| {
        id.with_value(|id| store.selected_page().as_deref() == Some(id.as_str()))
    });
    let is_expanded = Memo::new(move |_| id.with_value(|id| store.is_expanded(id)));

    // Clicking the selected page again folds it; any other click selects.
    let on_row_click = move |_: web_sys::MouseEvent| {
        let has_pages = page.with_untracked(|p| p.as_ref().is_some_and(|p| p.has_pages()));
        id.with_value(|id| {
            if is_selected.get_untracked() && has_pages {
                store.toggle_expanded(id);
            } else {
                store.select_page(Some(id));
            }
        });
    };

    let on_chevron_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        id.with_value(|id| store.toggle_expanded(id));
    };

    move || {
        let Some(p) = page.get() else {
            return ().into_any();
        };

        let level = p.level;
        let row_class = move || {
            tw_merge!(
                "flex items-center gap-1 pr-4 py-1 text-sm cursor-pointer hover:bg-neutral-100",
                padding_left_class(level),
                if is_selected.get() { "font-semibold bg-neutral-100" } else { "" }
            )
        };
        let chevron_class = move || {
            tw_merge!(
                "inline-flex -ml-5 size-4 transition-transform",
                if is_expanded.get() { "rotate-90" } else { "" }
            )
        };

        let children = Signal::derive(move || {
            page.with(|p| {
                p.as_ref()
                    .and_then(|p| p.pages.clone())
                    .unwrap_or_default()
            })
        });

        view! {
            <li data-name="PageItem" class="list-none">
                <a
                    id=p.id.clone()
                    href=p.url.clone().unwrap_or_default()
                    class=row_class
                    aria-current=move || is_selected.get().then_some("page")
                    on:click=move |ev: web_sys::MouseEvent| {
                        ev.prevent_default();
                        on_row_click(ev);
                    }
                >
                    {p.has_pages().then(|| view! {
                        <span class=chevron_class on:click=on_chevron_click>
                            <ChevronRight class="size-4" />
                        </span>
                    })}
                    <span class="truncate">{p.title.clone()}</span>
                </a>
                {p.has_anchors().then(|| {
                    let page_id = p.id.clone();
                    view! {
                        <Collapsible visible=is_selected>
                            <Anchors page_id=page_id.clone() />
                        </Collapsible>
                    }
                })}
                <Show when=move || is_expanded.get()>
                    {move || page_group(children)}
                </Show>
            </li>
        }
        .into_any()
    }
}

/// Ordered list of [`PageItem`]s. A plain function so the recursion goes through
/// an erased view type.
pub(crate) fn page_group(items: Signal<Vec<PageId>>) -> AnyView {
    view! {
        <ul data-name="PageGroup">
            <For
                each=move || items.get()
                key=|id| id.clone()
                children=|id| view! { <PageItem id=id /> }
            />
        </ul>
    }
    .into_any()
}
