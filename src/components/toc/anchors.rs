use crate::cache::AnchorLoader;
use crate::components::ui::{CollapsibleContent, Placeholder};
use crate::models::PageId;
use crate::state::TocStore;
use crate::util::padding_left_class;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Anchor rows of a selected page, fetched on first show.
///
/// Renders one placeholder per listed anchor while the fetch runs and nothing if
/// it fails.
#[component]
pub fn Anchors(#[prop(into)] page_id: PageId) -> impl IntoView {
    let store = expect_context::<TocStore>();
    let loader = expect_context::<AnchorLoader>();

    let (count, level) = store
        .with_untracked(|s| {
            s.page(&page_id)
                .map(|p| (p.anchors.as_ref().map_or(0, |a| a.len()), p.level + 1))
        })
        .unwrap_or((0, 1));

    let handle = loader.load_anchors(page_id);

    // Rows replacing placeholders can wrap to a different height.
    if let Some(content) = use_context::<CollapsibleContent>() {
        Effect::new(move |_| {
            handle.track();
            content.changed();
        });
    }

    move || {
        if handle.is_loading() {
            return (0..count)
                .map(|_| view! { <Placeholder level=level /> })
                .collect_view()
                .into_any();
        }

        let Some(anchors) = handle.data() else {
            return ().into_any();
        };

        anchors
            .into_iter()
            .map(|anchor| {
                let anchor_id = StoredValue::new(anchor.id.clone());
                let level = anchor.level;
                let is_selected = Memo::new(move |_| {
                    anchor_id
                        .with_value(|id| store.selected_anchor().as_deref() == Some(id.as_str()))
                });
                let class = move || {
                    tw_merge!(
                        "block pr-4 py-1 text-sm text-neutral-600 hover:bg-neutral-100",
                        padding_left_class(level),
                        if is_selected.get() { "font-semibold text-neutral-900" } else { "" }
                    )
                };

                view! {
                    <a
                        data-name="AnchorItem"
                        href=anchor.href()
                        class=class
                        on:click=move |_| anchor_id.with_value(|id| store.select_anchor(Some(id)))
                    >
                        {anchor.title.clone()}
                    </a>
                }
            })
            .collect_view()
            .into_any()
    }
}
