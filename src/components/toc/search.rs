use crate::components::ui::Input;
use crate::state::TocStore;
use crate::util::{now_ms, Debounce, DebounceTimer};
use leptos::prelude::*;
use std::time::Duration;

/// Quiet period after the last keystroke before a query is applied.
pub const SEARCH_DEBOUNCE_MS: i64 = 500;

/// Search box. Typing only touches the local text; the query reaches the store once
/// input has been quiet for [`SEARCH_DEBOUNCE_MS`].
#[component]
pub fn Search() -> impl IntoView {
    let store = expect_context::<TocStore>();

    let text = RwSignal::new(store.with_untracked(|s| s.query().unwrap_or_default().to_string()));
    let debounce = StoredValue::new(Debounce::<String>::new(SEARCH_DEBOUNCE_MS));
    let timer = DebounceTimer::new();

    Effect::new(move |prev: Option<()>| {
        let value = text.get();
        // The first run only subscribes.
        if prev.is_none() {
            return;
        }
        debounce.update_value(|d| {
            d.push(value, now_ms());
        });
        timer.schedule(
            Duration::from_millis(SEARCH_DEBOUNCE_MS as u64),
            move || commit_when_due(store, debounce, timer),
        );
    });

    on_cleanup(move || {
        timer.cancel();
        debounce.try_update_value(|d| d.cancel());
    });

    view! {
        <div data-name="Search" class="pb-2">
            <Input
                r#type="search"
                placeholder="Search..."
                aria_label="Search pages"
                bind_value=text
            />
        </div>
    }
}

/// Timer callback. Applies the pending query, or re-arms for the rest of the window
/// when the clock says it is not due yet.
fn commit_when_due(store: TocStore, debounce: StoredValue<Debounce<String>>, timer: DebounceTimer) {
    let now = now_ms();
    let Some((ready, due)) = debounce.try_update_value(|d| (d.poll(now), d.due())) else {
        return;
    };

    if let Some(query) = ready {
        tracing::debug!(query = %query, "search query committed");
        store.set_query(Some(&query));
        return;
    }

    if let Some(due) = due {
        let remaining = (due - now).max(0) as u64;
        timer.schedule(Duration::from_millis(remaining), move || {
            commit_when_due(store, debounce, timer)
        });
    }
}
