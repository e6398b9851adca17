use crate::components::hooks::use_random::use_random_width_class;
use crate::util::padding_left_class;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Shimmer row standing in for a tree entry at `level`.
#[component]
pub fn Placeholder(level: u32) -> impl IntoView {
    let row_class = tw_merge!("animate-pulse pr-8", padding_left_class(level));
    let bar_class = tw_merge!("py-2", use_random_width_class());

    view! {
        <div data-name="Placeholder" class=row_class>
            <div class=bar_class>
                <div class="bg-neutral-100">"\u{a0}"</div>
            </div>
        </div>
    }
}
