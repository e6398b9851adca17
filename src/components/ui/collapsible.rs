use leptos::html;
use leptos::prelude::*;

/// Provided to the children of a [`Collapsible`]. Children whose height changes
/// after mount call [`CollapsibleContent::changed`] so the container measures again.
#[derive(Clone, Copy)]
pub struct CollapsibleContent {
    revision: RwSignal<u64>,
}

impl CollapsibleContent {
    fn new() -> Self {
        Self {
            revision: RwSignal::new(0),
        }
    }

    pub fn changed(&self) {
        self.revision.try_update(|r| *r = r.wrapping_add(1));
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

/// Height-animated container. Children are only mounted while `visible`.
#[component]
pub fn Collapsible(
    #[prop(into)] visible: Signal<bool>,
    #[prop(default = 150)] duration_ms: u32,
    children: ChildrenFn,
) -> impl IntoView {
    let node_ref: NodeRef<html::Div> = NodeRef::new();
    let height: RwSignal<i32> = RwSignal::new(0);
    let content = CollapsibleContent::new();
    provide_context(content);

    // Measure after the children for the new state are in the DOM.
    Effect::new(move |_| {
        let visible = visible.get();
        content.revision();
        let Some(el) = node_ref.get() else {
            return;
        };
        height.set(if visible { el.scroll_height() } else { 0 });
    });

    let style = move || {
        format!(
            "max-height: {}px; transition-duration: {}ms",
            height.get(),
            duration_ms
        )
    };

    view! {
        <div
            data-name="Collapsible"
            node_ref=node_ref
            class="transition-all overflow-hidden"
            style=style
        >
            <Show when=move || visible.get()>{children()}</Show>
        </div>
    }
}
