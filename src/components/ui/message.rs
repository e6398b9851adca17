use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {ErrorMessage, div, "px-6 py-2 text-red-400 italic text-sm"}
}

pub use components::*;
