use crate::api::ApiClient;
use crate::cache::AnchorLoader;
use crate::components::toc::Toc;
use crate::models::{PageId, PagesMap};
use crate::state::TocDataSource;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::path;

/// Demo shell: a sidebar table of contents whose selection follows the URL.
#[component]
pub fn App() -> impl IntoView {
    let api_client = ApiClient::from_env();
    let data = TocDataSource::new(api_client.clone());
    data.load();
    provide_context(data);
    provide_context(AnchorLoader::new(api_client));

    view! {
        <Router>
            <Routes fallback=|| {
                view! { <div class="px-4 py-8 text-xs text-neutral-400">"Not found"</div> }
            }>
                <Route path=path!("*any") view=DocsPage />
            </Routes>
        </Router>
    }
}

#[component]
fn DocsPage() -> impl IntoView {
    let data = expect_context::<TocDataSource>();
    let location = use_location();
    let navigate = StoredValue::new(use_navigate());

    let pages = Signal::derive(move || data.pages.with(|p| p.data().cloned().unwrap_or_default()));
    let top_level_ids =
        Signal::derive(move || data.top_level_ids.with(|t| t.data().cloned().unwrap_or_default()));

    let selected_id = Signal::derive(move || {
        let pathname = location.pathname.get();
        pages.with(|p| page_for_path(p, &pathname))
    });

    let on_page_select = Callback::new(move |id: Option<PageId>| {
        let Some(url) = id.and_then(|id| page_url(pages, &id)) else {
            return;
        };
        if location.pathname.get_untracked() != url {
            navigate.with_value(|nav| nav(&url, Default::default()));
        }
    });

    let title = move || {
        selected_id
            .get()
            .and_then(|id| pages.with(|p| p.get(&id).map(|p| p.title.clone())))
            .unwrap_or_else(|| "Select a page".to_string())
    };

    view! {
        <div class="flex flex-col h-screen">
            <header class="px-6 py-3 border-b border-neutral-200 text-sm font-semibold">
                "Documentation"
            </header>
            <div class="flex flex-1 min-h-0">
                <aside class="w-[280px] shrink-0 border-r border-neutral-200">
                    <Toc
                        is_loading=Signal::derive(move || data.is_loading())
                        is_error=Signal::derive(move || data.is_error())
                        has_search=true
                        selected_id=selected_id
                        pages=pages
                        top_level_ids=top_level_ids
                        on_page_select=on_page_select
                    />
                </aside>
                <main class="flex-1 overflow-auto px-10 py-8">
                    <h1 class="text-2xl font-semibold">{title}</h1>
                </main>
            </div>
        </div>
    }
}

fn page_url(pages: Signal<PagesMap>, id: &str) -> Option<String> {
    pages.with_untracked(|p| p.get(id).and_then(|p| p.url.clone()))
}

/// Page whose url is `pathname`, ignoring a trailing slash.
fn page_for_path(pages: &PagesMap, pathname: &str) -> Option<PageId> {
    let pathname = pathname.trim_end_matches('/');
    pages
        .values()
        .find(|p| p.url.as_deref().is_some_and(|u| u.trim_end_matches('/') == pathname))
        .map(|p| p.id.clone())
}
