use crate::api::{ApiClient, ApiResult, FetchState};
use crate::models::{Anchor, PageId};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;

/// Per-page anchor lists, keyed by page id.
///
/// An entry is created when a fetch starts and replaced when it settles, so a second
/// request for the same page while one is in flight (or after it succeeded) is a
/// cache hit. A failed entry is refetched on the next request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnchorCache {
    entries: HashMap<PageId, FetchState<Vec<Anchor>>>,
}

impl AnchorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// No entry yet, or the last attempt failed.
    pub fn needs_fetch(&self, page_id: &str) -> bool {
        matches!(self.entries.get(page_id), None | Some(FetchState::Failed(_)))
    }

    /// Mark `page_id` as loading. Returns `true` if the caller should issue the fetch.
    pub fn begin(&mut self, page_id: &str) -> bool {
        if !self.needs_fetch(page_id) {
            return false;
        }
        self.entries.insert(page_id.to_string(), FetchState::Pending);
        true
    }

    pub fn resolve(&mut self, page_id: &str, result: ApiResult<Vec<Anchor>>) {
        self.entries.insert(page_id.to_string(), result.into());
    }

    pub fn get(&self, page_id: &str) -> Option<&FetchState<Vec<Anchor>>> {
        self.entries.get(page_id)
    }
}

/// Read side of one page's anchor fetch.
#[derive(Clone, Copy)]
pub struct AnchorsHandle {
    state: Memo<FetchState<Vec<Anchor>>>,
}

impl AnchorsHandle {
    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error().map(|e| e.to_string()))
    }

    pub fn data(&self) -> Option<Vec<Anchor>> {
        self.state.with(|s| s.data().cloned())
    }

    /// Subscribe the current reactive scope to every state change.
    pub fn track(&self) {
        self.state.track();
    }
}

/// Shared anchor loader; provide it once as context so every table of contents
/// on the page hits the same cache.
#[derive(Clone, Copy)]
pub struct AnchorLoader {
    api_client: RwSignal<ApiClient>,
    cache: RwSignal<AnchorCache>,
}

impl AnchorLoader {
    pub fn new(api_client: ApiClient) -> Self {
        Self::with_cache(api_client, AnchorCache::new())
    }

    pub(crate) fn with_cache(api_client: ApiClient, cache: AnchorCache) -> Self {
        Self {
            api_client: RwSignal::new(api_client),
            cache: RwSignal::new(cache),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiClient::from_env())
    }

    /// Start (or join) the fetch for `page_id` and return a handle scoped to that id.
    ///
    /// The handle only ever reads the entry for its own page, so a response for a
    /// page the user has since left is stored but not shown anywhere else.
    pub fn load_anchors(&self, page_id: PageId) -> AnchorsHandle {
        // Hits must not write the signal, or every mounted handle recomputes.
        let should_fetch = self
            .cache
            .try_with_untracked(|c| c.needs_fetch(&page_id))
            .unwrap_or(false)
            && self
                .cache
                .try_update(|c| c.begin(&page_id))
                .unwrap_or(false);

        if should_fetch {
            let cache = self.cache;
            let api_client = self.api_client.get_untracked();
            let id = page_id.clone();
            spawn_local(async move {
                let res = api_client.fetch_anchors_for_page(&id).await;
                if let Err(e) = &res {
                    tracing::warn!(
                        page = %id,
                        kind = %e.kind,
                        error = %e,
                        "failed to load anchors"
                    );
                }
                cache.try_update(|c| c.resolve(&id, res));
            });
        }

        let cache = self.cache;
        AnchorsHandle {
            state: Memo::new(move |_| {
                cache.with(|c| c.get(&page_id).cloned().unwrap_or_default())
            }),
        }
    }
}
