use crate::api::{ApiClient, FetchState};
use crate::models::{PageId, PagesMap};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Page map and top-level ids as fetched from the backend.
///
/// Each `load()` bumps a request generation; responses from an older generation
/// are dropped so a refresh never gets overwritten by a slow earlier request.
#[derive(Clone, Copy)]
pub struct TocDataSource {
    api_client: RwSignal<ApiClient>,
    pub pages: RwSignal<FetchState<PagesMap>>,
    pub top_level_ids: RwSignal<FetchState<Vec<PageId>>>,
    request_id: RwSignal<u64>,
}

impl TocDataSource {
    pub fn new(api_client: ApiClient) -> Self {
        Self {
            api_client: RwSignal::new(api_client),
            pages: RwSignal::new(FetchState::Pending),
            top_level_ids: RwSignal::new(FetchState::Pending),
            request_id: RwSignal::new(0),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pages.with(|p| p.is_loading()) || self.top_level_ids.with(|t| t.is_loading())
    }

    pub fn is_error(&self) -> bool {
        self.pages.with(|p| p.error().is_some()) || self.top_level_ids.with(|t| t.error().is_some())
    }

    pub fn load(&self) {
        let req_id = self.request_id.get_untracked().wrapping_add(1);
        self.request_id.set(req_id);

        self.pages.set(FetchState::Pending);
        self.top_level_ids.set(FetchState::Pending);

        let s = *self;
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let res = api_client.fetch_all_pages().await;
            if let Err(e) = &res {
                tracing::warn!(kind = %e.kind, error = %e, "failed to load pages");
            }
            if s.request_id.try_get_untracked() == Some(req_id) {
                s.pages.try_set(res.into());
            }
        });

        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            let res = api_client.fetch_top_level_ids().await;
            if let Err(e) = &res {
                tracing::warn!(kind = %e.kind, error = %e, "failed to load top-level ids");
            }
            if s.request_id.try_get_untracked() == Some(req_id) {
                s.top_level_ids.try_set(res.into());
            }
        });
    }
}
