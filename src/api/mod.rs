use crate::models::{Anchor, Page, PageId, PagesMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum ApiErrorKind {
    Network,
    Http,
    NotFound,
    Parse,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn not_found(what: &str) -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            message: format!("Not found: {what}"),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Observable state of one asynchronous data-source call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchState<T> {
    Pending,
    Failed(ApiError),
    Ready(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Pending
    }
}

impl<T> From<ApiResult<T>> for FetchState<T> {
    fn from(r: ApiResult<T>) -> Self {
        match r {
            Ok(v) => FetchState::Ready(v),
            Err(e) => FetchState::Failed(e),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub const DEFAULT_API_URL: &'static str = "http://localhost:3001";

    pub fn new() -> Self {
        // Both `window.ENV.API_URL` and `window.ENV.api_url` are honored.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the table-of-contents REST backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn page_path(id: &str) -> String {
        format!("/entities/pages/{}", urlencoding::encode(id))
    }

    pub(crate) fn page_anchors_path(id: &str) -> String {
        format!("/entities/pages/{}/anchors", urlencoding::encode(id))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let res = client
            .get(self.url(path))
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            let text = res.text().await.map_err(ApiError::network)?;
            serde_json::from_str(&text).map_err(ApiError::parse)
        } else if res.status() == reqwest::StatusCode::NOT_FOUND {
            Err(ApiError::not_found(path))
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    pub async fn fetch_top_level_ids(&self) -> ApiResult<Vec<PageId>> {
        self.get("/topLevelIds").await
    }

    pub async fn fetch_all_pages(&self) -> ApiResult<PagesMap> {
        self.get("/entities/pages").await
    }

    pub async fn fetch_page(&self, id: &str) -> ApiResult<Page> {
        let path = Self::page_path(id);
        let body: Option<Page> = self.get(&path).await?;
        page_from_body(&path, body)
    }

    pub async fn fetch_anchors_for_page(&self, id: &str) -> ApiResult<Vec<Anchor>> {
        self.get(&Self::page_anchors_path(id)).await
    }
}

/// The backend answers an unknown page id with a `null` body.
fn page_from_body(path: &str, body: Option<Page>) -> ApiResult<Page> {
    body.ok_or_else(|| ApiError::not_found(path))
}
