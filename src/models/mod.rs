use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub type PageId = String;
pub type AnchorId = String;

/// All known pages keyed by id. Iteration order carries no meaning.
pub type PagesMap = HashMap<PageId, Page>;
pub type AnchorsMap = HashMap<AnchorId, Anchor>;

/// One node of the table of contents.
///
/// The backend emits camelCase keys. Top-level pages carry either `"parentId": ""`
/// or `"parentId": null`; both deserialize to `None`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,

    /// Relative path, used as the link href.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Nesting depth from the root, 0 for top-level pages.
    pub level: u32,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<PageId>,

    /// Ordered child page ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageId>>,

    /// Ordered anchor ids shown when the page is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<Vec<AnchorId>>,
}

impl Page {
    pub fn has_pages(&self) -> bool {
        self.pages.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_anchors(&self) -> bool {
        self.anchors.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn lists_anchor(&self, anchor_id: &str) -> bool {
        self.anchors
            .as_ref()
            .is_some_and(|a| a.iter().any(|id| id == anchor_id))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub id: AnchorId,
    pub title: String,

    /// Path of the page the anchor belongs to.
    pub url: String,

    /// Fragment, e.g. `#installation`.
    pub anchor: String,

    /// Indentation only; unrelated to page levels.
    pub level: u32,
}

impl Anchor {
    pub fn href(&self) -> String {
        format!("{}{}", self.url, self.anchor)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Entities {
    #[serde(default)]
    pub pages: PagesMap,
    #[serde(default)]
    pub anchors: AnchorsMap,
}

/// Whole document served by the demo backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TocDocument {
    pub entities: Entities,
    #[serde(default)]
    pub top_level_ids: Vec<PageId>,
}

impl TocDocument {
    /// Anchors of a page in the page's own order. Ids without an entry are skipped.
    pub fn anchors_for_page(&self, page_id: &str) -> Vec<Anchor> {
        let Some(page) = self.entities.pages.get(page_id) else {
            return vec![];
        };

        page.anchors
            .iter()
            .flatten()
            .filter_map(|id| self.entities.anchors.get(id).cloned())
            .collect()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<String>::deserialize(deserializer)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}
