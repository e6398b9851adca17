mod data_source;

pub use data_source::TocDataSource;

use crate::hierarchy::ancestor_chain;
use crate::models::{AnchorId, Page, PageId, PagesMap};
use leptos::prelude::*;
use std::collections::HashSet;

/// Selection and expansion state of one table of contents.
///
/// All mutation goes through the methods below, which keep these invariants:
/// - `selected_page`, when set, is a key of `pages`;
/// - `selected_anchor`, when set, is listed by the selected page;
/// - after `set_pages`, `expanded` only holds keys of `pages`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TocState {
    pages: PagesMap,
    selected_page: Option<PageId>,
    selected_anchor: Option<AnchorId>,
    expanded: HashSet<PageId>,
    query: Option<String>,
}

impl TocState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &PagesMap {
        &self.pages
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    pub fn selected_page(&self) -> Option<&str> {
        self.selected_page.as_deref()
    }

    pub fn selected_anchor(&self) -> Option<&str> {
        self.selected_anchor.as_deref()
    }

    pub fn expanded(&self) -> &HashSet<PageId> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Replace the page map wholesale, dropping selection and expansion entries
    /// that no longer resolve. Never picks a fallback selection.
    pub fn set_pages(&mut self, pages: PagesMap) {
        self.pages = pages;

        if let Some(id) = self.selected_page.as_deref() {
            if !self.pages.contains_key(id) {
                tracing::debug!(page = id, "selected page pruned");
                self.selected_page = None;
            }
        }

        let before = self.expanded.len();
        let pages = &self.pages;
        self.expanded.retain(|id| pages.contains_key(id));
        if self.expanded.len() != before {
            tracing::debug!(removed = before - self.expanded.len(), "expanded ids pruned");
        }

        self.drop_orphaned_anchor();
    }

    /// Select a page (or clear the selection with `None`).
    ///
    /// Unknown ids are ignored. A valid selection expands its whole ancestor chain,
    /// including the page itself; nothing is ever collapsed here.
    pub fn select_page(&mut self, id: Option<&str>) {
        match id {
            None => {
                self.selected_page = None;
            }
            Some(id) if !self.pages.contains_key(id) => {
                tracing::debug!(page = id, "ignoring selection of unknown page");
                return;
            }
            Some(id) => {
                self.selected_page = Some(id.to_string());
                self.expanded.extend(ancestor_chain(&self.pages, id));
            }
        }

        self.drop_orphaned_anchor();
    }

    pub fn set_expanded(&mut self, id: &str, is_expanded: bool) {
        if is_expanded {
            self.expanded.insert(id.to_string());
        } else {
            self.expanded.remove(id);
        }
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        let next = !self.is_expanded(id);
        self.set_expanded(id, next);
    }

    /// Set the anchor selection as issued. Callers select anchors of the selected page.
    pub fn select_anchor(&mut self, id: Option<&str>) {
        self.selected_anchor = id.map(|s| s.to_string());
    }

    /// Store the committed search string; blank input clears it.
    pub fn set_query(&mut self, query: Option<&str>) {
        self.query = query
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(|q| q.to_string());
    }

    /// Expand the ancestors of `id`, leaving `id` itself as it was.
    pub fn reveal(&mut self, id: &str) {
        let chain = ancestor_chain(&self.pages, id);
        self.expanded.extend(chain.into_iter().skip(1));
    }

    fn drop_orphaned_anchor(&mut self) {
        let Some(anchor) = self.selected_anchor.as_deref() else {
            return;
        };

        let owned = self
            .selected_page
            .as_deref()
            .and_then(|id| self.pages.get(id))
            .is_some_and(|page| page.lists_anchor(anchor));

        if !owned {
            self.selected_anchor = None;
        }
    }
}

/// Reactive handle around [`TocState`]; the only write path into it.
#[derive(Clone, Copy)]
pub struct TocStore {
    state: RwSignal<TocState>,
}

impl TocStore {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(TocState::new()),
        }
    }

    /// Tracked read of the whole state.
    pub fn with<R>(&self, f: impl FnOnce(&TocState) -> R) -> R {
        self.state.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&TocState) -> R) -> R {
        self.state.with_untracked(f)
    }

    pub fn page(&self, id: &str) -> Option<Page> {
        self.state.with(|s| s.page(id).cloned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.with(|s| s.contains(id))
    }

    pub fn selected_page(&self) -> Option<PageId> {
        self.state.with(|s| s.selected_page().map(|s| s.to_string()))
    }

    pub fn selected_anchor(&self) -> Option<AnchorId> {
        self.state.with(|s| s.selected_anchor().map(|s| s.to_string()))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.state.with(|s| s.is_expanded(id))
    }

    pub fn query(&self) -> Option<String> {
        self.state.with(|s| s.query().map(|q| q.to_string()))
    }

    pub fn set_pages(&self, pages: PagesMap) {
        self.state.update(|s| s.set_pages(pages));
    }

    pub fn select_page(&self, id: Option<&str>) {
        self.state.update(|s| s.select_page(id));
    }

    pub fn set_expanded(&self, id: &str, is_expanded: bool) {
        self.state.update(|s| s.set_expanded(id, is_expanded));
    }

    pub fn toggle_expanded(&self, id: &str) {
        self.state.update(|s| s.toggle_expanded(id));
    }

    pub fn select_anchor(&self, id: Option<&str>) {
        self.state.update(|s| s.select_anchor(id));
    }

    pub fn set_query(&self, query: Option<&str>) {
        self.state.try_update(|s| s.set_query(query));
    }

    /// Ingest a filtered (or full) page map and reveal the given matches, as one update.
    pub fn show_filtered(&self, pages: PagesMap, matches: &[PageId]) {
        self.state.update(|s| {
            s.set_pages(pages);
            for id in matches {
                s.reveal(id);
            }
        });
    }
}

impl Default for TocStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Externally requested selection that may name a page the store does not have yet.
#[derive(Clone, Copy)]
pub struct PendingSelection {
    id: StoredValue<Option<PageId>>,
}

impl PendingSelection {
    pub fn new() -> Self {
        Self {
            id: StoredValue::new(None),
        }
    }

    pub fn get(&self) -> Option<PageId> {
        self.id.get_value()
    }

    /// Hold `id` until its page is known. `None` drops whatever was held and clears
    /// the selection.
    pub fn request(&self, store: TocStore, id: Option<PageId>) {
        match id {
            Some(id) => {
                self.id.set_value(Some(id));
                self.apply(store);
            }
            None => {
                self.id.set_value(None);
                store.select_page(None);
            }
        }
    }

    /// Select the held id once the store contains it.
    pub fn apply(&self, store: TocStore) {
        let Some(id) = self.get() else {
            return;
        };
        if store.with_untracked(|s| s.contains(&id)) {
            store.select_page(Some(&id));
            self.id.set_value(None);
        }
    }
}

impl Default for PendingSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::filter_by_substring;
    use crate::models::Page;
    use pretty_assertions::assert_eq;

    fn page(
        id: &str,
        level: u32,
        parent: Option<&str>,
        children: &[&str],
        anchors: &[&str],
    ) -> Page {
        let list = |v: &[&str]| {
            if v.is_empty() {
                None
            } else {
                Some(v.iter().map(|s| s.to_string()).collect())
            }
        };
        Page {
            id: id.to_string(),
            title: format!("Title {id}"),
            url: None,
            level,
            parent_id: parent.map(|p| p.to_string()),
            pages: list(children),
            anchors: list(anchors),
        }
    }

    fn sample() -> PagesMap {
        vec![
            page("page1", 0, None, &["page3", "page4"], &[]),
            page("page2", 0, None, &[], &["a2"]),
            page("page3", 1, Some("page1"), &["page5"], &["a3", "a3b"]),
            page("page4", 1, Some("page1"), &[], &[]),
            page("page5", 2, Some("page3"), &[], &[]),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect()
    }

    fn loaded() -> TocState {
        let mut s = TocState::new();
        s.set_pages(sample());
        s
    }

    fn expanded_sorted(s: &TocState) -> Vec<&str> {
        let mut v: Vec<&str> = s.expanded().iter().map(|s| s.as_str()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_new_state_is_empty() {
        let s = TocState::new();
        assert!(s.pages().is_empty());
        assert!(s.selected_page().is_none());
        assert!(s.selected_anchor().is_none());
        assert!(s.expanded().is_empty());
        assert!(s.query().is_none());
    }

    #[test]
    fn test_select_nested_page_expands_ancestors() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        assert_eq!(s.selected_page(), Some("page3"));
        assert!(s.is_expanded("page1"));
        assert!(s.is_expanded("page3"));
        assert!(!s.is_expanded("page2"));
    }

    #[test]
    fn test_select_deep_page_expands_full_chain() {
        let mut s = loaded();
        s.select_page(Some("page5"));
        assert_eq!(expanded_sorted(&s), vec!["page1", "page3", "page5"]);
    }

    #[test]
    fn test_select_unknown_page_is_ignored() {
        let mut s = loaded();
        s.select_page(Some("page2"));
        s.select_page(Some("missing"));
        assert_eq!(s.selected_page(), Some("page2"));
    }

    #[test]
    fn test_select_none_clears_selection_and_anchor() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3"));
        s.select_page(None);
        assert!(s.selected_page().is_none());
        assert!(s.selected_anchor().is_none());
        // Expansion is never rolled back.
        assert!(s.is_expanded("page1"));
    }

    #[test]
    fn test_selection_never_collapses() {
        let mut s = loaded();
        s.set_expanded("page2", true);
        s.select_page(Some("page4"));
        assert_eq!(expanded_sorted(&s), vec!["page1", "page2", "page4"]);
    }

    #[test]
    fn test_reselecting_same_page_recascades() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.set_expanded("page1", false);
        s.select_page(Some("page3"));
        assert!(s.is_expanded("page1"));
    }

    #[test]
    fn test_anchor_cleared_when_new_page_does_not_own_it() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3"));
        s.select_page(Some("page2"));
        assert!(s.selected_anchor().is_none());
    }

    #[test]
    fn test_anchor_kept_when_page_still_owns_it() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3b"));
        s.select_page(Some("page3"));
        assert_eq!(s.selected_anchor(), Some("a3b"));
    }

    #[test]
    fn test_ignored_selection_keeps_anchor() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3"));
        s.select_page(Some("missing"));
        assert_eq!(s.selected_anchor(), Some("a3"));
    }

    #[test]
    fn test_set_pages_prunes_selection_and_expansion() {
        let mut s = loaded();
        s.select_page(Some("page4"));
        s.set_expanded("page2", true);

        let mut next = sample();
        next.remove("page4");
        next.remove("page2");
        s.set_pages(next);

        assert!(s.selected_page().is_none());
        assert!(!s.is_expanded("page2"));
        assert!(!s.is_expanded("page4"));
        assert!(s.is_expanded("page1"));
    }

    #[test]
    fn test_set_pages_keeps_valid_selection() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3"));
        s.set_pages(sample());
        assert_eq!(s.selected_page(), Some("page3"));
        assert_eq!(s.selected_anchor(), Some("a3"));
    }

    #[test]
    fn test_set_pages_drops_anchor_no_longer_listed() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        s.select_anchor(Some("a3"));

        let mut next = sample();
        if let Some(p) = next.get_mut("page3") {
            p.anchors = Some(vec!["a3b".to_string()]);
        }
        s.set_pages(next);

        assert_eq!(s.selected_page(), Some("page3"));
        assert!(s.selected_anchor().is_none());
    }

    #[test]
    fn test_set_pages_does_not_pick_fallback() {
        let mut s = loaded();
        s.select_page(Some("page5"));
        let mut next = sample();
        next.remove("page5");
        s.set_pages(next);
        assert!(s.selected_page().is_none());
    }

    #[test]
    fn test_set_expanded_is_idempotent() {
        let mut s = loaded();
        s.set_expanded("page1", true);
        let once = s.clone();
        s.set_expanded("page1", true);
        assert_eq!(s, once);
        assert_eq!(s.expanded().len(), 1);

        s.set_expanded("page1", false);
        s.set_expanded("page1", false);
        assert!(s.expanded().is_empty());
    }

    #[test]
    fn test_set_expanded_accepts_unknown_id_until_next_set_pages() {
        let mut s = loaded();
        s.set_expanded("ghost", true);
        assert!(s.is_expanded("ghost"));
        s.set_pages(sample());
        assert!(!s.is_expanded("ghost"));
    }

    #[test]
    fn test_toggle_expanded() {
        let mut s = loaded();
        s.toggle_expanded("page1");
        assert!(s.is_expanded("page1"));
        s.toggle_expanded("page1");
        assert!(!s.is_expanded("page1"));
    }

    #[test]
    fn test_select_in_cyclic_map_selects_without_expanding() {
        let mut s = TocState::new();
        let pages: PagesMap = vec![
            page("A", 1, Some("B"), &[], &[]),
            page("B", 1, Some("A"), &[], &[]),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
        s.set_pages(pages);
        s.select_page(Some("A"));
        assert_eq!(s.selected_page(), Some("A"));
        assert!(s.expanded().is_empty());
    }

    #[test]
    fn test_set_query_normalizes_blank_to_none() {
        let mut s = loaded();
        s.set_query(Some("  page  "));
        assert_eq!(s.query(), Some("page"));
        s.set_query(Some("   "));
        assert!(s.query().is_none());
        s.set_query(None);
        assert!(s.query().is_none());
    }

    #[test]
    fn test_set_query_leaves_tree_state_alone() {
        let mut s = loaded();
        s.select_page(Some("page3"));
        let before = s.clone();
        s.set_query(Some("page 2"));
        assert_eq!(s.pages(), before.pages());
        assert_eq!(s.selected_page(), before.selected_page());
        assert_eq!(s.expanded(), before.expanded());
    }

    #[test]
    fn test_reveal_expands_ancestors_only() {
        let mut s = loaded();
        s.reveal("page5");
        assert_eq!(expanded_sorted(&s), vec!["page1", "page3"]);
    }

    #[test]
    fn test_end_to_end_select_non_top_level_page() {
        let mut s = TocState::new();
        let pages: PagesMap = vec![
            page("page1", 0, None, &["page3", "page4"], &[]),
            page("page2", 0, None, &[], &[]),
            page("page3", 1, Some("page1"), &[], &[]),
            page("page4", 1, Some("page1"), &[], &[]),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
        s.set_pages(pages);

        s.select_page(Some("page3"));

        assert_eq!(s.selected_page(), Some("page3"));
        assert!(s.is_expanded("page1"));
    }

    fn with_owner(f: impl FnOnce()) {
        let owner = Owner::new();
        owner.set();
        f();
    }

    #[test]
    fn test_show_filtered_prunes_selection_and_reveals_matches() {
        with_owner(|| {
            let store = TocStore::new();
            store.set_pages(sample());
            store.select_page(Some("page2"));

            let roots: Vec<PageId> = vec!["page1".into(), "page2".into()];
            let filtered = filter_by_substring("title page5", &roots, &sample());
            store.show_filtered(filtered.pages, &filtered.matches);

            assert_eq!(store.selected_page(), None);
            assert!(!store.contains("page2"));
            assert!(store.is_expanded("page1"));
            assert!(store.is_expanded("page3"));
            assert!(!store.is_expanded("page5"));
        });
    }

    #[test]
    fn test_show_filtered_with_full_map_restores_pages() {
        with_owner(|| {
            let store = TocStore::new();
            let roots: Vec<PageId> = vec!["page1".into(), "page2".into()];

            let filtered = filter_by_substring("title page4", &roots, &sample());
            store.show_filtered(filtered.pages, &filtered.matches);
            assert!(!store.contains("page2"));

            let full = filter_by_substring("", &roots, &sample());
            assert!(full.matches.is_empty());
            store.show_filtered(full.pages, &full.matches);

            assert_eq!(store.with(|s| s.pages().len()), sample().len());
            assert!(store.is_expanded("page1"));
            store.select_page(Some("page2"));
            assert_eq!(store.selected_page().as_deref(), Some("page2"));
        });
    }

    #[test]
    fn test_pending_selection_applies_once_page_arrives() {
        with_owner(|| {
            let store = TocStore::new();
            let pending = PendingSelection::new();

            pending.request(store, Some("page3".to_string()));
            assert_eq!(store.selected_page(), None);
            assert_eq!(pending.get().as_deref(), Some("page3"));

            // Nothing to apply against yet.
            pending.apply(store);
            assert_eq!(pending.get().as_deref(), Some("page3"));

            store.set_pages(sample());
            pending.apply(store);
            assert_eq!(store.selected_page().as_deref(), Some("page3"));
            assert!(store.is_expanded("page1"));
            assert_eq!(pending.get(), None);
        });
    }

    #[test]
    fn test_pending_selection_known_page_selects_immediately() {
        with_owner(|| {
            let store = TocStore::new();
            store.set_pages(sample());
            let pending = PendingSelection::new();

            pending.request(store, Some("page5".to_string()));

            assert_eq!(store.selected_page().as_deref(), Some("page5"));
            assert_eq!(pending.get(), None);
        });
    }

    #[test]
    fn test_pending_selection_none_clears_held_id_and_selection() {
        with_owner(|| {
            let store = TocStore::new();
            store.set_pages(sample());
            store.select_page(Some("page4"));
            let pending = PendingSelection::new();

            pending.request(store, Some("ghost".to_string()));
            assert_eq!(pending.get().as_deref(), Some("ghost"));
            assert_eq!(store.selected_page().as_deref(), Some("page4"));

            pending.request(store, None);
            assert_eq!(pending.get(), None);
            assert_eq!(store.selected_page(), None);

            // A later page map containing the dropped id does not select it.
            pending.apply(store);
            assert_eq!(store.selected_page(), None);
        });
    }
}
