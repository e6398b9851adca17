use crate::models::{PageId, PagesMap};
use std::collections::HashSet;

/// Walk `parent_id` links from `id` up to the root.
///
/// Returns the visited ids leaf-first, starting with `id` itself.
/// - Unknown `id`: empty.
/// - A parent missing from the map ends the walk; the ids collected so far are kept.
/// - A revisited id is a cycle: the partial walk is discarded and the result is empty.
pub fn ancestor_chain(pages: &PagesMap, id: &str) -> Vec<PageId> {
    let mut out: Vec<PageId> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = id;

    loop {
        let Some(page) = pages.get(current) else {
            break;
        };

        if !seen.insert(page.id.as_str()) {
            tracing::warn!(start = id, repeated = current, "cycle in page hierarchy");
            return vec![];
        }
        out.push(page.id.clone());

        match page.parent_id.as_deref() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    out
}

/// Result of a search pass: a pruned copy of the hierarchy plus the ids that matched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilteredTree {
    pub top_level_ids: Vec<PageId>,
    pub pages: PagesMap,
    /// Pages whose title contains the query. Empty when no filter was applied.
    pub matches: Vec<PageId>,
}

/// Case-insensitive substring search over page titles.
///
/// Every matching page is kept together with its ancestor chain. Child lists and the
/// top-level list are then cut down to kept ids, so the result never references a
/// pruned page. A blank query returns the input unchanged.
pub fn filter_by_substring(
    query: &str,
    top_level_ids: &[PageId],
    pages: &PagesMap,
) -> FilteredTree {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return FilteredTree {
            top_level_ids: top_level_ids.to_vec(),
            pages: pages.clone(),
            matches: vec![],
        };
    }

    let roots: HashSet<&str> = top_level_ids.iter().map(|s| s.as_str()).collect();
    let mut keep: HashSet<PageId> = HashSet::new();
    let mut matches: Vec<PageId> = Vec::new();

    for page in pages.values() {
        if !page.title.to_lowercase().contains(&q) {
            continue;
        }

        let chain = ancestor_chain(pages, &page.id);

        // Chains that do not end at a listed root would be unreachable in the result.
        let reachable = chain.last().is_some_and(|root| roots.contains(root.as_str()));
        if !reachable {
            continue;
        }

        matches.push(page.id.clone());
        keep.extend(chain);
    }

    let mut out = PagesMap::with_capacity(keep.len());
    for id in &keep {
        let Some(page) = pages.get(id) else {
            continue;
        };

        let mut page = page.clone();
        if let Some(children) = page.pages.as_mut() {
            children.retain(|c| keep.contains(c));
        }
        out.insert(id.clone(), page);
    }

    matches.sort();

    FilteredTree {
        top_level_ids: top_level_ids
            .iter()
            .filter(|id| keep.contains(*id))
            .cloned()
            .collect(),
        pages: out,
        matches,
    }
}
