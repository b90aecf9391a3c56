/// In-memory filtering and page arithmetic for the gallery.
///
/// Filtering keeps load order. Pages are 1-based and there is always at least one page,
/// even when nothing matches.
use ideas_common::model::{Idea, ALL_CATEGORIES};

/// Ideas matching both the category and the search query, in load order.
///
/// An empty query matches everything; otherwise the query must occur in the title or the
/// description, ignoring case.
pub fn filter_ideas<'a>(ideas: &'a [Idea], category: &str, query: &str) -> Vec<&'a Idea> {
    let needle = query.to_lowercase();
    ideas
        .iter()
        .filter(|idea| matches_category(idea, category) && matches_query(idea, &needle))
        .collect()
}

fn matches_category(idea: &Idea, category: &str) -> bool {
    category == ALL_CATEGORIES || idea.has_category(category)
}

fn matches_query(idea: &Idea, needle: &str) -> bool {
    needle.is_empty()
        || idea.title.to_lowercase().contains(needle)
        || idea.description.to_lowercase().contains(needle)
}

pub fn total_pages(matches: usize, page_size: usize) -> usize {
    matches.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let last = total_pages.max(1);
    if requested < 1 {
        1
    } else {
        usize::try_from(requested).map_or(last, |page| page.min(last))
    }
}

/// The items on `page`, possibly short on the last page and empty when out of range.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
