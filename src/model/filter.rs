//! Local, case-insensitive substring filtering over in-memory lists

use super::content::{Book, Track};

/// Items that can be matched by a text query.
pub trait Labelled {
    fn primary_label(&self) -> &str;

    fn secondary_label(&self) -> &str {
        ""
    }
}

impl Labelled for Track {
    fn primary_label(&self) -> &str {
        &self.title
    }

    fn secondary_label(&self) -> &str {
        &self.subtitle
    }
}

impl Labelled for Book {
    fn primary_label(&self) -> &str {
        &self.title
    }

    fn secondary_label(&self) -> &str {
        &self.author
    }
}

fn matches_lowered<T: Labelled>(item: &T, query_lower: &str) -> bool {
    item.primary_label().to_lowercase().contains(query_lower)
        || item.secondary_label().to_lowercase().contains(query_lower)
}

/// Returns the items matching `query`, in their original order.
///
/// An empty (or whitespace-only) query matches everything. The source slice is
/// never modified.
pub fn filter<T: Labelled + Clone>(items: &[T], query: &str) -> Vec<T> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| matches_lowered(*item, &query_lower))
        .cloned()
        .collect()
}
