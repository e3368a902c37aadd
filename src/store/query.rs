//! Listing semantics: title search, per-category filters, sort modes.

use std::cmp::Ordering;

use crate::capsule::{Capsule, Category, CategoryState};

/// Sort order for category listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest first (descending creation time).
    #[default]
    Recent,
    /// Oldest first.
    Oldest,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recent" => Ok(SortBy::Recent),
            "oldest" => Ok(SortBy::Oldest),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Per-category filter. `Locked`/`Unlocked` apply to future listings and
/// `Emotion` to lift listings; a filter that does not fit the listed
/// category is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Locked,
    Unlocked,
    Emotion(String),
}

/// Options for [`crate::store::CapsuleStore::query`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort: SortBy,
    pub filter: CategoryFilter,
    /// Case-insensitive substring match against titles. Records without a
    /// title never match a non-empty query.
    pub search: Option<String>,
}

/// Apply search, filter, and sort to an already category-filtered list.
pub(crate) fn filter_and_sort(capsules: &mut Vec<Capsule>, category: Category, opts: &ListOptions) {
    if let Some(query) = opts.search.as_deref() {
        let query = query.trim().to_lowercase();
        if !query.is_empty() {
            capsules.retain(|c| {
                c.title
                    .as_ref()
                    .is_some_and(|t| t.to_lowercase().contains(&query))
            });
        }
    }

    match (&opts.filter, category) {
        (CategoryFilter::Locked, Category::Future) => capsules.retain(|c| c.is_locked()),
        (CategoryFilter::Unlocked, Category::Future) => {
            capsules.retain(|c| c.is_unlocked() == Some(true))
        }
        (CategoryFilter::Emotion(tag), Category::Lift) => {
            capsules.retain(|c| c.emotion_tag() == Some(tag.as_str()))
        }
        _ => {}
    }

    capsules.sort_by(|a, b| compare(a, b, opts.sort));
}

/// Listing comparator. Two still-locked future capsules always order by
/// ascending unlock time, whatever the sort mode; every other pair orders
/// by creation time.
pub(crate) fn compare(a: &Capsule, b: &Capsule, sort: SortBy) -> Ordering {
    if let (
        CategoryState::Future {
            unlock_at_ms: unlock_a,
            is_unlocked: false,
        },
        CategoryState::Future {
            unlock_at_ms: unlock_b,
            is_unlocked: false,
        },
    ) = (&a.state, &b.state)
    {
        return unlock_a.cmp(unlock_b);
    }

    match sort {
        SortBy::Recent => b.created_at.cmp(&a.created_at),
        SortBy::Oldest => a.created_at.cmp(&b.created_at),
    }
}
