// ── Photo filter predicates ──
//
// Pure functions of the filter state and a single photo. All predicates
// are conjunctive, so evaluation order only affects speed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use albumkit_api::types::Photo;

/// Inclusive date window. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A photo without a timestamp fails any bound that is set.
    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        let after_start = self.start.is_none_or(|start| at.is_some_and(|t| t >= start));
        let before_end = self.end.is_none_or(|end| at.is_some_and(|t| t <= end));
        after_start && before_end
    }
}

/// Active photo filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoFilters {
    pub tags: Vec<String>,
    pub date_range: Option<DateRange>,
    pub search: String,
    pub favorites_only: bool,
}

impl PhotoFilters {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.date_range.is_none()
            && self.search.is_empty()
            && !self.favorites_only
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        self.matches_tags(photo)
            && self.matches_search(photo)
            && self.matches_date(photo)
            && (!self.favorites_only || photo.is_favored)
    }

    fn matches_tags(&self, photo: &Photo) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|tag| photo.tags.contains(tag))
    }

    fn matches_search(&self, photo: &Photo) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        photo.original_name.to_lowercase().contains(&needle)
            || photo.name.to_lowercase().contains(&needle)
            || photo.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
    }

    fn matches_date(&self, photo: &Photo) -> bool {
        self.date_range
            .as_ref()
            .is_none_or(|range| range.contains(photo.created_at))
    }

    /// Shallow merge: only fields present in `update` change.
    pub fn apply(&mut self, update: PhotoFilterUpdate) {
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(date_range) = update.date_range {
            self.date_range = date_range;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(favorites_only) = update.favorites_only {
            self.favorites_only = favorites_only;
        }
    }
}

/// Partial filter change for [`PhotoFilters::apply`].
///
/// `date_range: Some(None)` clears the window; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFilterUpdate {
    pub tags: Option<Vec<String>>,
    pub date_range: Option<Option<DateRange>>,
    pub search: Option<String>,
    pub favorites_only: Option<bool>,
}
