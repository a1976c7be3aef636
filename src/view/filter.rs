//! Client-side predicates that derive the display list from the cache.
//!
//! DESIGN
//! ======
//! Filtering is a pure function of the cached records and `FilterParams`,
//! so the derived list is recomputed synchronously on every read and never
//! goes stale. The three predicates (text, category, date range) are
//! AND-ed; soft-deleted records are hidden only under the "all" category.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::cmp::Ordering;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::config::DEFAULT_PASS_THRESHOLD;
use crate::entities::Entity;

/// Categorical filter; `All` is the sentinel that matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a dropdown value; empty and `all` map to the sentinel.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(raw.to_owned())
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Inclusive calendar-day range, compared in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    #[must_use]
    pub fn new(from: Option<Date>, to: Option<Date>) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Records without a timestamp fall outside any bounded range.
    #[must_use]
    pub fn contains(&self, ts: Option<OffsetDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(ts) = ts else { return false };
        let day = ts.to_offset(UtcOffset::UTC).date();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(Self::Newest),
            "oldest" | "asc" => Ok(Self::Oldest),
            _ => Err(format!("unknown sort order '{s}' (expected newest or oldest)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Applied free-text query (after debounce).
    pub query: String,
    pub category: CategoryFilter,
    pub range: DateRange,
    /// Show soft-deleted records under the `All` category.
    pub show_inactive: bool,
    pub sort: Option<SortOrder>,
    /// Score at or above which a result counts as passed. Drives both the
    /// pass/fail category and the results statistics.
    pub pass_mark: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
            range: DateRange::default(),
            show_inactive: false,
            sort: None,
            pass_mark: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl FilterParams {
    #[must_use]
    pub fn matches<E: Entity>(&self, record: &E) -> bool {
        self.matches_query(record) && self.matches_category(record) && self.range.contains(record.created_at())
    }

    fn matches_query<E: Entity>(&self, record: &E) -> bool {
        let needle = self.query.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record.search_fields().iter().any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category<E: Entity>(&self, record: &E) -> bool {
        match &self.category {
            CategoryFilter::All => self.show_inactive || record.is_active(),
            CategoryFilter::Only(wanted) => record.category_under(self).is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Filter and order the cached records for display.
///
/// Insertion order is kept except where a record's display rank or the
/// requested date sort says otherwise (the sort is stable).
#[must_use]
pub fn derive<E: Entity>(records: &[E], params: &FilterParams) -> Vec<E> {
    let mut visible: Vec<E> = records.iter().filter(|record| params.matches(*record)).cloned().collect();
    visible.sort_by(|a, b| a.display_rank().cmp(&b.display_rank()).then_with(|| by_date(a, b, params.sort)));
    visible
}

fn by_date<E: Entity>(a: &E, b: &E, sort: Option<SortOrder>) -> Ordering {
    let Some(order) = sort else { return Ordering::Equal };
    match (a.created_at(), b.created_at()) {
        (Some(x), Some(y)) => match order {
            SortOrder::Newest => y.cmp(&x),
            SortOrder::Oldest => x.cmp(&y),
        },
        // undated last either way
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
