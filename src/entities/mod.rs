//! Typed records for every admin screen.
//!
//! DESIGN
//! ======
//! `Entity` is the contract between a record type and the generic list view:
//! where the collection lives, which text fields the search box matches,
//! which field the category dropdown filters on, which timestamp the date
//! range applies to, and how the record is retired (delete or status flip).
//! Wire field names are kept as the backend sends them via serde renames.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::net::Resource;
use crate::view::FilterParams;

pub mod coupon;
pub mod exam;
pub mod faq;
pub mod forms;
pub mod order;
pub mod product;
pub mod student;
pub mod user;

pub use coupon::{Coupon, CouponStatus, NewCoupon};
pub use exam::{Exam, ExamResult, ExamSection, ExamSectionType, NewExam, NewSection, ResultAttempt, ResultsDetail};
pub use faq::Faq;
pub use forms::{ContactResponse, JoinResponse};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod};
pub use product::{NewProduct, NewProductImage, NewVariant, Product, ProductImage, ProductStatus, ProductVariant};
pub use student::{NewStudent, Student};
pub use user::NewAdmin;

// =============================================================================
// RECORD ID
// =============================================================================

/// Identifier of a record within its collection.
///
/// Table rows use integer keys, REST resources use opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    /// Integers become `Int`, anything else stays text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<i64>().map_or_else(|_| Self::Text(s.to_owned()), Self::Int))
    }
}

// =============================================================================
// ENTITY
// =============================================================================

pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Lower-case singular noun used in notices ("exam").
    const SINGULAR: &'static str;
    /// Lower-case plural noun used in notices ("exams").
    const PLURAL: &'static str;

    fn resource() -> Resource;

    fn id(&self) -> RecordId;

    /// Text fields the free-text query matches against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Value the categorical filter compares with.
    fn category(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Category under the given filter settings. Override this instead of
    /// `category` when the category depends on a setting (the pass mark).
    fn category_under(&self, _filter: &FilterParams) -> Option<Cow<'_, str>> {
        self.category()
    }

    /// Timestamp the date-range filter applies to.
    fn created_at(&self) -> Option<OffsetDateTime> {
        None
    }

    /// False for soft-deleted records.
    fn is_active(&self) -> bool {
        true
    }

    /// Patch that retires a record instead of deleting it.
    fn soft_delete_patch() -> Option<Value> {
        None
    }

    /// Records with a higher rank sort after lower ones.
    fn display_rank(&self) -> u8 {
        0
    }
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00.123456+00:00`) and offset-less
/// ISO 8601, which is read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).ok().map(PrimitiveDateTime::assume_utc))
}

/// Format a backend timestamp as `DD/MM/YYYY`; empty when unparseable.
#[must_use]
pub fn format_dmy(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|ts| ts.date().format(format_description!("[day]/[month]/[year]")).ok())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
