//! Discount coupons.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

use super::{Entity, RecordId, parse_timestamp};
use crate::net::{Batch, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CouponStatus {
    Available,
    Gifted,
}

impl CouponStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Gifted => "GIFTED",
        }
    }
}

impl fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "GIFTED" => Ok(Self::Gifted),
            _ => Err(format!("unknown coupon status '{s}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    #[serde(default, rename = "created_at")]
    pub created_at: Option<String>,
    pub amount: f64,
    pub max_discount: f64,
    pub min_purchase: f64,
    pub is_percentage: bool,
    pub code: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    pub amount: f64,
    pub max_discount: f64,
    pub min_purchase: f64,
    pub is_percentage: bool,
    pub code: String,
}

impl Coupon {
    /// Rows without a status are treated as available.
    #[must_use]
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(CouponStatus::Available.as_str())
    }

    #[must_use]
    pub fn status_patch(status: CouponStatus) -> Value {
        json!({ "status": status })
    }
}

impl Entity for Coupon {
    const SINGULAR: &'static str = "coupon";
    const PLURAL: &'static str = "coupons";

    /// Coupons are inserted one row per request.
    fn resource() -> Resource {
        Resource::table("coupons").with_batch(Batch::PerItem)
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.code.as_str())]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status_or_default()))
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    fn is_active(&self) -> bool {
        self.status_or_default() == CouponStatus::Available.as_str()
    }

    /// A removed coupon is handed out rather than destroyed.
    fn soft_delete_patch() -> Option<Value> {
        Some(Self::status_patch(CouponStatus::Gifted))
    }
}
