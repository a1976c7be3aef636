//! Shop orders and their line items.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

use super::{Entity, RecordId, parse_timestamp};
use crate::net::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Shipping,
    Finished,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [Self::Placed, Self::Shipping, Self::Finished, Self::Canceled];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Shipping => "SHIPPING",
            Self::Finished => "FINISHED",
            Self::Canceled => "CANCELED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cod,
    Cliq,
    Other,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Cliq => "CLIQ",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COD" => Ok(Self::Cod),
            "CLIQ" => Ok(Self::Cliq),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("unknown payment method '{s}'")),
        }
    }
}

// =============================================================================
// ORDER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub payment_method: String,
    pub total: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "cartId")]
    pub cart_id: i64,
    pub created_at: String,
}

impl Order {
    #[must_use]
    pub fn status_patch(status: OrderStatus) -> Value {
        json!({ "status": status })
    }

    #[must_use]
    pub fn payment_patch(method: PaymentMethod) -> Value {
        json!({ "payment_method": method })
    }
}

impl Entity for Order {
    const SINGULAR: &'static str = "order";
    const PLURAL: &'static str = "orders";

    fn resource() -> Resource {
        Resource::table("orders")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str())]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status.as_str()))
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

// =============================================================================
// ORDER ITEMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub variant_id: i64,
    pub quantity: i64,
    pub price: f64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub cart_id: Option<i64>,
}

impl OrderItem {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl Entity for OrderItem {
    const SINGULAR: &'static str = "order item";
    const PLURAL: &'static str = "order items";

    fn resource() -> Resource {
        Resource::table("order_items").keyed_by("cartId")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str())]
    }
}
