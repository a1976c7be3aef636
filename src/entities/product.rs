//! Shop products with their images and size variants.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Entity, RecordId};
use crate::net::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Available,
    Sold,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Sold => "SOLD",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "SOLD" => Ok(Self::Sold),
            other => Err(format!("unknown product status '{other}'")),
        }
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub sale_price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<i64>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub sale_price: f64,
    pub image: String,
    pub category: i64,
    pub status: ProductStatus,
}

impl Entity for Product {
    const SINGULAR: &'static str = "product";
    const PLURAL: &'static str = "products";

    fn resource() -> Resource {
        Resource::table("products")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str()), Cow::Borrowed(self.description.as_str())]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.status.as_str()))
    }

    fn is_active(&self) -> bool {
        self.status != ProductStatus::Sold.as_str()
    }

    /// Removing a product marks it sold; order history keeps referencing it.
    fn soft_delete_patch() -> Option<Value> {
        Some(json!({ "status": ProductStatus::Sold }))
    }

    fn display_rank(&self) -> u8 {
        u8::from(!self.is_active())
    }
}

// =============================================================================
// IMAGES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    #[serde(default)]
    pub alt: String,
    pub url: String,
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductImage {
    pub alt: String,
    pub url: String,
    pub product_id: i64,
}

impl Entity for ProductImage {
    const SINGULAR: &'static str = "image";
    const PLURAL: &'static str = "images";

    fn resource() -> Resource {
        Resource::table("product_images").keyed_by("productId")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.alt.as_str()), Cow::Borrowed(self.url.as_str())]
    }
}

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: i64,
    pub size: String,
    pub stock_quantity: i64,
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    pub size: String,
    pub stock_quantity: i64,
    pub product_id: i64,
}

impl Entity for ProductVariant {
    const SINGULAR: &'static str = "variant";
    const PLURAL: &'static str = "variants";

    fn resource() -> Resource {
        Resource::table("product_variants").keyed_by("productId")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.size.as_str())]
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod product_test;
