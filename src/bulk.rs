//! Multi-row creation: student import, coupon batches, variant size presets
//! and exam section bulk add.
//!
//! DESIGN
//! ======
//! Each bulk flow is split into a pure builder that turns operator input
//! into creation payloads (and rejects bad input before anything is sent)
//! and a thin async wrapper that hands the payloads to a `ListView`, which
//! batches them according to the entity's resource.

#[cfg(test)]
#[path = "bulk_test.rs"]
mod bulk_test;

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::info;
use uuid::Uuid;

use crate::entities::{
    Coupon, ExamSection, ExamSectionType, NewCoupon, NewSection, NewStudent, NewVariant, ProductVariant, Student,
};
use crate::view::{ListView, MutationError};

/// Sizes offered by both variant presets.
pub const PRESET_SIZES: RangeInclusive<u32> = 36..=45;

const CODE_SUFFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkError {
    /// A student line does not have three comma-separated fields.
    #[error("line {line}: expected name,national_id,nominal_id")]
    MissingField { line: usize },

    #[error("line {line}: name is empty")]
    EmptyName { line: usize },

    /// A numeric student field did not parse.
    #[error("line {line}: {field} '{value}' is not a number")]
    InvalidNumber { line: usize, field: &'static str, value: String },

    #[error("nothing to import")]
    Empty,

    #[error("coupon code must not be empty")]
    EmptyCode,

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error(transparent)]
    Write(#[from] MutationError),
}

// =============================================================================
// STUDENTS
// =============================================================================

/// Parse `name,national_id,nominal_id` lines. Blank lines are skipped; any
/// malformed line rejects the whole import.
///
/// # Errors
///
/// Returns the first malformed line (1-based) or `Empty` when no line
/// holds a student.
pub fn parse_student_lines(text: &str) -> Result<Vec<NewStudent>, BulkError> {
    let mut students = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let mut fields = raw.split(',');
        let (Some(name), Some(national), Some(nominal)) = (fields.next(), fields.next(), fields.next()) else {
            return Err(BulkError::MissingField { line });
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(BulkError::EmptyName { line });
        }
        students.push(NewStudent {
            name: name.to_owned(),
            national_id: parse_number(line, "national_id", national)?,
            nominal_id: parse_number(line, "nominal_id", nominal)?,
        });
    }
    if students.is_empty() {
        return Err(BulkError::Empty);
    }
    Ok(students)
}

fn parse_number(line: usize, field: &'static str, raw: &str) -> Result<i64, BulkError> {
    let raw = raw.trim();
    raw.parse().map_err(|_| BulkError::InvalidNumber { line, field, value: raw.to_owned() })
}

/// Parse and submit a student import in one keyed bulk call.
///
/// # Errors
///
/// Returns a parse error before anything is sent, or the write failure.
pub async fn import_students(view: &ListView<Student>, text: &str) -> Result<usize, BulkError> {
    let students = parse_student_lines(text)?;
    view.create_many(&students).await?;
    info!(count = students.len(), "students imported");
    Ok(students.len())
}

// =============================================================================
// COUPONS
// =============================================================================

/// Shared fields of every coupon in a batch; `code` is the prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponTemplate {
    pub code: String,
    pub amount: f64,
    pub max_discount: f64,
    pub min_purchase: f64,
    pub is_percentage: bool,
}

/// `{prefix}-{last 4 hex chars of a v4 UUID}`.
#[must_use]
pub fn unique_code(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let suffix = &id[id.len() - CODE_SUFFIX_LEN..];
    format!("{prefix}-{suffix}")
}

/// Expand a template into `quantity` coupons with distinct codes.
///
/// # Errors
///
/// Rejects an empty prefix or a zero quantity.
pub fn coupon_batch(template: &CouponTemplate, quantity: usize) -> Result<Vec<NewCoupon>, BulkError> {
    let prefix = template.code.trim();
    if prefix.is_empty() {
        return Err(BulkError::EmptyCode);
    }
    if quantity == 0 {
        return Err(BulkError::ZeroQuantity);
    }
    Ok((0..quantity)
        .map(|_| NewCoupon {
            amount: template.amount,
            max_discount: template.max_discount,
            min_purchase: template.min_purchase,
            is_percentage: template.is_percentage,
            code: unique_code(prefix),
        })
        .collect())
}

/// Build and insert a coupon batch. Returns the generated codes.
///
/// # Errors
///
/// Returns a validation error before anything is sent, or the write failure.
pub async fn create_coupons(
    view: &ListView<Coupon>,
    template: &CouponTemplate,
    quantity: usize,
) -> Result<Vec<String>, BulkError> {
    let coupons = coupon_batch(template, quantity)?;
    view.create_many(&coupons).await?;
    info!(count = coupons.len(), prefix = %template.code, "coupons created");
    Ok(coupons.into_iter().map(|c| c.code).collect())
}

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    Shoes,
    Apparel,
}

impl SizePreset {
    #[must_use]
    pub fn sizes(self) -> RangeInclusive<u32> {
        match self {
            Self::Shoes | Self::Apparel => PRESET_SIZES,
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shoes => "shoes",
            Self::Apparel => "apparel",
        })
    }
}

impl FromStr for SizePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shoes" => Ok(Self::Shoes),
            "apparel" => Ok(Self::Apparel),
            _ => Err(format!("unknown size preset '{s}' (expected shoes or apparel)")),
        }
    }
}

#[must_use]
pub fn variant_preset(product_id: i64, preset: SizePreset, stock_quantity: i64) -> Vec<NewVariant> {
    preset
        .sizes()
        .map(|size| NewVariant { size: size.to_string(), stock_quantity, product_id })
        .collect()
}

/// Insert every size of a preset for the view's product.
///
/// # Errors
///
/// Returns the write failure.
pub async fn apply_preset(
    view: &ListView<ProductVariant>,
    product_id: i64,
    preset: SizePreset,
    stock_quantity: i64,
) -> Result<usize, BulkError> {
    let variants = variant_preset(product_id, preset, stock_quantity);
    view.create_many(&variants).await?;
    info!(product_id, %preset, count = variants.len(), "variant preset applied");
    Ok(variants.len())
}

// =============================================================================
// EXAM SECTIONS
// =============================================================================

#[must_use]
pub fn section_rows(types: &[ExamSectionType]) -> Vec<NewSection> {
    types.iter().map(|kind| NewSection { kind: *kind }).collect()
}

/// Add sections to the view's exam in one bulk call; an empty selection
/// sends nothing.
///
/// # Errors
///
/// Returns the write failure.
pub async fn add_sections(view: &ListView<ExamSection>, types: &[ExamSectionType]) -> Result<usize, BulkError> {
    if types.is_empty() {
        return Ok(0);
    }
    let rows = section_rows(types);
    view.create_many(&rows).await?;
    Ok(rows.len())
}
