//! Headless admin client for the Utopia dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every admin screen (exams, students, results, products, orders, coupons,
//! FAQs, contact/join forms) is the same loop: fetch a list, filter it on the
//! client, open a dialog, submit, refetch. This crate holds that loop once:
//!
//! - `net`: remote access (`Remote` trait, HTTP `ApiClient`, `Session`).
//! - `entities`: one typed record per screen plus the `Entity` contract.
//! - `view`: the generic filtered list view, debounce, dialog state, stats.
//! - `bulk` / `localized`: multi-row and multi-table writes.
//! - `export`: spreadsheet projection of filtered records.

pub mod bulk;
pub mod config;
pub mod entities;
pub mod export;
pub mod locale;
pub mod localized;
pub mod net;
pub mod view;
