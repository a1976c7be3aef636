//! Remote data access.
//!
//! `Remote` is the seam every view talks through; `ApiClient` implements it
//! over HTTP, and tests swap in an in-memory double.

pub mod api;
pub mod error;
pub mod remote;
pub mod session;

#[cfg(test)]
pub(crate) mod memory;

pub use api::ApiClient;
pub use error::ApiError;
pub use remote::{Batch, Dialect, Envelope, Remote, Resource};
pub use session::Session;
