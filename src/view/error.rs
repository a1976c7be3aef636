//! View-level errors.
//!
//! ERROR HANDLING
//! ==============
//! A view only ever reports two kinds of failure: a read that failed
//! (`FetchError`, kept in state and rendered inline) and a write that failed
//! (`MutationError`, returned to the caller and queued as a notice). The
//! message is the one the remote sent when there is one, otherwise a fixed
//! phrase naming the operation and the entity.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::ApiError;

/// Write operations a view performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Remove,
}

impl Action {
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "delete",
        }
    }

    #[must_use]
    pub fn past(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Remove => "removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    /// The session was rejected while loading.
    pub unauthorized: bool,
}

impl FetchError {
    #[must_use]
    pub fn from_api(plural: &str, err: &ApiError) -> Self {
        Self {
            message: err.remote_message().map_or_else(|| format!("Failed to load {plural}"), str::to_owned),
            unauthorized: err.is_unauthorized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// Another mutation on the same view has not finished yet.
    #[error("request already in progress")]
    Busy,

    /// The remote rejected or never received the write.
    #[error("{message}")]
    Rejected { action: Action, message: String, unauthorized: bool },

    /// The write was refused before reaching the remote.
    #[error("{0}")]
    Invalid(String),
}

impl MutationError {
    #[must_use]
    pub fn from_api(action: Action, singular: &str, err: &ApiError) -> Self {
        Self::Rejected {
            action,
            message: err
                .remote_message()
                .map_or_else(|| failure_title(action, singular), str::to_owned),
            unauthorized: err.is_unauthorized(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { unauthorized: true, .. })
    }
}

/// "Could not create exam".
#[must_use]
pub fn failure_title(action: Action, singular: &str) -> String {
    format!("Could not {} {singular}", action.verb())
}

/// "Exam created".
#[must_use]
pub fn success_title(action: Action, singular: &str) -> String {
    let mut chars = singular.chars();
    let head: String = chars.next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
    format!("{head}{} {}", chars.as_str(), action.past())
}
