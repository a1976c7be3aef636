//! Responses submitted through the public contact and join-us forms.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

use super::{Entity, RecordId, parse_timestamp};
use crate::net::Resource;

pub const VISIBLE: &str = "visible";
pub const HIDDEN: &str = "hidden";

// =============================================================================
// CONTACT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hide: bool,
    pub created_at: String,
}

impl ContactResponse {
    #[must_use]
    pub fn visibility_patch(hide: bool) -> Value {
        json!({ "hide": hide })
    }
}

impl Entity for ContactResponse {
    const SINGULAR: &'static str = "contact response";
    const PLURAL: &'static str = "contact responses";

    fn resource() -> Resource {
        Resource::table("contact_responses")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
        ]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if self.hide { HIDDEN } else { VISIBLE }))
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }

    fn is_active(&self) -> bool {
        !self.hide
    }

    fn soft_delete_patch() -> Option<Value> {
        Some(Self::visibility_patch(true))
    }
}

// =============================================================================
// JOIN US
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub major: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

impl JoinResponse {
    #[must_use]
    pub fn note_patch(note: &str) -> Value {
        json!({ "note": note })
    }
}

impl Entity for JoinResponse {
    const SINGULAR: &'static str = "application";
    const PLURAL: &'static str = "applications";

    fn resource() -> Resource {
        Resource::table("join_responses")
    }

    fn id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
            Cow::Borrowed(self.university.as_str()),
        ]
    }

    fn category(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.major.as_str()))
    }

    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}
