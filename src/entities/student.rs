//! Student records.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{Entity, RecordId};
use crate::net::{Batch, Envelope, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(alias = "national_id")]
    pub national_id: i64,
    #[serde(alias = "nominal_id")]
    pub nominal_id: i64,
}

/// Creation payload; the bulk endpoint expects snake_case keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub national_id: i64,
    pub nominal_id: i64,
}

impl Entity for Student {
    const SINGULAR: &'static str = "student";
    const PLURAL: &'static str = "students";

    fn resource() -> Resource {
        Resource::rest("students")
            .with_envelope(Envelope::Data)
            .with_batch(Batch::Keyed("students"))
    }

    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Owned(self.national_id.to_string()),
            Cow::Owned(self.nominal_id.to_string()),
        ]
    }
}

impl Student {
    /// Only the name is editable after creation.
    #[must_use]
    pub fn rename_patch(name: &str) -> serde_json::Value {
        serde_json::json!({ "name": name })
    }
}
