//! FAQ rows. Each FAQ exists once per locale table; see `crate::localized`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{Entity, RecordId};
use crate::locale::Locale;
use crate::net::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub question: String,
    pub answer: String,
}

impl Faq {
    /// Table holding the FAQ rows of one locale.
    #[must_use]
    pub fn table(locale: Locale) -> Resource {
        Resource::table(format!("faqs_{locale}"))
    }

    /// One row of a locale table, selected with `id=eq.{id}`.
    #[must_use]
    pub fn row(locale: Locale, id: &RecordId) -> Resource {
        Self::table(locale).keyed_by("id").scoped(id.to_string())
    }
}

/// The list screen shows the English table.
impl Entity for Faq {
    const SINGULAR: &'static str = "FAQ";
    const PLURAL: &'static str = "FAQs";

    fn resource() -> Resource {
        Self::table(Locale::En)
    }

    fn id(&self) -> RecordId {
        self.id.map_or_else(|| RecordId::Text(String::new()), RecordId::Int)
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.question.as_str()), Cow::Borrowed(self.answer.as_str())]
    }
}
