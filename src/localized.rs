//! FAQ writes fanned out over the per-locale tables.
//!
//! DESIGN
//! ======
//! A FAQ is stored twice, once in `faqs_en` and once in `faqs_ar`, and the
//! two rows share an id. Every write goes to each table in `Locale::ALL`
//! order as an independent call. There is no transaction across the
//! tables: when a later locale fails, the earlier writes stay in place and
//! the error lists them so the operator can repair the pair by hand.

#[cfg(test)]
#[path = "localized_test.rs"]
mod localized_test;

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::entities::{Faq, RecordId};
use crate::locale::Locale;
use crate::net::{ApiError, Remote};

/// Shortest accepted question or answer.
pub const MIN_TEXT_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalizedWriteError {
    /// Validation failed; nothing was sent.
    #[error("{field} must be at least {MIN_TEXT_LEN} characters")]
    TooShort { field: &'static str },

    /// A table write failed. `written` lists the locales already stored.
    #[error("{locale} write failed (already written: {}): {source}", locale_list(.written))]
    Partial { locale: Locale, written: Vec<Locale>, source: ApiError },

    #[error("could not read the {locale} FAQ: {source}")]
    Fetch { locale: Locale, source: ApiError },

    #[error("FAQ {id} has no {locale} row")]
    Missing { id: RecordId, locale: Locale },
}

impl LocalizedWriteError {
    /// Locales stored before the failure; empty for validation errors.
    #[must_use]
    pub fn written(&self) -> &[Locale] {
        match self {
            Self::Partial { written, .. } => written,
            _ => &[],
        }
    }
}

fn locale_list(locales: &[Locale]) -> String {
    if locales.is_empty() {
        return "none".to_owned();
    }
    locales.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ")
}

// =============================================================================
// FORM
// =============================================================================

/// Both language versions of one FAQ as the form submits them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedFaq {
    pub question_en: String,
    pub answer_en: String,
    pub question_ar: String,
    pub answer_ar: String,
}

impl LocalizedFaq {
    /// # Errors
    ///
    /// Returns `TooShort` naming the first field under the minimum length.
    pub fn validate(&self) -> Result<(), LocalizedWriteError> {
        let fields = [
            ("question_en", &self.question_en),
            ("answer_en", &self.answer_en),
            ("question_ar", &self.question_ar),
            ("answer_ar", &self.answer_ar),
        ];
        match fields.into_iter().find(|(_, text)| text.trim().chars().count() < MIN_TEXT_LEN) {
            Some((field, _)) => Err(LocalizedWriteError::TooShort { field }),
            None => Ok(()),
        }
    }

    /// Row payload for one locale table.
    #[must_use]
    pub fn row(&self, locale: Locale) -> Value {
        let (question, answer) = match locale {
            Locale::En => (&self.question_en, &self.answer_en),
            Locale::Ar => (&self.question_ar, &self.answer_ar),
        };
        json!({ "question": question.trim(), "answer": answer.trim() })
    }

    fn set(&mut self, locale: Locale, faq: Faq) {
        match locale {
            Locale::En => {
                self.question_en = faq.question;
                self.answer_en = faq.answer;
            }
            Locale::Ar => {
                self.question_ar = faq.question;
                self.answer_ar = faq.answer;
            }
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Clone)]
pub struct FaqStore {
    remote: Arc<dyn Remote>,
}

impl FaqStore {
    #[must_use]
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self { remote }
    }

    /// # Errors
    ///
    /// Returns `TooShort` before any write, or `Partial` when a table write fails.
    pub async fn create(&self, faq: &LocalizedFaq) -> Result<(), LocalizedWriteError> {
        faq.validate()?;
        let mut written = Vec::new();
        for locale in Locale::ALL {
            let outcome = self.remote.insert(&Faq::table(locale), vec![faq.row(locale)]).await;
            record(outcome, locale, &mut written)?;
        }
        info!("FAQ created in all locales");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`FaqStore::create`].
    pub async fn update(&self, id: &RecordId, faq: &LocalizedFaq) -> Result<(), LocalizedWriteError> {
        faq.validate()?;
        let mut written = Vec::new();
        for locale in Locale::ALL {
            let outcome = self.remote.update(&Faq::table(locale), id, faq.row(locale)).await;
            record(outcome, locale, &mut written)?;
        }
        info!(%id, "FAQ updated in all locales");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Partial` when a table delete fails.
    pub async fn delete(&self, id: &RecordId) -> Result<(), LocalizedWriteError> {
        let mut written = Vec::new();
        for locale in Locale::ALL {
            let outcome = self.remote.delete(&Faq::table(locale), id).await;
            record(outcome, locale, &mut written)?;
        }
        info!(%id, "FAQ deleted in all locales");
        Ok(())
    }

    /// Load both language rows of one FAQ into the edit form.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` when a table read fails and `Missing` when a locale
    /// has no row with this id.
    pub async fn get(&self, id: &RecordId) -> Result<LocalizedFaq, LocalizedWriteError> {
        let mut form = LocalizedFaq::default();
        for locale in Locale::ALL {
            let rows = self
                .remote
                .select(&Faq::row(locale, id))
                .await
                .map_err(|source| LocalizedWriteError::Fetch { locale, source })?;
            let faq = rows
                .into_iter()
                .find_map(|row| serde_json::from_value::<Faq>(row).ok())
                .ok_or_else(|| LocalizedWriteError::Missing { id: id.clone(), locale })?;
            form.set(locale, faq);
        }
        Ok(form)
    }
}

fn record(outcome: Result<(), ApiError>, locale: Locale, written: &mut Vec<Locale>) -> Result<(), LocalizedWriteError> {
    match outcome {
        Ok(()) => {
            written.push(locale);
            Ok(())
        }
        Err(source) => {
            warn!(%locale, written = %locale_list(written), error = %source, "localized write failed");
            Err(LocalizedWriteError::Partial { locale, written: std::mem::take(written), source })
        }
    }
}
