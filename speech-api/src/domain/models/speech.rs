use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use super::SpeechId;

/// Calendar date format used on the wire (`2024-01-15`).
pub const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A speech record.
///
/// `id` is `None` until the record has been saved once. `text` and `author`
/// are required, everything else is optional metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speech {
    pub id: Option<SpeechId>,
    pub text: String,
    pub author: String,
    pub author_email: Option<String>,
    pub keywords: BTreeSet<String>,
    pub speech_date: Option<Date>,
}

#[allow(dead_code)]
impl Speech {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            author: author.into(),
            author_email: None,
            keywords: BTreeSet::new(),
            speech_date: None,
        }
    }

    pub fn with_id(mut self, id: SpeechId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_author_email(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_speech_date(mut self, date: Date) -> Self {
        self.speech_date = Some(date);
        self
    }
}

/// Wire representation of a speech, used for responses as well as create and
/// update payloads. Every field is optional so the same shape can carry a
/// partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechView {
    #[serde(default)]
    pub id: Option<SpeechId>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default, with = "iso_date::option")]
    pub speech_date: Option<Date>,
}

/// Field-level partial update.
///
/// `None` leaves the stored value untouched, `Some` replaces it wholesale.
/// For `keywords` that means the whole set is swapped, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechPatch {
    pub text: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub keywords: Option<BTreeSet<String>>,
    pub speech_date: Option<Date>,
}

impl SpeechPatch {
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.author.is_none()
            && self.author_email.is_none()
            && self.keywords.is_none()
            && self.speech_date.is_none()
    }

    pub fn apply_to(self, speech: &mut Speech) {
        if let Some(text) = self.text {
            speech.text = text;
        }
        if let Some(author) = self.author {
            speech.author = author;
        }
        if let Some(author_email) = self.author_email {
            speech.author_email = Some(author_email);
        }
        if let Some(keywords) = self.keywords {
            speech.keywords = keywords;
        }
        if let Some(speech_date) = self.speech_date {
            speech.speech_date = Some(speech_date);
        }
    }
}
