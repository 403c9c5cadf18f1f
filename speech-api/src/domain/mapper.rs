//! Conversions between the wire view and the domain entity.

use std::collections::BTreeSet;

use super::{
    models::{Speech, SpeechPatch, SpeechView},
    SpeechError,
};

impl From<&Speech> for SpeechView {
    fn from(speech: &Speech) -> Self {
        Self {
            id: speech.id,
            text: Some(speech.text.clone()),
            author: Some(speech.author.clone()),
            author_email: speech.author_email.clone(),
            keywords: Some(speech.keywords.iter().cloned().collect()),
            speech_date: speech.speech_date,
        }
    }
}

impl From<Speech> for SpeechView {
    fn from(speech: Speech) -> Self {
        Self {
            id: speech.id,
            text: Some(speech.text),
            author: Some(speech.author),
            author_email: speech.author_email,
            keywords: Some(speech.keywords.into_iter().collect()),
            speech_date: speech.speech_date,
        }
    }
}

impl TryFrom<SpeechView> for Speech {
    type Error = SpeechError;

    /// Builds an entity from a view. The id is copied through as-is, so a view
    /// without one yields an unsaved record. An absent keyword list becomes an
    /// empty set.
    fn try_from(view: SpeechView) -> Result<Self, Self::Error> {
        let text = view
            .text
            .ok_or_else(|| SpeechError::validation("text is required"))?;
        let author = view
            .author
            .ok_or_else(|| SpeechError::validation("author is required"))?;

        Ok(Self {
            id: view.id,
            text,
            author,
            author_email: view.author_email,
            keywords: collect_keywords(view.keywords.unwrap_or_default()),
            speech_date: view.speech_date,
        })
    }
}

impl From<SpeechView> for SpeechPatch {
    fn from(view: SpeechView) -> Self {
        Self {
            text: view.text,
            author: view.author,
            author_email: view.author_email,
            keywords: view.keywords.map(collect_keywords),
            speech_date: view.speech_date,
        }
    }
}

fn collect_keywords(keywords: Vec<String>) -> BTreeSet<String> {
    keywords.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SpeechId;
    use time::macros::date;

    fn full_view() -> SpeechView {
        SpeechView {
            id: Some(SpeechId::new(3)),
            text: Some("Speech about technology and innovation".to_string()),
            author: Some("John Miller".to_string()),
            author_email: Some("miller@example.com".to_string()),
            keywords: Some(vec!["tech".to_string(), "future".to_string()]),
            speech_date: Some(date!(2024 - 03 - 10)),
        }
    }

    #[test]
    fn view_to_speech_and_back_keeps_fields() {
        let speech = Speech::try_from(full_view()).unwrap();
        assert_eq!(speech.id, Some(SpeechId::new(3)));
        assert_eq!(speech.author, "John Miller");
        assert_eq!(speech.keywords.len(), 2);

        let mut view = SpeechView::from(&speech);
        view.keywords.as_mut().unwrap().sort();
        let mut expected = full_view();
        expected.keywords.as_mut().unwrap().sort();
        assert_eq!(view, expected);
    }

    #[test]
    fn missing_keywords_become_empty_set() {
        let view = SpeechView {
            keywords: None,
            ..full_view()
        };
        let speech = Speech::try_from(view).unwrap();
        assert!(speech.keywords.is_empty());

        let back = SpeechView::from(speech);
        assert_eq!(back.keywords, Some(vec![]));
    }

    #[test]
    fn duplicate_keywords_collapse() {
        let view = SpeechView {
            keywords: Some(vec!["tech".into(), "tech".into(), "ai".into()]),
            ..full_view()
        };
        let speech = Speech::try_from(view).unwrap();
        assert_eq!(speech.keywords.len(), 2);
    }

    #[test]
    fn absent_id_stays_absent() {
        let view = SpeechView {
            id: None,
            ..full_view()
        };
        assert!(Speech::try_from(view).unwrap().id.is_none());
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let no_text = SpeechView {
            text: None,
            ..full_view()
        };
        assert!(matches!(
            Speech::try_from(no_text),
            Err(SpeechError::Validation(_))
        ));

        let no_author = SpeechView {
            author: None,
            ..full_view()
        };
        assert!(matches!(
            Speech::try_from(no_author),
            Err(SpeechError::Validation(_))
        ));
    }

    #[test]
    fn absent_input_maps_to_absent_output() {
        let speech: Option<Speech> = None;
        assert!(speech.as_ref().map(SpeechView::from).is_none());
    }

    #[test]
    fn patch_distinguishes_supplied_empty_keywords_from_absent() {
        let absent = SpeechPatch::from(SpeechView::default());
        assert!(absent.keywords.is_none());
        assert!(absent.is_empty());

        let empty = SpeechPatch::from(SpeechView {
            keywords: Some(vec![]),
            ..Default::default()
        });
        assert_eq!(empty.keywords, Some(BTreeSet::new()));
    }

    #[test]
    fn patch_ignores_view_id() {
        let patch = SpeechPatch::from(full_view());
        assert_eq!(patch.author.as_deref(), Some("John Miller"));
        assert_eq!(patch.speech_date, Some(date!(2024 - 03 - 10)));
    }
}
