//! In-memory implementation of the SpeechRepository port.

use std::collections::{BTreeMap, HashSet};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;

use crate::domain::{
    models::{Speech, SpeechId},
    ports::outbound::{SpeechMerge, SpeechRepository},
    SpeechError,
};

/// Speech repository backed by an ordered in-memory map.
///
/// Ids are handed out sequentially starting at 1 and are never reused.
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemorySpeechRepository {
    speeches: Arc<RwLock<BTreeMap<SpeechId, Speech>>>,
    last_id: Arc<AtomicI64>,
    #[cfg(test)]
    bulk_fetches: Arc<std::sync::atomic::AtomicUsize>,
}

impl InMemorySpeechRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository. Speeches without an id are assigned one in order.
    #[allow(dead_code)]
    pub fn with_speeches(speeches: impl IntoIterator<Item = Speech>) -> Self {
        let repo = Self::new();
        let mut map = BTreeMap::new();
        for speech in speeches {
            let speech = repo.assign_id(speech);
            if let Some(id) = speech.id {
                map.insert(id, speech);
            }
        }

        Self {
            speeches: Arc::new(RwLock::new(map)),
            ..repo
        }
    }

    fn assign_id(&self, mut speech: Speech) -> Speech {
        match speech.id {
            Some(id) => {
                self.last_id.fetch_max(id.as_i64(), Ordering::SeqCst);
            }
            None => {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                speech.id = Some(SpeechId::new(id));
            }
        }
        speech
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Speech>
    where
        F: Fn(&Speech) -> bool,
    {
        self.speeches
            .read()
            .await
            .values()
            .filter(|speech| predicate(speech))
            .cloned()
            .collect()
    }

    /// Number of bulk fetches served so far.
    #[cfg(test)]
    pub fn bulk_fetch_count(&self) -> usize {
        self.bulk_fetches.load(Ordering::SeqCst)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl SpeechRepository for InMemorySpeechRepository {
    async fn find_all(&self) -> Result<Vec<Speech>, SpeechError> {
        Ok(self.speeches.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: SpeechId) -> Result<Option<Speech>, SpeechError> {
        Ok(self.speeches.read().await.get(&id).cloned())
    }

    async fn save(&self, mut speech: Speech) -> Result<Speech, SpeechError> {
        let mut speeches = self.speeches.write().await;

        // Unknown ids are never reused; the record is stored under a fresh one.
        if speech.id.is_some_and(|id| !speeches.contains_key(&id)) {
            speech.id = None;
        }

        let speech = self.assign_id(speech);
        let id = speech
            .id
            .ok_or_else(|| SpeechError::storage("speech was not assigned an id"))?;

        speeches.insert(id, speech.clone());
        Ok(speech)
    }

    async fn exists_by_id(&self, id: SpeechId) -> Result<bool, SpeechError> {
        Ok(self.speeches.read().await.contains_key(&id))
    }

    async fn delete_by_id(&self, id: SpeechId) -> Result<(), SpeechError> {
        self.speeches.write().await.remove(&id);
        Ok(())
    }

    async fn find_all_by_id(&self, ids: &HashSet<SpeechId>) -> Result<Vec<Speech>, SpeechError> {
        #[cfg(test)]
        self.bulk_fetches.fetch_add(1, Ordering::SeqCst);

        let speeches = self.speeches.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| speeches.get(id).cloned())
            .collect())
    }

    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| contains_ignore_case(&speech.author, author))
            .await)
    }

    async fn find_by_speech_date_between(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| {
                speech
                    .speech_date
                    .is_some_and(|date| date >= from && date <= to)
            })
            .await)
    }

    async fn find_by_speech_date_from(&self, from: Date) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| speech.speech_date.is_some_and(|date| date >= from))
            .await)
    }

    async fn find_by_speech_date_until(&self, to: Date) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| speech.speech_date.is_some_and(|date| date <= to))
            .await)
    }

    async fn find_by_text_containing(&self, text: &str) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| contains_ignore_case(&speech.text, text))
            .await)
    }

    async fn find_by_keyword_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Speech>, SpeechError> {
        Ok(self
            .filter(|speech| {
                speech
                    .keywords
                    .iter()
                    .any(|candidate| contains_ignore_case(candidate, keyword))
            })
            .await)
    }

    async fn update_with(
        &self,
        id: SpeechId,
        merge: SpeechMerge,
    ) -> Result<Option<Speech>, SpeechError> {
        let mut speeches = self.speeches.write().await;
        let Some(speech) = speeches.get_mut(&id) else {
            return Ok(None);
        };

        merge(speech);
        speech.id = Some(id);
        Ok(Some(speech.clone()))
    }
}
