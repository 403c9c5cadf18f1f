//! Speech repository port (outbound).
//!
//! Defines the storage operations the service and the search engine rely on.

use std::collections::HashSet;

use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{Speech, SpeechId},
    SpeechError,
};

/// In-place modification applied by [`SpeechRepository::update_with`].
pub type SpeechMerge = Box<dyn FnOnce(&mut Speech) + Send>;

/// Outbound port for speech persistence.
///
/// Substring lookups are case-insensitive and match user input literally.
/// Date lookups are inclusive and never match records without a date.
#[async_trait]
pub trait SpeechRepository: Send + Sync + 'static {
    /// All stored speeches, in storage order.
    async fn find_all(&self) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_id(&self, id: SpeechId) -> Result<Option<Speech>, SpeechError>;

    /// Insert or overwrite a speech.
    ///
    /// A speech without an id gets a fresh one. A speech carrying the id of
    /// a stored record replaces it. A speech carrying an unknown id is stored
    /// under a fresh id, so deleted ids never come back.
    async fn save(&self, speech: Speech) -> Result<Speech, SpeechError>;

    async fn exists_by_id(&self, id: SpeechId) -> Result<bool, SpeechError>;

    /// Remove a speech. Does nothing when the id is unknown.
    async fn delete_by_id(&self, id: SpeechId) -> Result<(), SpeechError>;

    /// Bulk fetch. Unknown ids are skipped.
    async fn find_all_by_id(&self, ids: &HashSet<SpeechId>) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_author_containing(&self, author: &str) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_speech_date_between(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_speech_date_from(&self, from: Date) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_speech_date_until(&self, to: Date) -> Result<Vec<Speech>, SpeechError>;

    async fn find_by_text_containing(&self, text: &str) -> Result<Vec<Speech>, SpeechError>;

    /// Speeches where at least one keyword contains `keyword`.
    async fn find_by_keyword_containing(&self, keyword: &str)
        -> Result<Vec<Speech>, SpeechError>;

    /// Load, modify and store a speech as one unit of work.
    ///
    /// Returns `None` without writing when the id is unknown. No other writer
    /// can change the record between the read and the write.
    async fn update_with(
        &self,
        id: SpeechId,
        merge: SpeechMerge,
    ) -> Result<Option<Speech>, SpeechError>;
}
