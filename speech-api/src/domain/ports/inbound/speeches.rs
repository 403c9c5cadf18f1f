use async_trait::async_trait;

use crate::domain::{
    models::{SpeechId, SpeechPatch, SpeechView},
    search::SearchCriteria,
    SpeechError,
};

/// Inbound port for speech operations.
///
/// This trait defines the use cases that HTTP handlers can invoke.
/// Missing records are reported as `None`/`false`, never as errors.
#[async_trait]
pub trait SpeechService: Send + Sync + 'static {
    /// Every stored speech, in storage order.
    async fn list_all(&self) -> Result<Vec<SpeechView>, SpeechError>;

    /// Persist a new speech. Any id on the view is ignored.
    async fn create(&self, view: SpeechView) -> Result<SpeechView, SpeechError>;

    async fn find_by_id(&self, id: SpeechId) -> Result<Option<SpeechView>, SpeechError>;

    /// Apply a partial update. Returns `None` when the speech does not exist.
    async fn update(
        &self,
        id: SpeechId,
        patch: SpeechPatch,
    ) -> Result<Option<SpeechView>, SpeechError>;

    /// Returns `true` if a speech was removed.
    async fn delete(&self, id: SpeechId) -> Result<bool, SpeechError>;

    /// Speeches matching every supplied criterion.
    async fn search(&self, criteria: SearchCriteria) -> Result<Vec<SpeechView>, SpeechError>;
}
