use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    models::{Speech, SpeechId, SpeechPatch, SpeechView},
    ports::{inbound::SpeechService, outbound::SpeechRepository},
    search::{SearchCriteria, SpeechSearchEngine},
    SpeechError,
};

pub struct SpeechServiceImpl<R> {
    repository: Arc<R>,
    search_engine: SpeechSearchEngine<R>,
}

impl<R: SpeechRepository> SpeechServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            search_engine: SpeechSearchEngine::new(Arc::clone(&repository)),
            repository,
        }
    }
}

fn to_views(speeches: Vec<Speech>) -> Vec<SpeechView> {
    speeches.into_iter().map(SpeechView::from).collect()
}

#[async_trait]
impl<R: SpeechRepository> SpeechService for SpeechServiceImpl<R> {
    async fn list_all(&self) -> Result<Vec<SpeechView>, SpeechError> {
        Ok(to_views(self.repository.find_all().await?))
    }

    async fn create(&self, view: SpeechView) -> Result<SpeechView, SpeechError> {
        let mut speech = Speech::try_from(view)?;
        speech.id = None;

        let saved = self.repository.save(speech).await?;
        tracing::info!(id = ?saved.id, "created speech");

        Ok(saved.into())
    }

    async fn find_by_id(&self, id: SpeechId) -> Result<Option<SpeechView>, SpeechError> {
        Ok(self.repository.find_by_id(id).await?.map(SpeechView::from))
    }

    async fn update(
        &self,
        id: SpeechId,
        patch: SpeechPatch,
    ) -> Result<Option<SpeechView>, SpeechError> {
        let updated = self
            .repository
            .update_with(id, Box::new(move |speech: &mut Speech| patch.apply_to(speech)))
            .await?;

        if updated.is_none() {
            tracing::debug!(%id, "update skipped, speech not found");
        }

        Ok(updated.map(SpeechView::from))
    }

    async fn delete(&self, id: SpeechId) -> Result<bool, SpeechError> {
        if !self.repository.exists_by_id(id).await? {
            return Ok(false);
        }

        self.repository.delete_by_id(id).await?;
        tracing::info!(%id, "deleted speech");
        Ok(true)
    }

    async fn search(&self, criteria: SearchCriteria) -> Result<Vec<SpeechView>, SpeechError> {
        Ok(to_views(self.search_engine.search(&criteria).await?))
    }
}
