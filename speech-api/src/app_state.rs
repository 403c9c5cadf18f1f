use std::sync::Arc;

use crate::domain::ports::inbound::SpeechService;

#[derive(Clone)]
pub struct AppState {
    pub speech_service: Arc<dyn SpeechService>,
}

impl AppState {
    pub fn new(speech_service: Arc<dyn SpeechService>) -> Self {
        Self { speech_service }
    }
}
