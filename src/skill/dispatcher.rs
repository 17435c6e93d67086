use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::SkillError;
use super::request::{IntentPayload, RequestKind, SkillRequest};
use super::response::{SkillResponse, APOLOGY_TEXT, AUDIO_PLAYER_TEXT, LAUNCH_TEXT};
use crate::qna::QnaClient;

pub const CATCH_ALL_INTENT: &str = "CatchAllIntent";
pub const PHRASE_SLOT: &str = "phrase";

/// Routes verified skill requests to their responses
pub struct SkillDispatcher {
    application_id: String,
    knowledge_base_id: Uuid,
    qna: Arc<dyn QnaClient>,
}

impl SkillDispatcher {
    pub fn new(application_id: String, knowledge_base_id: Uuid, qna: Arc<dyn QnaClient>) -> Self {
        Self {
            application_id,
            knowledge_base_id,
            qna,
        }
    }

    /// Only `SkillError::Unauthorized` escapes; every other failure becomes the apology.
    pub async fn handle_request(&self, request: &SkillRequest) -> Result<SkillResponse, SkillError> {
        if request.application_id() != Some(self.application_id.as_str()) {
            warn!(
                "Rejecting request {:?} from unknown application",
                request.request.request_id
            );
            return Err(SkillError::Unauthorized);
        }

        debug!(
            "Handling {} (request_id={:?}, locale={:?}, timestamp={:?})",
            request.request.kind.type_name(),
            request.request.request_id,
            request.request.locale,
            request.request.parsed_timestamp(),
        );

        match self.dispatch(&request.request.kind).await {
            Ok(response) => {
                debug!("Responding with {}", response.ssml());
                Ok(response)
            }
            Err(e) => {
                warn!("Answering with error response: {}", e);
                Ok(Self::error_response())
            }
        }
    }

    async fn dispatch(&self, kind: &RequestKind) -> Result<SkillResponse, SkillError> {
        match kind {
            RequestKind::Launch => Ok(SkillResponse::tell(LAUNCH_TEXT)),
            RequestKind::AudioPlayer(_) => Ok(SkillResponse::tell(AUDIO_PLAYER_TEXT)),
            RequestKind::Intent(intent) => self.handle_intent(intent).await,
            RequestKind::Other(t) => Err(SkillError::UnrecognizedRequestType(t.clone())),
        }
    }

    pub async fn handle_intent(&self, intent: &IntentPayload) -> Result<SkillResponse, SkillError> {
        if intent.name != CATCH_ALL_INTENT {
            return Err(SkillError::UnrecognizedIntent(intent.name.clone()));
        }

        let phrase = intent
            .slot_value(PHRASE_SLOT)
            .ok_or_else(|| SkillError::MissingSlot(PHRASE_SLOT.to_string()))?;

        let result = self
            .qna
            .generate_answer(self.knowledge_base_id, phrase)
            .await?;
        let answer = result.first_answer()?;

        Ok(SkillResponse::tell(answer))
    }

    pub fn error_response() -> SkillResponse {
        SkillResponse::tell(APOLOGY_TEXT)
    }
}
