use std::sync::Arc;

use crate::config::Config;
use crate::qna::{QnaClient, QnaMakerClient};
use crate::skill::SkillDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<SkillDispatcher>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let qna = Arc::new(QnaMakerClient::new(&config.qna_config)?);
        Ok(Self::with_qna_client(config, qna))
    }

    pub fn with_qna_client(config: &Config, qna: Arc<dyn QnaClient>) -> Self {
        let dispatcher = SkillDispatcher::new(
            config.skill_config.application_id.clone(),
            config.qna_config.knowledge_base_id,
            qna,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
