use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answers returned for one question, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QnaResult {
    #[serde(default)]
    pub answers: Vec<QnaAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QnaAnswer {
    pub answer: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum QnaError {
    #[error("request to QnA service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("QnA service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("QnA service returned no answers")]
    EmptyAnswerList,
}

impl QnaResult {
    pub fn first_answer(&self) -> Result<&str, QnaError> {
        self.answers
            .first()
            .map(|a| a.answer.as_str())
            .ok_or(QnaError::EmptyAnswerList)
    }
}

/// Question-answering service queried for free-text intents
#[async_trait]
pub trait QnaClient: Send + Sync {
    async fn generate_answer(
        &self,
        knowledge_base_id: Uuid,
        question: &str,
    ) -> Result<QnaResult, QnaError>;
}
