use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::interface::{QnaClient, QnaError, QnaResult};
use crate::config::QnaConfig;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the QnA Maker `generateAnswer` endpoint
#[derive(Clone)]
pub struct QnaMakerClient {
    client: Client,
    endpoint: String,
    subscription_key: String,
    top: u32,
}

#[derive(Debug, Serialize)]
struct GenerateAnswerRequest<'a> {
    question: &'a str,
    top: u32,
}

impl QnaMakerClient {
    pub fn new(config: &QnaConfig) -> Result<Self, QnaError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            subscription_key: config.subscription_key.clone(),
            top: config.top,
        })
    }
}

#[async_trait]
impl QnaClient for QnaMakerClient {
    async fn generate_answer(
        &self,
        knowledge_base_id: Uuid,
        question: &str,
    ) -> Result<QnaResult, QnaError> {
        let url = format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.endpoint, knowledge_base_id
        );
        debug!("Querying knowledge base {}", knowledge_base_id);

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(&GenerateAnswerRequest {
                question,
                top: self.top,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QnaError::Status { status, body });
        }

        let result: QnaResult = response.json().await?;
        debug!("QnA service returned {} answers", result.answers.len());
        Ok(result)
    }
}
