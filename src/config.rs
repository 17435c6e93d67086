use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    pub skill_config: SkillConfig,
    pub qna_config: QnaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Identity of the skill this backend answers for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Requests whose application id differs are rejected
    pub application_id: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct QnaConfig {
    #[serde(default = "default_qna_endpoint")]
    pub endpoint: String,
    pub subscription_key: String,
    pub knowledge_base_id: Uuid,
    /// Number of candidate answers requested per question
    #[serde(default = "default_top")]
    pub top: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

fn default_qna_endpoint() -> String {
    "https://westus.api.cognitive.microsoft.com/qnamaker/v2.0".to_string()
}

fn default_top() -> u32 {
    1
}

fn default_timeout_secs() -> Option<u64> {
    Some(10)
}

// Keep the subscription key out of logs
impl fmt::Debug for QnaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QnaConfig")
            .field("endpoint", &self.endpoint)
            .field("subscription_key", &"<redacted>")
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field("top", &self.top)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
        let content = substitute_env_vars(&content);

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        Ok(config)
    }
}

/// Replace `${VAR_NAME}` with the environment value; unknown names are left as-is
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static pattern is valid");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
