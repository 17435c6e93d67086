use serde::{Deserialize, Serialize};

pub const LAUNCH_TEXT: &str = "Launch response";
pub const AUDIO_PLAYER_TEXT: &str = "Audio player response";
pub const APOLOGY_TEXT: &str = "I'm sorry, something went wrong.";

/// Response envelope returned to the voice platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl SkillResponse {
    /// Speak `text` and end the session
    pub fn tell(text: &str) -> Self {
        Self {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: OutputSpeech::Ssml { ssml: to_ssml(text) },
                should_end_session: true,
            },
        }
    }

    pub fn ssml(&self) -> &str {
        match &self.response.output_speech {
            OutputSpeech::Ssml { ssml } => ssml,
        }
    }
}

/// Wrap plain text in a `<speak>` document, escaping markup characters
pub fn to_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 15);
    out.push_str("<speak>");
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out.push_str("</speak>");
    out
}
