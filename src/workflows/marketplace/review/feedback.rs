//! External feedback generation for cover-letter reviews.
//!
//! The generator is a best-effort collaborator: the analyzer calls it at most
//! once per review, bounds it with the configured client timeout, and falls
//! back to canned text on any failure.

use serde::{Deserialize, Serialize};

use crate::config::FeedbackConfig;

use super::red_flags::RedFlag;

/// Returned to callers whenever the external generator is unavailable.
pub const FALLBACK_FEEDBACK: &str = "Unable to generate AI feedback at this time. \
Please review your cover letter for clarity and specificity.";

const MAX_COMPLETION_TOKENS: u32 = 300;
const COMPLETION_TEMPERATURE: f32 = 0.7;

/// Everything the generator needs to produce tailored suggestions.
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    pub cover_letter: String,
    pub company_name: String,
    pub job_title: String,
    pub sentiment_score: i32,
    pub red_flags: Vec<RedFlag>,
}

impl FeedbackRequest {
    /// Render the structured prompt sent to the text-completion service.
    pub fn prompt(&self) -> String {
        let red_flags = if self.red_flags.is_empty() {
            "None".to_string()
        } else {
            self.red_flags
                .iter()
                .map(|flag| flag.message())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Analyze this internship application cover letter and provide constructive \
feedback. Focus on:\n\
1. Specificity to the company and role\n\
2. Highlighting relevant experience and skills\n\
3. Enthusiasm and passion\n\
4. Structure and clarity\n\
5. Any red flags or areas for improvement\n\n\
Cover Letter:\n\"{cover_letter}\"\n\n\
Company: {company}\n\
Job Title: {title}\n\
Sentiment Score: {score}\n\
Detected Red Flags: {red_flags}\n\n\
Provide 3-5 specific, actionable suggestions for improvement. Keep the feedback \
encouraging and professional.",
            cover_letter = self.cover_letter,
            company = self.company_name,
            title = self.job_title,
            score = self.sentiment_score,
        )
    }
}

/// Failure modes of the external generator. All of them are absorbed by the
/// analyzer; none reach API callers.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback transport failed: {0}")]
    Transport(String),
    #[error("feedback service answered {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("feedback response malformed: {0}")]
    Malformed(String),
}

/// Collaborator boundary for the text-completion service.
pub trait FeedbackGenerator: Send + Sync {
    fn generate(&self, request: &FeedbackRequest) -> Result<String, FeedbackError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Production generator speaking the OpenAI chat-completions wire format.
///
/// Uses a blocking client so callers decide where the work runs; the HTTP
/// handlers move reviews onto the blocking pool.
pub struct OpenAiFeedbackGenerator {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OpenAiFeedbackGenerator {
    pub fn from_config(config: &FeedbackConfig) -> Result<Self, FeedbackError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FeedbackError::Transport(err.to_string()))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            client,
        })
    }
}

impl FeedbackGenerator for OpenAiFeedbackGenerator {
    fn generate(&self, request: &FeedbackRequest) -> Result<String, FeedbackError> {
        let payload = ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|err| FeedbackError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().unwrap_or_default();
            return Err(FeedbackError::Status { status, detail });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|err| FeedbackError::Malformed(err.to_string()))?;

        body.choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| FeedbackError::Malformed("no completion choices".to_string()))
    }
}
