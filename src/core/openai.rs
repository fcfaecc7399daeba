use crate::core::credentials::Credential;
use crate::domain::model::{Answers, ChatMessage};
use crate::domain::ports::{CompletionClient, ConfigProvider};
use crate::utils::error::{AdvisorError, Result};
use reqwest::Client;
use serde::Serialize;

const SYSTEM_PROMPT: &str = "You are a relocation advisor for people moving to Central America. \
You compare Costa Rica, Panama and Belize on cost of living, healthcare, residency options, \
climate, safety and community, and you recommend exactly one of them. \
Answer with JSON only.";

const OUTPUT_SCHEMA: &str = r#"{
  "country": "Costa Rica" | "Panama" | "Belize",
  "score": integer from 0 to 100,
  "reasons": [2 to 4 short strings],
  "cities": [exactly 3 objects of the form { "name": string, "reason": string }]
}"#;

/// 錯誤 body 寫入日誌前的最大長度
const MAX_LOGGED_BODY: usize = 512;

pub fn build_messages(answers: &Answers) -> Result<Vec<ChatMessage>> {
    let answers_json = answers.to_json_string()?;
    let user_prompt = format!(
        "Questionnaire answers (JSON):\n{}\n\n\
         Recommend the best country for this person. \
         Respond with a single JSON object that matches this schema exactly and nothing else:\n{}",
        answers_json, OUTPUT_SCHEMA
    );

    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt),
    ])
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

pub struct OpenAiClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> OpenAiClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> CompletionClient for OpenAiClient<C> {
    async fn complete(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model(),
            temperature: self.config.temperature(),
            max_tokens: self.config.max_tokens(),
            messages,
        };

        tracing::debug!(
            "Calling completion API at {} (model: {}, credential source: {})",
            self.config.upstream_endpoint(),
            self.config.model(),
            credential.source()
        );

        let response = self
            .client
            .post(self.config.upstream_endpoint())
            .bearer_auth(credential.token())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Completion API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "❌ Completion API returned {}: {}",
                status,
                truncate(&body, MAX_LOGGED_BODY)
            );
            return Err(AdvisorError::UpstreamStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
