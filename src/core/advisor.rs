use crate::core::credentials::CredentialResolver;
use crate::core::{fallback, openai};
use crate::domain::model::{Advice, Answers};
use crate::domain::ports::CompletionClient;
use crate::utils::error::Result;
use serde_json::Value;

pub struct Advisor<C: CompletionClient> {
    resolver: CredentialResolver,
    client: C,
}

impl<C: CompletionClient> Advisor<C> {
    pub fn new(resolver: CredentialResolver, client: C) -> Self {
        Self { resolver, client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 有憑證時呼叫上游一次（不重試），否則回傳本地推薦
    pub async fn advise(&self, answers: &Answers) -> Result<Advice> {
        let Some(credential) = self.resolver.resolve() else {
            tracing::info!("No API credential found, using fallback recommendation");
            return Ok(Advice::Fallback(fallback::recommend(answers)));
        };

        tracing::info!("Using API credential from {}", credential.source());
        let messages = openai::build_messages(answers)?;
        let content = self.client.complete(&credential, &messages).await?;

        Ok(parse_reply(&content))
    }
}

/// 從第一個 `{` 開始解析，容許前面有說明文字；失敗則保留原文
pub fn parse_reply(content: &str) -> Advice {
    let parsed = content
        .find('{')
        .and_then(|start| serde_json::from_str::<Value>(&content[start..]).ok());

    match parsed {
        Some(value) => Advice::Relayed(value),
        None => {
            tracing::warn!("Completion content is not JSON, relaying raw text");
            Advice::RawText(content.to_string())
        }
    }
}
