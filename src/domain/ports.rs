use crate::domain::model::ChatMessage;
use crate::core::credentials::Credential;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn upstream_endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn max_tokens(&self) -> u32;
    fn request_timeout(&self) -> Option<Duration>;
}

/// 聊天式補全 API；回傳第一個 choice 的訊息內容
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String>;
}
