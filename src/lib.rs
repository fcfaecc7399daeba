pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::ServerConfig;

pub use adapters::http::{build_router, serve, AppState};
pub use crate::config::{pages::PageStore, AppSettings, HighlighterSettings, UpstreamSettings};
pub use crate::core::{advisor::Advisor, credentials::CredentialResolver, openai::OpenAiClient};
pub use domain::model::{Advice, Answers, Recommendation};
pub use domain::ports::{CompletionClient, ConfigProvider, Storage};
pub use utils::error::{AdvisorError, Result};
