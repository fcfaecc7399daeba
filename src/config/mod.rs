#[cfg(feature = "cli")]
pub mod cli;
pub mod pages;
pub mod toml_config;

use crate::core::highlight::{
    DestinationSource, HighlightConfig, PageDecorator, DEFAULT_CLASS_NAME,
    DEFAULT_DESTINATION_PAGES, DEFAULT_NAV_SELECTORS, DEFAULT_ROOT_ATTRIBUTE,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.35;
pub const DEFAULT_MAX_TOKENS: u32 = 400;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 未設定時使用 HTTP client 預設值
    pub request_timeout_secs: Option<u64>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: None,
        }
    }
}

impl ConfigProvider for UpstreamSettings {
    fn upstream_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for UpstreamSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("upstream.endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("upstream.model", &self.model)?;
        validation::validate_range("upstream.temperature", self.temperature, 0.0, 2.0)?;
        validation::validate_positive_number("upstream.max_tokens", self.max_tokens as usize, 1)?;
        if let Some(timeout) = self.request_timeout_secs {
            validation::validate_positive_number(
                "upstream.request_timeout_secs",
                timeout as usize,
                1,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DestinationMode {
    #[default]
    Fixed,
    DocumentAttribute,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighlighterSettings {
    pub destination_source: DestinationMode,
    pub destination_pages: Vec<String>,
    pub selectors: Vec<String>,
    pub class_name: String,
    pub root_attribute: String,
}

impl Default for HighlighterSettings {
    fn default() -> Self {
        Self {
            destination_source: DestinationMode::Fixed,
            destination_pages: DEFAULT_DESTINATION_PAGES.iter().map(|p| p.to_string()).collect(),
            selectors: DEFAULT_NAV_SELECTORS.iter().map(|s| s.to_string()).collect(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            root_attribute: DEFAULT_ROOT_ATTRIBUTE.to_string(),
        }
    }
}

impl HighlighterSettings {
    pub fn decorator(&self) -> Result<PageDecorator> {
        let pages = self
            .destination_pages
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        let config = HighlightConfig {
            selectors: self.selectors.clone(),
            class_name: self.class_name.clone(),
            ..HighlightConfig::default()
        };

        let source = match self.destination_source {
            DestinationMode::Fixed => DestinationSource::Fixed(pages),
            DestinationMode::DocumentAttribute => {
                DestinationSource::DocumentAttribute(self.root_attribute.clone())
            }
        };

        PageDecorator::new(config, source)
    }
}

impl Validate for HighlighterSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_list("highlighter.selectors", &self.selectors)?;
        validation::validate_non_empty_string("highlighter.class_name", &self.class_name)?;
        match self.destination_source {
            DestinationMode::Fixed => validation::validate_non_empty_list(
                "highlighter.destination_pages",
                &self.destination_pages,
            ),
            DestinationMode::DocumentAttribute => validation::validate_non_empty_string(
                "highlighter.root_attribute",
                &self.root_attribute,
            ),
        }
    }
}

/// 伺服器執行時的完整設定（預設值 → TOML 檔 → CLI 參數）
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub bind: SocketAddr,
    pub pages_dir: PathBuf,
    pub body_limit_bytes: usize,
    pub upstream: UpstreamSettings,
    pub highlighter: HighlighterSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            pages_dir: PathBuf::from("./public"),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            upstream: UpstreamSettings::default(),
            highlighter: HighlighterSettings::default(),
        }
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("server.pages_dir", &self.pages_dir.to_string_lossy())?;
        validation::validate_positive_number("server.body_limit_bytes", self.body_limit_bytes, 1)?;
        self.upstream.validate()?;
        self.highlighter.validate()?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.upstream.temperature, 0.35);
        assert_eq!(settings.upstream.max_tokens, 400);
        assert!(settings.upstream.request_timeout().is_none());
    }

    #[test]
    fn test_invalid_upstream_rejected() {
        let upstream = UpstreamSettings {
            temperature: 3.0,
            ..UpstreamSettings::default()
        };
        assert!(upstream.validate().is_err());

        let upstream = UpstreamSettings {
            endpoint: "not a url".to_string(),
            ..UpstreamSettings::default()
        };
        assert!(upstream.validate().is_err());
    }

    #[test]
    fn test_document_attribute_mode_needs_attribute_name() {
        let settings = HighlighterSettings {
            destination_source: DestinationMode::DocumentAttribute,
            destination_pages: vec![],
            root_attribute: " ".to_string(),
            ..HighlighterSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_decorator_uses_fixed_pages() {
        let settings = HighlighterSettings {
            destination_pages: vec!["Panama.html".to_string(), "belize.html".to_string()],
            ..HighlighterSettings::default()
        };
        let decorator = settings.decorator().unwrap();
        let pages = &decorator.highlighter().config().destination_filenames;
        assert!(pages.contains("panama.html"));
        assert!(pages.contains("belize.html"));
        assert!(!pages.contains("costarica.html"));
    }
}
