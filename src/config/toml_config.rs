use crate::config::{AppSettings, DestinationMode};
use crate::utils::error::{AdvisorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub upstream: Option<UpstreamSection>,
    pub highlighter: Option<HighlighterSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<SocketAddr>,
    pub pages_dir: Option<PathBuf>,
    pub body_limit_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamSection {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlighterSection {
    pub destination_source: Option<DestinationMode>,
    pub destination_pages: Option<Vec<String>>,
    pub selectors: Option<Vec<String>>,
    pub class_name: Option<String>,
    pub root_attribute: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdvisorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPSTREAM_ENDPOINT})，未設定者保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdvisorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 檔案中有設定的值覆蓋現有設定
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(server) = &self.server {
            if let Some(bind) = server.bind {
                settings.bind = bind;
            }
            if let Some(pages_dir) = &server.pages_dir {
                settings.pages_dir = pages_dir.clone();
            }
            if let Some(limit) = server.body_limit_bytes {
                settings.body_limit_bytes = limit;
            }
        }

        if let Some(upstream) = &self.upstream {
            let target = &mut settings.upstream;
            if let Some(endpoint) = &upstream.endpoint {
                target.endpoint = endpoint.clone();
            }
            if let Some(model) = &upstream.model {
                target.model = model.clone();
            }
            if let Some(temperature) = upstream.temperature {
                target.temperature = temperature;
            }
            if let Some(max_tokens) = upstream.max_tokens {
                target.max_tokens = max_tokens;
            }
            if upstream.request_timeout_secs.is_some() {
                target.request_timeout_secs = upstream.request_timeout_secs;
            }
        }

        if let Some(highlighter) = &self.highlighter {
            let target = &mut settings.highlighter;
            if let Some(mode) = highlighter.destination_source {
                target.destination_source = mode;
            }
            if let Some(pages) = &highlighter.destination_pages {
                target.destination_pages = pages.clone();
            }
            if let Some(selectors) = &highlighter.selectors {
                target.selectors = selectors.clone();
            }
            if let Some(class_name) = &highlighter.class_name {
                target.class_name = class_name.clone();
            }
            if let Some(attr) = &highlighter.root_attribute {
                target.root_attribute = attr.clone();
            }
        }
    }

    pub fn into_settings(self) -> AppSettings {
        let mut settings = AppSettings::default();
        self.apply_to(&mut settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind = "0.0.0.0:8080"
pages_dir = "./site"

[upstream]
endpoint = "https://llm.internal.example/v1/chat/completions"
model = "gpt-4o"
request_timeout_secs = 20

[highlighter]
destination_source = "document-attribute"
root_attribute = "data-pages"
selectors = ["header nav a"]
"#;

        let settings = TomlConfig::from_toml_str(toml_content).unwrap().into_settings();

        assert_eq!(settings.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.pages_dir, PathBuf::from("./site"));
        assert_eq!(settings.upstream.model, "gpt-4o");
        assert_eq!(settings.upstream.temperature, 0.35);
        assert_eq!(settings.upstream.request_timeout_secs, Some(20));
        assert_eq!(settings.highlighter.destination_source, DestinationMode::DocumentAttribute);
        assert_eq!(settings.highlighter.root_attribute, "data-pages");
        assert_eq!(settings.highlighter.class_name, "other-destination");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RELOCATION_ADVISOR_TEST_MODEL", "gpt-test-mini");

        let toml_content = r#"
[upstream]
model = "${RELOCATION_ADVISOR_TEST_MODEL}"
endpoint = "${RELOCATION_ADVISOR_TEST_UNSET_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let upstream = config.upstream.unwrap();
        assert_eq!(upstream.model.as_deref(), Some("gpt-test-mini"));
        assert_eq!(
            upstream.endpoint.as_deref(),
            Some("${RELOCATION_ADVISOR_TEST_UNSET_ENDPOINT}")
        );

        std::env::remove_var("RELOCATION_ADVISOR_TEST_MODEL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[upstream]
endpoint = "invalid-url"
"#;

        let settings = TomlConfig::from_toml_str(toml_content).unwrap().into_settings();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[upstream\nmodel = 1").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nbody_limit_bytes = 2048\n")
            .unwrap();

        let settings = TomlConfig::from_file(temp_file.path()).unwrap().into_settings();
        assert_eq!(settings.body_limit_bytes, 2048);
    }
}
