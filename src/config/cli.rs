use crate::config::toml_config::TomlConfig;
use crate::config::{AppSettings, DestinationMode};
use crate::utils::error::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "relocation-advisor")]
#[command(about = "Relocation recommendation API with server-side destination link highlighting")]
pub struct ServerConfig {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP listener to [default: 127.0.0.1:3000]
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Directory holding the static *.html pages [default: ./public]
    #[arg(long)]
    pub pages_dir: Option<PathBuf>,

    /// Chat completion endpoint
    #[arg(long)]
    pub upstream_endpoint: Option<String>,

    /// Model identifier sent upstream
    #[arg(long)]
    pub model: Option<String>,

    /// Upstream request timeout in seconds (transport default when unset)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Maximum request body size accepted by /api/recommend
    #[arg(long)]
    pub body_limit_bytes: Option<usize>,

    /// Where destination page names come from
    #[arg(long, value_enum)]
    pub destination_source: Option<DestinationMode>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServerConfig {
    /// 預設值 → TOML 檔 → CLI 參數，後者覆蓋前者
    pub fn into_settings(self) -> Result<AppSettings> {
        let mut settings = AppSettings::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        if let Some(bind) = self.bind {
            settings.bind = bind;
        }
        if let Some(pages_dir) = self.pages_dir {
            settings.pages_dir = pages_dir;
        }
        if let Some(endpoint) = self.upstream_endpoint {
            settings.upstream.endpoint = endpoint;
        }
        if let Some(model) = self.model {
            settings.upstream.model = model;
        }
        if self.request_timeout_secs.is_some() {
            settings.upstream.request_timeout_secs = self.request_timeout_secs;
        }
        if let Some(limit) = self.body_limit_bytes {
            settings.body_limit_bytes = limit;
        }
        if let Some(mode) = self.destination_source {
            settings.highlighter.destination_source = mode;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[upstream]\nmodel = \"from-file\"\nmax_tokens = 256\n")
            .unwrap();

        let config = ServerConfig::parse_from([
            "relocation-advisor",
            "--config",
            temp_file.path().to_str().unwrap(),
            "--model",
            "from-cli",
            "--destination-source",
            "document-attribute",
        ]);
        let settings = config.into_settings().unwrap();

        assert_eq!(settings.upstream.model, "from-cli");
        assert_eq!(settings.upstream.max_tokens, 256);
        assert_eq!(
            settings.highlighter.destination_source,
            DestinationMode::DocumentAttribute
        );
    }

    #[test]
    fn test_missing_config_file_fails() {
        let config = ServerConfig::parse_from([
            "relocation-advisor",
            "--config",
            "/nonexistent/relocation-advisor.toml",
        ]);
        assert!(config.into_settings().is_err());
    }
}
