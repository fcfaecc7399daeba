use std::fmt;
use std::path::{Path, PathBuf};

pub const PRIMARY_KEY_ENV: &str = "OPENAI_API_KEY";
pub const SECONDARY_KEY_ENV: &str = "OPEN_AI_KEY";
pub const KEY_FILE_ENV: &str = "OPEN_AI_KEY_FILE";
pub const DEFAULT_KEY_FILE: &str = "./OPEN_AI_KEY";
pub const SECRET_MOUNT_KEY_FILE: &str = "/run/secrets/OPEN_AI_KEY";

/// 上游 API 金鑰；Debug 輸出一律遮蔽
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: String,
}

impl Credential {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 產生此金鑰的來源描述，可安全寫入日誌
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// 環境變數直接存放金鑰
    Env(String),
    /// 環境變數存放金鑰檔案路徑
    EnvFile(String),
    /// 固定路徑的金鑰檔案
    File(PathBuf),
}

impl CredentialSource {
    pub fn describe(&self) -> String {
        match self {
            CredentialSource::Env(name) => format!("env:{}", name),
            CredentialSource::EnvFile(name) => format!("file-from-env:{}", name),
            CredentialSource::File(path) => format!("file:{}", path.display()),
        }
    }

    /// 嘗試單一來源；讀取失敗或內容為空都視為找不到
    pub fn try_resolve<E>(&self, env: &E) -> Option<String>
    where
        E: Fn(&str) -> Option<String>,
    {
        match self {
            CredentialSource::Env(name) => env(name).and_then(non_empty),
            CredentialSource::EnvFile(name) => {
                let path = env(name).and_then(non_empty)?;
                read_key_file(Path::new(&path))
            }
            CredentialSource::File(path) => read_key_file(path),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_key_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => non_empty(content),
        Err(e) => {
            tracing::trace!("Key file {} not readable: {}", path.display(), e);
            None
        }
    }
}

/// 依優先順序檢查各來源，第一個成功者勝出。每次請求重新讀取，不做快取。
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    sources: Vec<CredentialSource>,
}

impl CredentialResolver {
    pub fn with_sources(sources: Vec<CredentialSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    pub fn resolve(&self) -> Option<Credential> {
        self.resolve_with(&|name: &str| std::env::var(name).ok())
    }

    pub fn resolve_with<E>(&self, env: &E) -> Option<Credential>
    where
        E: Fn(&str) -> Option<String>,
    {
        self.sources.iter().find_map(|source| {
            source.try_resolve(env).map(|token| Credential {
                token,
                source: source.describe(),
            })
        })
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::with_sources(vec![
            CredentialSource::Env(PRIMARY_KEY_ENV.to_string()),
            CredentialSource::Env(SECONDARY_KEY_ENV.to_string()),
            CredentialSource::EnvFile(KEY_FILE_ENV.to_string()),
            CredentialSource::File(PathBuf::from(DEFAULT_KEY_FILE)),
            CredentialSource::File(PathBuf::from(SECRET_MOUNT_KEY_FILE)),
        ])
    }
}
