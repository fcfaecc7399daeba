use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 本地靜態頁面目錄
#[derive(Debug, Clone)]
pub struct PageStore {
    base_path: PathBuf,
}

impl PageStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 只接受目錄下單一層的頁面名稱
    pub fn is_page_name(name: &str, extension: &str) -> bool {
        !name.is_empty()
            && !name.contains(['/', '\\'])
            && !name.starts_with('.')
            && name.to_lowercase().ends_with(extension)
    }

    pub async fn read_page(&self, name: &str) -> Result<String> {
        let data = self.read_file(name).await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    pub async fn list_pages(&self, extension: &str) -> Result<Vec<String>> {
        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if Self::is_page_name(name, extension) {
                    pages.push(name.to_string());
                }
            }
        }
        pages.sort();
        Ok(pages)
    }
}

impl Storage for PageStore {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
