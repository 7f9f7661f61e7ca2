use crate::config::types::ConverterSettings;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

const DEFAULT_SETTINGS_FILE: &str = "settings.json";

impl ConverterSettings {
    /// 載入設定
    ///
    /// 有指定路徑時該檔案必須存在；否則嘗試工作目錄下的 settings.json，
    /// 不存在就使用預設值。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    debug!("找不到 {DEFAULT_SETTINGS_FILE}，使用預設設定");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}
