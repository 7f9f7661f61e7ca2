//! 轉檔流程的錯誤分類
//!
//! 設定層級的錯誤（根目錄、格式）會在排程前中止執行；
//! 單一任務的錯誤一律轉為 `ConversionOutcome::Failed`，不會中斷整批轉檔。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("根目錄無效 {}: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("格式名稱無效: {0:?}")]
    InvalidFormat(String),

    #[error("至少需要一個輸出格式")]
    NoOutputFormats,

    #[error("無法移動原始檔案 {} -> {}: {source}", .from.display(), .to.display())]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 外部轉檔工具的失敗原因
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("無法啟動 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("轉檔工具結束碼 {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("轉檔完成但找不到輸出檔案: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("無法建立輸出資料夾 {}: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscodeError {
    /// 工具是否根本沒有被執行（例如找不到 ffmpeg）
    #[must_use]
    pub const fn is_tool_missing(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_message_contains_stderr() {
        let err = TranscodeError::ExitStatus {
            code: Some(1),
            stderr: "Invalid data found".to_string(),
        };
        assert!(err.to_string().contains("Invalid data found"));
        assert!(!err.is_tool_missing());
    }

    #[test]
    fn test_spawn_error_is_tool_missing() {
        let err = TranscodeError::Spawn {
            program: "ffmpeg".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_tool_missing());
        assert!(err.to_string().contains("ffmpeg"));
    }
}
