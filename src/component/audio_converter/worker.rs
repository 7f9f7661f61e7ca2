use super::layout::{format_directory, resolve_output_path};
use crate::error::TranscodeError;
use crate::tools::{SourceFile, Transcoder};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Skipped,
    Failed,
}

impl TaskState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Skipped | Self::Failed)
    }
}

/// 一個（原始檔, 目標格式）轉檔單位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    pub source: SourceFile,
    pub source_format: String,
    pub target_format: String,
    /// 目標格式在輸出格式列表中的位置
    pub format_index: usize,
}

impl ConversionTask {
    #[must_use]
    pub fn is_same_format(&self) -> bool {
        self.source_format == self.target_format
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 目標格式與輸入格式相同
    SameFormat,
    /// 輸出檔案已存在且未啟用覆寫
    OutputExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameFormat => write!(f, "與輸入格式相同"),
            Self::OutputExists => write!(f, "輸出檔案已存在"),
        }
    }
}

#[derive(Debug)]
pub enum ConversionOutcome {
    Succeeded(PathBuf),
    Skipped(SkipReason),
    Failed(TranscodeError),
}

impl ConversionOutcome {
    #[must_use]
    pub const fn state(&self) -> TaskState {
        match self {
            Self::Succeeded(_) => TaskState::Succeeded,
            Self::Skipped(_) => TaskState::Skipped,
            Self::Failed(_) => TaskState::Failed,
        }
    }
}

/// 執行單一轉檔任務，任何錯誤都轉成 `ConversionOutcome::Failed`
pub struct ConversionWorker<'a> {
    transcoder: &'a dyn Transcoder,
    overwrite: bool,
}

impl<'a> ConversionWorker<'a> {
    #[must_use]
    pub const fn new(transcoder: &'a dyn Transcoder, overwrite: bool) -> Self {
        Self {
            transcoder,
            overwrite,
        }
    }

    pub fn convert(&self, task: &ConversionTask) -> ConversionOutcome {
        if task.is_same_format() {
            debug!(
                "跳過同格式轉檔: {} ({})",
                task.source.path.display(),
                task.target_format
            );
            return ConversionOutcome::Skipped(SkipReason::SameFormat);
        }

        let output_path = match resolve_output_path(&task.source.path, &task.target_format) {
            Ok(path) => path,
            Err(source) => {
                return ConversionOutcome::Failed(TranscodeError::Layout {
                    path: format_directory(&task.source.path, &task.target_format),
                    source,
                });
            }
        };

        if !self.overwrite && output_path.exists() {
            debug!("輸出已存在，跳過: {}", output_path.display());
            return ConversionOutcome::Skipped(SkipReason::OutputExists);
        }

        debug!(
            "開始轉檔: {} -> {}",
            task.source.path.display(),
            output_path.display()
        );

        let result = self
            .transcoder
            .transcode(&task.source.path, &output_path, &task.target_format)
            .and_then(|()| {
                if output_path.exists() {
                    Ok(())
                } else {
                    Err(TranscodeError::MissingOutput(output_path.clone()))
                }
            });

        match result {
            Ok(()) => {
                info!("轉檔完成: {}", output_path.display());
                ConversionOutcome::Succeeded(output_path)
            }
            Err(e) => {
                if e.is_tool_missing() {
                    error!("找不到轉檔工具: {e}");
                } else {
                    warn!(
                        "轉檔失敗 {} -> {}: {e}",
                        task.source.path.display(),
                        task.target_format
                    );
                }
                remove_partial_output(&output_path);
                ConversionOutcome::Failed(e)
            }
        }
    }
}

fn remove_partial_output(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => info!("已刪除失敗的輸出檔案: {}", path.display()),
        Err(e) => warn!("無法刪除失敗的輸出檔案 {}: {e}", path.display()),
    }
}
