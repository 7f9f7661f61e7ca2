//! 彙整轉檔結果
//!
//! 結果與完成順序無關：所有項目依掃描順序、再依輸出格式順序排序。

use super::relocator::RelocationOutcome;
use super::task_scheduler::{RelocationRecord, ScheduleResult, TaskRecord};
use super::worker::{ConversionOutcome, SkipReason};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub source_index: usize,
    pub format_index: usize,
    pub source: PathBuf,
    pub target_format: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConversion {
    pub source_index: usize,
    pub format_index: usize,
    pub source: PathBuf,
    pub target_format: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedConversion {
    pub source_index: usize,
    pub format_index: usize,
    pub source: PathBuf,
    pub target_format: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationFailure {
    pub source_index: usize,
    pub source: PathBuf,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: Vec<ConvertedFile>,
    pub skipped: Vec<SkippedConversion>,
    pub failed: Vec<FailedConversion>,
    /// 實際搬移的原始檔數
    pub relocated: usize,
    /// 已在目標位置而未搬移的原始檔數
    pub already_relocated: usize,
    pub relocation_failures: Vec<RelocationFailure>,
    pub total_tasks: usize,
    pub interrupted: bool,
}

/// 將任務結果分成成功、跳過、失敗
#[must_use]
pub fn aggregate(records: &[TaskRecord]) -> RunReport {
    let mut report = RunReport {
        total_tasks: records.len(),
        ..RunReport::default()
    };

    for record in records {
        let task = &record.task;
        let source_index = task.source.index;
        let format_index = task.format_index;
        let source = task.source.path.clone();
        let target_format = task.target_format.clone();

        match &record.outcome {
            ConversionOutcome::Succeeded(output) => report.succeeded.push(ConvertedFile {
                source_index,
                format_index,
                source,
                target_format,
                output: output.clone(),
            }),
            ConversionOutcome::Skipped(reason) => report.skipped.push(SkippedConversion {
                source_index,
                format_index,
                source,
                target_format,
                reason: *reason,
            }),
            ConversionOutcome::Failed(e) => report.failed.push(FailedConversion {
                source_index,
                format_index,
                source,
                target_format,
                detail: e.to_string(),
            }),
        }
    }

    report
        .succeeded
        .sort_by_key(|c| (c.source_index, c.format_index));
    report
        .skipped
        .sort_by_key(|c| (c.source_index, c.format_index));
    report
        .failed
        .sort_by_key(|c| (c.source_index, c.format_index));

    report
}

impl RunReport {
    /// 彙整排程器的完整結果（包含搬移與中斷狀態）
    #[must_use]
    pub fn from_schedule(result: &ScheduleResult) -> Self {
        let mut report = aggregate(&result.records);
        report.total_tasks = result.total_tasks;
        report.interrupted = result.interrupted;
        report.add_relocations(&result.relocations);
        report
    }

    fn add_relocations(&mut self, relocations: &[RelocationRecord]) {
        for record in relocations {
            match &record.result {
                Ok(RelocationOutcome::Moved(_)) => self.relocated += 1,
                Ok(RelocationOutcome::AlreadyRelocated(_)) => self.already_relocated += 1,
                Err(e) => self.relocation_failures.push(RelocationFailure {
                    source_index: record.source.index,
                    source: record.source.path.clone(),
                    detail: e.to_string(),
                }),
            }
        }
        self.relocation_failures.sort_by_key(|f| f.source_index);
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }

    /// 因中斷而未執行的任務數
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.total_tasks.saturating_sub(self.completed())
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.relocation_failures.is_empty()
    }

    /// 有任何轉檔失敗的原始檔，依掃描順序、不重複
    #[must_use]
    pub fn failed_sources(&self) -> Vec<&Path> {
        let mut sources: Vec<&Path> = Vec::new();
        for failure in &self.failed {
            if sources.last() != Some(&failure.source.as_path()) {
                sources.push(&failure.source);
            }
        }
        sources
    }
}
