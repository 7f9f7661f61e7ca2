use super::relocator::{RelocationOutcome, relocate};
use super::worker::{ConversionOutcome, ConversionTask, ConversionWorker, TaskState};
use crate::config::Job;
use crate::error::ConvertError;
use crate::tools::{SourceFile, Transcoder};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 已結束的任務與其結果
#[derive(Debug)]
pub struct TaskRecord {
    pub task: ConversionTask,
    pub outcome: ConversionOutcome,
}

/// 一個原始檔的搬移結果
#[derive(Debug)]
pub struct RelocationRecord {
    pub source: SourceFile,
    pub result: Result<RelocationOutcome, ConvertError>,
}

#[derive(Debug)]
pub struct ScheduleResult {
    /// 完成順序不固定
    pub records: Vec<TaskRecord>,
    pub relocations: Vec<RelocationRecord>,
    pub total_tasks: usize,
    pub interrupted: bool,
}

/// 即時進度計數，可由多個執行緒同時更新
#[derive(Debug, Default)]
pub struct ProgressCounters {
    running: AtomicUsize,
    succeeded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub running: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProgressSnapshot {
    #[must_use]
    pub const fn finished(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl ProgressCounters {
    fn transition(&self, from: TaskState, to: TaskState) {
        debug_assert!(!from.is_terminal(), "任務已結束，不能再轉換狀態");
        if from == TaskState::Running {
            self.running.fetch_sub(1, Ordering::SeqCst);
        }
        let counter = match to {
            TaskState::Running => &self.running,
            TaskState::Succeeded => &self.succeeded,
            TaskState::Skipped => &self.skipped,
            TaskState::Failed => &self.failed,
            TaskState::Pending => return,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            running: self.running.load(Ordering::SeqCst),
            succeeded: self.succeeded.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// 轉檔排程器
///
/// 對每個（原始檔 × 輸出格式）建立一個任務，在固定大小的執行緒池中執行。
/// 每個原始檔有自己的倒數計數器，最後一個結束的任務負責搬移原始檔。
pub struct TaskScheduler {
    sources: Vec<SourceFile>,
    input_format: String,
    output_formats: Vec<String>,
    transcoder: Arc<dyn Transcoder>,
    shutdown_signal: Arc<AtomicBool>,
    worker_count: usize,
    overwrite: bool,
    progress_bar: ProgressBar,
    counters: ProgressCounters,
}

impl TaskScheduler {
    pub fn new(
        job: &Job,
        sources: Vec<SourceFile>,
        transcoder: Arc<dyn Transcoder>,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sources,
            input_format: job.input_format().to_string(),
            output_formats: job.output_formats().to_vec(),
            transcoder,
            shutdown_signal,
            worker_count: std::thread::available_parallelism().map_or(1, |n| n.get()),
            overwrite: false,
            progress_bar: ProgressBar::hidden(),
            counters: ProgressCounters::default(),
        }
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn with_progress_bar(mut self, progress_bar: ProgressBar) -> Self {
        self.progress_bar = progress_bar;
        self
    }

    /// 原始檔 × 輸出格式
    #[must_use]
    pub fn build_tasks(&self) -> Vec<(usize, ConversionTask)> {
        self.sources
            .iter()
            .enumerate()
            .flat_map(|(slot, source)| {
                self.output_formats
                    .iter()
                    .enumerate()
                    .map(move |(format_index, format)| {
                        (
                            slot,
                            ConversionTask {
                                source: source.clone(),
                                source_format: self.input_format.clone(),
                                target_format: format.clone(),
                                format_index,
                            },
                        )
                    })
            })
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.counters.snapshot()
    }

    pub fn run(&self) -> Result<ScheduleResult> {
        let tasks = self.build_tasks();
        let total_tasks = tasks.len();

        info!(
            "開始轉檔任務，共 {} 個檔案、{} 個任務，{} 個執行緒",
            self.sources.len(),
            total_tasks,
            self.worker_count
        );

        let remaining: Vec<AtomicUsize> = self
            .sources
            .iter()
            .map(|_| AtomicUsize::new(self.output_formats.len()))
            .collect();
        let relocations = Mutex::new(Vec::new());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .thread_name(|i| format!("convert-{i}"))
            .build()
            .context("無法建立轉檔執行緒池")?;

        let worker = ConversionWorker::new(self.transcoder.as_ref(), self.overwrite);
        self.progress_bar.set_length(total_tasks as u64);

        let records: Vec<TaskRecord> = pool.install(|| {
            tasks
                .into_par_iter()
                .filter_map(|(slot, task)| {
                    if self.shutdown_signal.load(Ordering::SeqCst) {
                        return None;
                    }

                    self.counters.transition(TaskState::Pending, TaskState::Running);
                    let outcome = worker.convert(&task);
                    self.counters.transition(TaskState::Running, outcome.state());
                    self.report_progress();

                    if remaining[slot].fetch_sub(1, Ordering::AcqRel) == 1 {
                        let record = self.relocate_source(&task.source);
                        relocations
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(record);
                    }

                    Some(TaskRecord { task, outcome })
                })
                .collect()
        });

        let interrupted =
            self.shutdown_signal.load(Ordering::SeqCst) && records.len() < total_tasks;
        if interrupted {
            warn!(
                "收到中斷信號，已停止派發新任務（完成 {}/{}）",
                records.len(),
                total_tasks
            );
            self.progress_bar.abandon_with_message("操作已中斷");
        } else {
            self.progress_bar.finish_with_message("完成");
            info!("所有轉檔任務已完成");
        }

        Ok(ScheduleResult {
            records,
            relocations: relocations
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            total_tasks,
            interrupted,
        })
    }

    fn relocate_source(&self, source: &SourceFile) -> RelocationRecord {
        let result = relocate(&source.path, &self.input_format);
        if let Err(e) = &result {
            error!("{e}");
        }
        RelocationRecord {
            source: source.clone(),
            result,
        }
    }

    fn report_progress(&self) {
        let snapshot = self.counters.snapshot();
        self.progress_bar.set_message(format!(
            "成功 {} | 跳過 {} | 失敗 {}",
            snapshot.succeeded, snapshot.skipped, snapshot.failed
        ));
        self.progress_bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranscodeError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct CopyTranscoder;

    impl Transcoder for CopyTranscoder {
        fn transcode(
            &self,
            source: &Path,
            destination: &Path,
            _target_format: &str,
        ) -> Result<(), TranscodeError> {
            // 搬移前原始檔必須還在原位
            assert!(source.exists(), "source moved before conversion finished");
            fs::copy(source, destination).unwrap();
            Ok(())
        }
    }

    fn setup(names: &[&str]) -> (TempDir, Vec<SourceFile>) {
        let temp_dir = TempDir::new().unwrap();
        let sources = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let path = temp_dir.path().join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                SourceFile { index, path }
            })
            .collect();
        (temp_dir, sources)
    }

    fn scheduler(
        root: &Path,
        sources: Vec<SourceFile>,
        formats: &[&str],
        shutdown: bool,
    ) -> TaskScheduler {
        let job = Job::new(root, "mp3", formats).unwrap();
        TaskScheduler::new(
            &job,
            sources,
            Arc::new(CopyTranscoder),
            Arc::new(AtomicBool::new(shutdown)),
        )
        .with_worker_count(4)
    }

    #[test]
    fn test_build_tasks_is_cartesian_product() {
        let (temp_dir, sources) = setup(&["a.mp3", "b.mp3", "c.mp3"]);
        let scheduler = scheduler(temp_dir.path(), sources, &["ogg", "flac"], false);

        let tasks = scheduler.build_tasks();

        assert_eq!(tasks.len(), 6);
        assert_eq!(tasks[0].0, 0);
        assert_eq!(tasks[1].1.target_format, "flac");
        assert_eq!(tasks[1].1.format_index, 1);
        assert_eq!(tasks[5].0, 2);
    }

    #[test]
    fn test_run_relocates_each_source_once() {
        let (temp_dir, sources) = setup(&["a.mp3", "b.mp3"]);
        let scheduler = scheduler(temp_dir.path(), sources, &["ogg", "flac", "mp3"], false);

        let result = scheduler.run().unwrap();

        assert!(!result.interrupted);
        assert_eq!(result.total_tasks, 6);
        assert_eq!(result.records.len(), 6);
        assert_eq!(result.relocations.len(), 2);
        for relocation in &result.relocations {
            assert!(matches!(
                relocation.result,
                Ok(RelocationOutcome::Moved(_))
            ));
        }

        let snapshot = scheduler.progress();
        assert_eq!(snapshot.succeeded, 4);
        assert_eq!(snapshot.skipped, 2);
        assert_eq!(snapshot.running, 0);
        assert_eq!(snapshot.finished(), 6);

        let base = temp_dir.path();
        for expected in ["ogg/a.ogg", "flac/b.flac", "mp3/a.mp3", "mp3/b.mp3"] {
            assert!(base.join(expected).exists(), "missing {expected}");
        }
        assert!(!base.join("a.mp3").exists());
    }

    #[test]
    fn test_shutdown_before_start_runs_nothing() {
        let (temp_dir, sources) = setup(&["a.mp3"]);
        let scheduler = scheduler(temp_dir.path(), sources, &["ogg"], true);

        let result = scheduler.run().unwrap();

        assert!(result.interrupted);
        assert!(result.records.is_empty());
        assert!(result.relocations.is_empty());
        assert!(temp_dir.path().join("a.mp3").exists());
        assert!(!temp_dir.path().join("ogg").exists());
    }

    #[test]
    fn test_no_sources_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let scheduler = scheduler(temp_dir.path(), Vec::new(), &["ogg"], false);

        let result = scheduler.run().unwrap();

        assert_eq!(result.total_tasks, 0);
        assert!(result.records.is_empty());
        assert!(!result.interrupted);
    }
}
