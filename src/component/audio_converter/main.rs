use super::layout::output_collisions;
use super::report::RunReport;
use super::task_scheduler::TaskScheduler;
use crate::config::{ConverterSettings, Job};
use crate::tools::{SourceFile, Transcoder, discover, exclude_organized};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 批次音訊轉檔元件
pub struct AudioConverter {
    job: Job,
    settings: ConverterSettings,
    transcoder: Arc<dyn Transcoder>,
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl AudioConverter {
    pub fn new(
        job: Job,
        settings: ConverterSettings,
        transcoder: Arc<dyn Transcoder>,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            job,
            settings,
            transcoder,
            shutdown_signal,
            show_progress: true,
        }
    }

    /// 不輸出進度條與摘要（測試用）
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn run(&self) -> Result<RunReport> {
        self.say(&style("=== 批次音訊轉檔 ===").cyan().bold().to_string());

        let sources = self.scan_sources()?;

        if sources.is_empty() {
            self.say(
                &style(format!("找不到任何 .{} 檔案", self.job.input_format()))
                    .yellow()
                    .to_string(),
            );
            return Ok(RunReport::default());
        }

        self.say(
            &style(format!(
                "找到 {} 個 .{} 檔案，輸出格式: {}",
                sources.len(),
                self.job.input_format(),
                self.job.output_formats().join(", ")
            ))
            .green()
            .to_string(),
        );

        let scheduler = TaskScheduler::new(
            &self.job,
            sources,
            Arc::clone(&self.transcoder),
            Arc::clone(&self.shutdown_signal),
        )
        .with_worker_count(self.settings.worker_count())
        .with_overwrite(self.settings.overwrite)
        .with_progress_bar(self.progress_bar());

        let result = scheduler.run().inspect_err(|e| error!("轉檔任務執行失敗: {e}"))?;
        let report = RunReport::from_schedule(&result);

        if self.show_progress {
            print_summary(&report);
        }

        info!(
            "轉檔完成 - 成功: {}, 跳過: {}, 失敗: {}, 搬移: {}",
            report.succeeded.len(),
            report.skipped.len(),
            report.failed.len(),
            report.relocated
        );

        Ok(report)
    }

    fn scan_sources(&self) -> Result<Vec<SourceFile>> {
        self.say(&style("掃描檔案中...").dim().to_string());
        let files = discover(self.job.root(), self.job.input_format())?;

        for source in output_collisions(&files) {
            warn!(
                "輸出檔名與同資料夾的其他檔案重複，可能被跳過或覆寫: {}",
                source.path.display()
            );
        }

        if !self.settings.skip_organized_dirs {
            return Ok(files);
        }

        let mut formats: Vec<&str> = vec![self.job.input_format()];
        formats.extend(self.job.output_formats().iter().map(String::as_str));
        let before = files.len();
        let files = exclude_organized(files, self.job.root(), &formats);
        if files.len() < before {
            info!("略過 {} 個已在格式資料夾中的檔案", before - files.len());
        }
        Ok(files)
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(0);
        if let Ok(progress_style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            progress_bar.set_style(progress_style.progress_chars("#>-"));
        }
        progress_bar.set_message("轉檔中...");
        progress_bar
    }

    fn say(&self, line: &str) {
        if self.show_progress {
            println!("{line}");
        }
    }
}

fn print_summary(report: &RunReport) {
    println!();
    println!("{}", style("=== 轉檔摘要 ===").cyan().bold());
    println!("  任務: {} 個", report.total_tasks);
    println!("  成功: {} 個", style(report.succeeded.len()).green());
    if !report.skipped.is_empty() {
        println!("  跳過: {} 個", style(report.skipped.len()).yellow());
    }
    if !report.failed.is_empty() {
        println!("  失敗: {} 個", style(report.failed.len()).red());
    }
    println!("  已搬移原始檔: {} 個", report.relocated);
    if report.already_relocated > 0 {
        println!(
            "  原始檔已在目標位置: {} 個",
            style(report.already_relocated).yellow()
        );
    }
    if report.interrupted {
        println!(
            "  {}",
            style(format!("中斷，未執行: {} 個", report.abandoned())).yellow()
        );
    }

    if !report.failed.is_empty() {
        println!();
        println!("{}", style("以下檔案轉檔失敗:").red().bold());
        for source in report.failed_sources() {
            println!("- {}", source.display());
        }
        for failure in &report.failed {
            println!(
                "  {} [{}] {}",
                style("•").dim(),
                failure.target_format,
                style(&failure.detail).dim()
            );
        }
    }

    if !report.relocation_failures.is_empty() {
        println!();
        println!("{}", style("以下原始檔無法搬移:").red().bold());
        for failure in &report.relocation_failures {
            println!("- {}: {}", failure.source.display(), failure.detail);
        }
    }
}
