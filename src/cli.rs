use crate::config::{ConverterSettings, Job};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Batch-convert audio files with ffmpeg and file them into per-format folders.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root directory containing the files to convert
    #[arg(short, long = "root-dir", value_name = "DIR")]
    pub root_dir: PathBuf,

    /// Input format (file extension without the dot)
    #[arg(short, long, value_name = "FMT")]
    pub input_format: Option<String>,

    /// Output format, repeatable or comma separated
    #[arg(short, long = "output-format", value_name = "FMT", value_delimiter = ',')]
    pub output_formats: Vec<String>,

    /// Number of concurrent conversions (defaults to the CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Overwrite outputs that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Also convert files already sitting in a format-named folder
    #[arg(long)]
    pub include_organized: bool,

    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Settings file (JSON); defaults to ./settings.json when present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// 以命令列參數覆寫設定檔
    #[must_use]
    pub fn apply_to(&self, mut settings: ConverterSettings) -> ConverterSettings {
        if let Some(format) = &self.input_format {
            settings.input_format.clone_from(format);
        }
        if !self.output_formats.is_empty() {
            settings.output_formats.clone_from(&self.output_formats);
        }
        if self.jobs.is_some() {
            settings.jobs = self.jobs;
        }
        if self.overwrite {
            settings.overwrite = true;
        }
        if self.include_organized {
            settings.skip_organized_dirs = false;
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            settings.ffmpeg_path.clone_from(ffmpeg);
        }
        settings
    }

    /// 載入設定、套用參數並建立 Job
    pub fn resolve(&self) -> Result<(Job, ConverterSettings)> {
        let settings = self.apply_to(ConverterSettings::load(self.config.as_deref())?);
        let job = Job::new(
            &self.root_dir,
            &settings.input_format,
            settings.output_formats.as_slice(),
        )
        .context("無效的轉檔設定")?;
        Ok((job, settings))
    }
}
