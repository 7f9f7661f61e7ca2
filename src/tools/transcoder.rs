//! 外部轉檔工具的邊界
//!
//! 排程器只透過 [`Transcoder`] 呼叫轉檔，測試可以換成假的實作。

use crate::config::ConverterSettings;
use crate::error::TranscodeError;
use crate::tools::FfmpegCommand;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub trait Transcoder: Send + Sync {
    /// 將 `source` 轉成 `destination`，`target_format` 為目標格式（小寫、無點）
    fn transcode(
        &self,
        source: &Path,
        destination: &Path,
        target_format: &str,
    ) -> Result<(), TranscodeError>;
}

/// 以 ffmpeg 執行轉檔
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    codec_args: BTreeMap<String, Vec<String>>,
}

impl FfmpegTranscoder {
    #[must_use]
    pub const fn new(program: PathBuf, codec_args: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            program,
            codec_args,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ConverterSettings) -> Self {
        Self::new(settings.ffmpeg_path.clone(), settings.codec_args.clone())
    }

    fn codec_args_for(&self, target_format: &str) -> &[String] {
        self.codec_args
            .get(target_format)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(
        &self,
        source: &Path,
        destination: &Path,
        target_format: &str,
    ) -> Result<(), TranscodeError> {
        let mut command = FfmpegCommand::new(&self.program, source, destination)
            .with_codec_args(self.codec_args_for(target_format))
            .build_command();

        debug!("執行: {command:?}");

        let output = command.output().map_err(|source| TranscodeError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TranscodeError::ExitStatus {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}
