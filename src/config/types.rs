use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_INPUT_FORMAT: &str = "mp3";
pub const DEFAULT_OUTPUT_FORMATS: [&str; 2] = ["ogg", "flac"];
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// 使用者設定（settings.json）
///
/// 每個欄位都有預設值，設定檔只需要寫要覆寫的部分。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// 預設輸入格式
    pub input_format: String,
    /// 預設輸出格式
    pub output_formats: Vec<String>,
    /// 同時執行的轉檔數量，`None` 表示依 CPU 核心數
    pub jobs: Option<usize>,
    pub ffmpeg_path: PathBuf,
    /// 各輸出格式額外傳給 ffmpeg 的編碼參數
    pub codec_args: BTreeMap<String, Vec<String>>,
    /// 輸出檔案已存在時是否覆寫
    pub overwrite: bool,
    /// 掃描時略過已在格式資料夾中的檔案
    pub skip_organized_dirs: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            input_format: DEFAULT_INPUT_FORMAT.to_string(),
            output_formats: DEFAULT_OUTPUT_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
            jobs: None,
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            codec_args: default_codec_args(),
            overwrite: false,
            skip_organized_dirs: true,
        }
    }
}

impl ConverterSettings {
    /// 實際使用的執行緒數量
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.jobs
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
    }
}

fn default_codec_args() -> BTreeMap<String, Vec<String>> {
    let mut args = BTreeMap::new();
    args.insert(
        "ogg".to_string(),
        ["-c:a", "libvorbis", "-q:a", "5"]
            .iter()
            .map(ToString::to_string)
            .collect(),
    );
    args.insert(
        "flac".to_string(),
        ["-c:a", "flac"].iter().map(ToString::to_string).collect(),
    );
    args
}
