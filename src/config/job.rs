use crate::error::ConvertError;
use crate::tools::validate_directory_exists;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static FORMAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("format pattern is valid"));

/// 一次執行的完整設定，建立後不可變
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    root: PathBuf,
    input_format: String,
    output_formats: Vec<String>,
}

impl Job {
    /// 驗證並建立 Job
    ///
    /// 格式名稱會正規化為小寫、去掉開頭的點；重複的輸出格式只保留第一個。
    pub fn new<S: AsRef<str>>(
        root: &Path,
        input_format: &str,
        output_formats: &[S],
    ) -> Result<Self, ConvertError> {
        validate_directory_exists(root)?;

        let input_format = normalize_format(input_format)?;

        let mut formats: Vec<String> = Vec::with_capacity(output_formats.len());
        for format in output_formats {
            let format = normalize_format(format.as_ref())?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(ConvertError::NoOutputFormats);
        }

        Ok(Self {
            root: root.to_path_buf(),
            input_format,
            output_formats: formats,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn input_format(&self) -> &str {
        &self.input_format
    }

    #[must_use]
    pub fn output_formats(&self) -> &[String] {
        &self.output_formats
    }
}

/// `.MP3` -> `mp3`
pub fn normalize_format(raw: &str) -> Result<String, ConvertError> {
    let format = raw.trim().trim_start_matches('.').to_lowercase();
    if FORMAT_PATTERN.is_match(&format) {
        Ok(format)
    } else {
        Err(ConvertError::InvalidFormat(raw.to_string()))
    }
}
