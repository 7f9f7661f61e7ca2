use crate::error::ConvertError;
use crate::tools::validate_directory_exists;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描到的待轉檔原始檔
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 掃描順序，用於結果排序
    pub index: usize,
    pub path: PathBuf,
}

/// 遞迴掃描 `root` 下副檔名（不分大小寫）為 `input_format` 的檔案，依路徑排序
pub fn discover(root: &Path, input_format: &str) -> Result<Vec<SourceFile>, ConvertError> {
    validate_directory_exists(root)?;

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), input_format))
        .map(walkdir::DirEntry::into_path)
        .collect();

    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| SourceFile { index, path })
        .collect())
}

/// 排除已經放在格式資料夾（例如 `mp3/`、`ogg/`）裡的檔案，並重新編號
///
/// 只看 `root` 底下的資料夾；`root` 本身叫 `mp3` 時，直接放在裡面的檔案仍會保留。
#[must_use]
pub fn exclude_organized(
    files: Vec<SourceFile>,
    root: &Path,
    formats: &[&str],
) -> Vec<SourceFile> {
    files
        .into_iter()
        .filter(|file| !is_in_format_folder(&file.path, root, formats))
        .enumerate()
        .map(|(index, file)| SourceFile {
            index,
            path: file.path,
        })
        .collect()
}

fn is_in_format_folder(path: &Path, root: &Path, formats: &[&str]) -> bool {
    path.parent()
        .filter(|parent| *parent != root)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .is_some_and(|name| formats.iter().any(|f| name.eq_ignore_ascii_case(f)))
}

fn has_extension(path: &Path, format: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format))
}
