//! 輸出與搬移路徑的規則
//!
//! 所有格式資料夾都建在原始檔所在的資料夾下：`D/a.mp3` 的 ogg 輸出為
//! `D/ogg/a.ogg`，搬移後的原始檔為 `D/mp3/a.mp3`。
//!
//! 同一資料夾中只差在副檔名大小寫的檔案（`a.mp3` 與 `a.MP3`）會對應到同一個輸出，
//! 後處理的那個會被跳過，開啟覆寫時則會蓋掉前一個。

use crate::tools::{SourceFile, ensure_directory_exists};
use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// `<parent>/<format>`
#[must_use]
pub fn format_directory(source: &Path, format: &str) -> PathBuf {
    source.parent().unwrap_or(Path::new(".")).join(format)
}

/// `<parent>/<format>/<stem>.<format>`，不建立資料夾
#[must_use]
pub fn output_path_for(source: &Path, target_format: &str) -> PathBuf {
    let mut file_name: OsString = source
        .file_stem()
        .map_or_else(|| OsString::from("output"), ToOwned::to_owned);
    file_name.push(".");
    file_name.push(target_format);

    format_directory(source, target_format).join(file_name)
}

/// `<parent>/<input_format>/<name>`，不建立資料夾
#[must_use]
pub fn relocation_path_for(source: &Path, input_format: &str) -> PathBuf {
    let file_name = source.file_name().unwrap_or(source.as_os_str());
    format_directory(source, input_format).join(file_name)
}

/// 計算輸出路徑並確保資料夾存在
pub fn resolve_output_path(source: &Path, target_format: &str) -> io::Result<PathBuf> {
    ensure_directory_exists(&format_directory(source, target_format))?;
    Ok(output_path_for(source, target_format))
}

/// 計算搬移路徑並確保資料夾存在
pub fn resolve_relocation_path(source: &Path, input_format: &str) -> io::Result<PathBuf> {
    ensure_directory_exists(&format_directory(source, input_format))?;
    Ok(relocation_path_for(source, input_format))
}

/// 找出輸出路徑與前面的檔案重複的原始檔（依掃描順序，第一個不算）
#[must_use]
pub fn output_collisions(sources: &[SourceFile]) -> Vec<&SourceFile> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    sources
        .iter()
        .filter(|source| {
            let parent = source.path.parent().unwrap_or(Path::new("."));
            let stem = source.path.file_stem().unwrap_or(source.path.as_os_str());
            !seen.insert(parent.join(stem))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/music/album/track.mp3"), "ogg"),
            PathBuf::from("/music/album/ogg/track.ogg")
        );
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        assert_eq!(
            output_path_for(Path::new("/music/01. intro.live.mp3"), "flac"),
            PathBuf::from("/music/flac/01. intro.live.flac")
        );
    }

    #[test]
    fn test_relocation_path_keeps_name() {
        assert_eq!(
            relocation_path_for(Path::new("/music/Track.MP3"), "mp3"),
            PathBuf::from("/music/mp3/Track.MP3")
        );
    }

    #[test]
    fn test_resolve_creates_directory_idempotently() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp3");

        let first = resolve_output_path(&source, "ogg").unwrap();
        let second = resolve_output_path(&source, "ogg").unwrap();

        assert_eq!(first, second);
        assert!(temp_dir.path().join("ogg").is_dir());
        assert!(!first.exists());
    }

    #[test]
    fn test_output_collisions_same_stem_different_case_extension() {
        let sources: Vec<SourceFile> = [
            "/music/a.MP3",
            "/music/a.mp3",
            "/music/b.mp3",
            "/music/live/a.mp3",
        ]
        .iter()
        .enumerate()
        .map(|(index, path)| SourceFile {
            index,
            path: PathBuf::from(path),
        })
        .collect();

        let collisions = output_collisions(&sources);

        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].path, PathBuf::from("/music/a.mp3"));
    }
}
