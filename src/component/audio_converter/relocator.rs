use super::layout::{relocation_path_for, resolve_relocation_path};
use crate::error::ConvertError;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    /// 已移動到格式資料夾
    Moved(PathBuf),
    /// 目標已存在或檔案本來就在格式資料夾中，不做任何事
    AlreadyRelocated(PathBuf),
}

/// 將原始檔移到 `<parent>/<input_format>/<name>`
///
/// 重複呼叫或重跑部分處理過的資料夾都只會得到 `AlreadyRelocated`。
pub fn relocate(source: &Path, input_format: &str) -> Result<RelocationOutcome, ConvertError> {
    let destination = relocation_path_for(source, input_format);

    if destination.exists() {
        if destination != source && source.exists() {
            warn!(
                "搬移目標已存在，保留原始檔案: {} (目標: {})",
                source.display(),
                destination.display()
            );
        } else {
            debug!("已搬移過: {}", destination.display());
        }
        return Ok(RelocationOutcome::AlreadyRelocated(destination));
    }

    if is_in_format_folder(source, input_format) {
        debug!("檔案已在格式資料夾中: {}", source.display());
        return Ok(RelocationOutcome::AlreadyRelocated(source.to_path_buf()));
    }

    let destination =
        resolve_relocation_path(source, input_format).map_err(|e| ConvertError::Relocation {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

    fs::rename(source, &destination).map_err(|e| ConvertError::Relocation {
        from: source.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    info!(
        "已搬移原始檔案: {} -> {}",
        source.display(),
        destination.display()
    );

    Ok(RelocationOutcome::Moved(destination))
}

fn is_in_format_folder(path: &Path, format: &str) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == format)
}
