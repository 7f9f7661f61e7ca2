use crate::error::ConvertError;
use std::io;
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<(), ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "路徑不存在".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(ConvertError::InvalidRoot {
            path: path.to_path_buf(),
            reason: "路徑不是資料夾".to_string(),
        });
    }
    Ok(())
}

/// 建立資料夾（已存在時不做事），多個執行緒同時建立同一個資料夾也不會失敗
pub fn ensure_directory_exists(path: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other,
    }
}
