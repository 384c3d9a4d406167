use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::model::Store;

const STORE_FILE_NAME: &str = "tasks.json";

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("COZYDO_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::persistence("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("cozydo").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::persistence("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cozydo")
            .join(STORE_FILE_NAME))
    }
}

/// A missing file is an empty store, never an error.
pub fn load_store(path: &Path) -> Result<Store, AppError> {
    if !path.exists() {
        return Ok(Store::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|err| AppError::persistence(err.to_string()))?;
    serde_json::from_str(&content).map_err(|err| AppError::persistence(err.to_string()))
}

/// Rewrites the whole file from the in-memory store.
pub fn save_store(path: &Path, store: &Store) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::persistence(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(store)
        .map_err(|err| AppError::persistence(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::persistence(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|err| AppError::persistence(err.to_string()))?;
    }

    Ok(())
}
