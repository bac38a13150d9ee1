//! 数据目录布局
//!
//! ```text
//! <root>/store/<namespace>.<key>.json   持久化记录
//! <root>/logs/codepad.log.<date>        滚动日志
//! <root>/preview.html                   内嵌预览文档
//! ```
//!
//! 根目录按顺序取：`CODEPAD_DATA_DIR`、平台数据目录、系统临时目录。

use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "codepad";
const STORE_DIR: &str = "store";
const LOG_DIR: &str = "logs";
const PREVIEW_FILE: &str = "preview.html";
pub const DATA_DIR_ENV: &str = "CODEPAD_DATA_DIR";

/// Where a playground session keeps its store, logs and rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Env override, then the platform data dir. `None` when neither exists.
    pub fn resolve() -> Option<Self> {
        std::env::var_os(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(platform_data_dir)
            .map(Self::at)
    }

    /// Like [`DataDirs::resolve`], falling back to a temp-dir session.
    pub fn resolve_or_temp() -> Self {
        Self::resolve().unwrap_or_else(|| Self::at(std::env::temp_dir().join(APP_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root.join(STORE_DIR)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.root.join(PREVIEW_FILE)
    }

    pub fn ensure_store_dir(&self) -> io::Result<PathBuf> {
        ensure(self.store_dir())
    }

    pub fn ensure_log_dir(&self) -> io::Result<PathBuf> {
        ensure(self.log_dir())
    }
}

fn ensure(dir: PathBuf) -> io::Result<PathBuf> {
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn platform_data_dir() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library/Application Support").join(APP_NAME))
    } else if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(|d| PathBuf::from(d).join(APP_NAME))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| home().map(|h| h.join(".local/share")))
            .map(|d| d.join(APP_NAME))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
