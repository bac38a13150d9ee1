//! 基于目录的持久化存储
//!
//! 每个 key 对应目录下的一个 `<key>.json` 文件，写入采用临时文件 + rename。

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::kernel::services::ports::store::{KeyValueStore, Result, StoreError};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let file_stem = sanitize_key(key)?;
        Ok(self.dir.join(format!("{}.{}", file_stem, EXTENSION)))
    }
}

/// 只允许安全字符，避免 key 逃出存储目录
fn sanitize_key(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(StoreError::Unavailable("empty key".to_string()));
    }
    let cleaned: String = key
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.starts_with('.') {
        return Err(StoreError::Unavailable(format!("invalid key: {}", key)));
    }
    Ok(cleaned)
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &'static str {
        "FileStore"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "store write");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/file_store.rs"]
mod tests;
