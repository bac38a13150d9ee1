//! Id allocation for files and folders.
//!
//! Ids are `<created ms, hex>-<sequence, hex>-<random>`. The sequence is
//! per-generator and monotonic, so ids handed out by one generator sort in
//! creation order even when many are allocated within the same millisecond.

use std::time::{SystemTime, UNIX_EPOCH};

use super::file::{FileId, FolderId};

const RANDOM_SUFFIX_LEN: usize = 8;

#[derive(Debug, Default)]
pub struct IdGenerator {
    next_seq: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next_seq: 0 }
    }

    pub fn file_id(&mut self, created: u64) -> FileId {
        FileId::new(self.next_raw("f", created))
    }

    pub fn folder_id(&mut self, created: u64) -> FolderId {
        FolderId::new(self.next_raw("d", created))
    }

    fn next_raw(&mut self, prefix: &str, created: u64) -> String {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        let random = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "{prefix}{created:011x}-{seq:06x}-{}",
            &random[..RANDOM_SUFFIX_LEN]
        )
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/models/ids.rs"]
mod tests;
