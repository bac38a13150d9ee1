//! 数据模型层

pub mod file;
pub mod ids;

pub use file::{FileId, FileKind, FileRecord, FolderId, FolderRecord};
pub use ids::{now_millis, IdGenerator};
