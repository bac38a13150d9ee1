use rustc_hash::FxHashSet;

use super::{Vfs, VfsError};
use crate::models::{now_millis, FileId, FileKind, FileRecord, FolderId, FolderRecord};

impl Vfs {
    /// Inserts a record without persisting. An unknown folder places the file
    /// at the root.
    pub(super) fn insert_file(
        &mut self,
        name: &str,
        kind: FileKind,
        content: &str,
        folder: Option<FolderId>,
    ) -> FileId {
        let created = now_millis();
        let id = self.ids.file_id(created);
        let folder_id = folder.filter(|f| self.folders.contains_key(f));
        self.files.insert(
            id.clone(),
            FileRecord {
                id: id.clone(),
                name: name.to_string(),
                kind,
                content: content.to_string(),
                folder_id,
                created,
            },
        );
        self.file_order.push(id.clone());
        id
    }

    pub(super) fn insert_folder(&mut self, name: &str, parent: Option<FolderId>) -> FolderId {
        let created = now_millis();
        let id = self.ids.folder_id(created);
        let parent_id = parent.filter(|p| self.folders.contains_key(p));
        self.folders.insert(
            id.clone(),
            FolderRecord {
                id: id.clone(),
                name: name.to_string(),
                parent_id,
                created,
            },
        );
        self.folder_order.push(id.clone());
        id
    }

    pub fn create_file(
        &mut self,
        name: &str,
        kind: FileKind,
        content: &str,
        folder: Option<FolderId>,
    ) -> FileId {
        let id = self.insert_file(name, kind, content, folder);
        self.persist_vfs();
        self.bump_tree();
        tracing::debug!(file = %id, name, kind = kind.label(), "created file");
        id
    }

    pub fn create_folder(&mut self, name: &str, parent: Option<FolderId>) -> FolderId {
        let id = self.insert_folder(name, parent);
        self.persist_vfs();
        self.bump_tree();
        tracing::debug!(folder = %id, name, "created folder");
        id
    }

    pub fn delete_file(&mut self, id: &FileId) -> bool {
        let Some(name) = self.files.get(id).map(|f| f.name.clone()) else {
            return false;
        };
        if !self.prompt.confirm(&format!("Delete file \"{}\"?", name)) {
            return false;
        }

        self.close_tab(id);
        self.remove_file_record(id);
        self.persist_vfs();
        self.bump_tree();
        tracing::debug!(file = %id, name = %name, "deleted file");
        true
    }

    fn remove_file_record(&mut self, id: &FileId) {
        self.files.remove(id);
        self.file_order.retain(|f| f != id);
    }

    /// `root` and every folder below it, parents before children. Cyclic
    /// parent chains are visited once.
    pub(super) fn folder_subtree(&self, root: &FolderId) -> Vec<FolderId> {
        let mut visited = FxHashSet::default();
        let mut out = Vec::new();
        let mut queue = vec![root.clone()];
        while let Some(current) = queue.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for child in self.folders() {
                if child.parent_id.as_ref() == Some(&current) && !visited.contains(&child.id) {
                    queue.push(child.id.clone());
                }
            }
            out.push(current);
        }
        out
    }

    pub fn delete_folder(&mut self, id: &FolderId) -> bool {
        let Some(name) = self.folders.get(id).map(|f| f.name.clone()) else {
            return false;
        };
        if !self.prompt.confirm(&format!("Delete folder \"{}\"?", name)) {
            return false;
        }

        let subtree = self.folder_subtree(id);
        let doomed: FxHashSet<&FolderId> = subtree.iter().collect();
        let files: Vec<FileId> = self
            .files()
            .filter(|f| f.folder_id.as_ref().is_some_and(|p| doomed.contains(p)))
            .map(|f| f.id.clone())
            .collect();
        let nested = subtree.len() - 1;

        if !files.is_empty() || nested > 0 {
            let message = format!(
                "Folder \"{}\" is not empty ({} files, {} folders). Delete everything inside it?",
                name,
                files.len(),
                nested
            );
            if !self.prompt.confirm(&message) {
                return false;
            }
        }

        for file in &files {
            self.close_tab(file);
            self.remove_file_record(file);
        }
        for folder in &subtree {
            self.folders.remove(folder);
            self.collapsed.remove(folder);
        }
        self.folder_order.retain(|f| !doomed.contains(f));

        self.persist_vfs();
        self.bump_tree();
        tracing::debug!(
            folder = %id,
            files = files.len(),
            folders = subtree.len(),
            "deleted folder"
        );
        true
    }

    pub fn rename_file(&mut self, id: &FileId, name: &str) -> Result<bool, VfsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VfsError::EmptyName);
        }
        let Some(record) = self.files.get_mut(id) else {
            return Ok(false);
        };
        if record.name == name {
            return Ok(false);
        }
        record.name = name.to_string();
        self.persist_vfs();
        self.bump_tree();
        Ok(true)
    }

    pub fn rename_folder(&mut self, id: &FolderId, name: &str) -> Result<bool, VfsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VfsError::EmptyName);
        }
        let Some(record) = self.folders.get_mut(id) else {
            return Ok(false);
        };
        if record.name == name {
            return Ok(false);
        }
        record.name = name.to_string();
        self.persist_vfs();
        self.bump_tree();
        Ok(true)
    }

    /// Moves a file into `folder`, or to the root with `None`.
    pub fn move_file(&mut self, id: &FileId, folder: Option<FolderId>) -> bool {
        if folder.as_ref().is_some_and(|f| !self.folders.contains_key(f)) {
            return false;
        }
        let Some(record) = self.files.get_mut(id) else {
            return false;
        };
        if record.folder_id == folder {
            return false;
        }
        record.folder_id = folder;
        self.persist_vfs();
        self.bump_tree();
        true
    }

    pub fn move_folder(&mut self, id: &FolderId, parent: Option<FolderId>) -> Result<bool, VfsError> {
        if !self.folders.contains_key(id) {
            return Ok(false);
        }
        if let Some(target) = &parent {
            if !self.folders.contains_key(target) {
                return Ok(false);
            }
            if self.folder_subtree(id).contains(target) {
                return Err(VfsError::MoveIntoDescendant);
            }
        }
        let Some(record) = self.folders.get_mut(id) else {
            return Ok(false);
        };
        if record.parent_id == parent {
            return Ok(false);
        }
        record.parent_id = parent;
        self.persist_vfs();
        self.bump_tree();
        Ok(true)
    }

    pub fn toggle_folder(&mut self, id: &FolderId) -> bool {
        if !self.folders.contains_key(id) {
            return false;
        }
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.clone());
        }
        self.persist_vfs();
        self.bump_tree();
        true
    }
}
