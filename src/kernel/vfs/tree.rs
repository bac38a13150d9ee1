use rustc_hash::FxHashSet;

use super::{Panel, Vfs};
use crate::models::{FileId, FileKind, FolderId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Folder {
        id: FolderId,
        collapsed: bool,
    },
    File {
        id: FileId,
        kind: FileKind,
        open: bool,
        active: bool,
    },
}

/// One visible line of the file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub entry: TreeEntry,
}

impl Vfs {
    /// Depth-first rows, folders before files at each level, children of
    /// collapsed folders hidden.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut visited = FxHashSet::default();
        self.push_level(None, 0, &mut visited, &mut rows);
        rows
    }

    fn push_level(
        &self,
        parent: Option<&FolderId>,
        depth: usize,
        visited: &mut FxHashSet<FolderId>,
        rows: &mut Vec<TreeRow>,
    ) {
        for folder in self.folders() {
            if folder.parent_id.as_ref() != parent || !visited.insert(folder.id.clone()) {
                continue;
            }
            let collapsed = self.collapsed.contains(&folder.id);
            rows.push(TreeRow {
                depth,
                name: folder.name.clone(),
                entry: TreeEntry::Folder {
                    id: folder.id.clone(),
                    collapsed,
                },
            });
            if !collapsed {
                self.push_level(Some(&folder.id), depth + 1, visited, rows);
            }
        }

        for file in self.files() {
            if file.folder_id.as_ref() != parent {
                continue;
            }
            let active = [Panel::Primary, Panel::Secondary]
                .into_iter()
                .any(|panel| self.active_file(panel) == Some(&file.id));
            rows.push(TreeRow {
                depth,
                name: file.name.clone(),
                entry: TreeEntry::File {
                    id: file.id.clone(),
                    kind: file.kind,
                    open: self.tabs.contains(&file.id),
                    active,
                },
            });
        }
    }
}
