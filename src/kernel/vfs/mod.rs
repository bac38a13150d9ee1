//! In-memory virtual file system: files, folders, open tabs, the two editor
//! panels and everything persisted about them.
//!
//! Every mutator runs to completion and persists synchronously. The one rule
//! callers rely on is flush-before-switch: a panel's live editor buffer is
//! written back to its file record before that panel shows anything else.

mod entries;
mod output;
mod persist;
mod split_view;
mod tabs;
mod tree;

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::time::Instant;

use crate::kernel::debounce::Debouncer;
use crate::kernel::format::format_source;
use crate::kernel::services::ports::{
    ConfirmPort, EditorSurface, PersistentStore, PlaygroundConfig, PreviewSurface,
};
use crate::kernel::split::{DividerDrag, SplitLayout};
use crate::models::{FileId, FileRecord, FolderId, FolderRecord, IdGenerator};

pub use output::compose_document;
pub use tabs::TabSession;
pub use tree::{TreeEntry, TreeRow};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    Primary,
    Secondary,
}

impl Panel {
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    EmptyName,
    MoveIntoDescendant,
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::EmptyName => write!(f, "name must not be empty"),
            VfsError::MoveIntoDescendant => {
                write!(f, "cannot move a folder into its own subtree")
            }
        }
    }
}

impl std::error::Error for VfsError {}

/// The collaborators a [`Vfs`] drives.
pub struct VfsPorts {
    pub store: PersistentStore,
    pub primary: Box<dyn EditorSurface>,
    pub secondary: Box<dyn EditorSurface>,
    pub preview: Box<dyn PreviewSurface>,
    pub prompt: Box<dyn ConfirmPort>,
}

pub struct Vfs {
    files: FxHashMap<FileId, FileRecord>,
    file_order: Vec<FileId>,
    folders: FxHashMap<FolderId, FolderRecord>,
    folder_order: Vec<FolderId>,
    collapsed: FxHashSet<FolderId>,
    tabs: TabSession,
    layout: SplitLayout,
    drag: Option<DividerDrag>,
    ids: IdGenerator,
    store: PersistentStore,
    primary: Box<dyn EditorSurface>,
    secondary: Box<dyn EditorSurface>,
    preview: Box<dyn PreviewSurface>,
    detached: Option<Box<dyn PreviewSurface>>,
    prompt: Box<dyn ConfirmPort>,
    autosave: Debouncer,
    preview_refresh: Debouncer,
    tree_version: u64,
}

impl fmt::Debug for Vfs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vfs")
            .field("files", &self.files.len())
            .field("folders", &self.folders.len())
            .field("tabs", &self.tabs)
            .field("layout", &self.layout)
            .field("store", &self.store)
            .finish()
    }
}

impl Vfs {
    fn empty(ports: VfsPorts, config: &PlaygroundConfig) -> Self {
        let VfsPorts {
            store,
            primary,
            secondary,
            preview,
            prompt,
        } = ports;
        Self {
            files: FxHashMap::default(),
            file_order: Vec::new(),
            folders: FxHashMap::default(),
            folder_order: Vec::new(),
            collapsed: FxHashSet::default(),
            tabs: TabSession::default(),
            layout: SplitLayout::with_orientation(config.default_orientation),
            drag: None,
            ids: IdGenerator::new(),
            store,
            primary,
            secondary,
            preview,
            detached: None,
            prompt,
            autosave: Debouncer::from_millis(config.autosave_delay_ms),
            preview_refresh: Debouncer::from_millis(config.preview_delay_ms),
            tree_version: 0,
        }
    }

    pub fn file(&self, id: &FileId) -> Option<&FileRecord> {
        self.files.get(id)
    }

    pub fn folder(&self, id: &FolderId) -> Option<&FolderRecord> {
        self.folders.get(id)
    }

    /// Files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.file_order.iter().filter_map(|id| self.files.get(id))
    }

    /// Folders in insertion order.
    pub fn folders(&self) -> impl Iterator<Item = &FolderRecord> + '_ {
        self.folder_order.iter().filter_map(|id| self.folders.get(id))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn is_collapsed(&self, id: &FolderId) -> bool {
        self.collapsed.contains(id)
    }

    pub fn tabs(&self) -> &TabSession {
        &self.tabs
    }

    pub fn open_tabs(&self) -> &[FileId] {
        &self.tabs.open_tabs
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    pub fn is_split(&self) -> bool {
        self.layout.split_mode
    }

    /// Bumped whenever the tree view needs re-rendering.
    pub fn tree_version(&self) -> u64 {
        self.tree_version
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistentStore {
        &mut self.store
    }

    pub fn editor(&self, panel: Panel) -> &dyn EditorSurface {
        match panel {
            Panel::Primary => self.primary.as_ref(),
            Panel::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn editor_mut(&mut self, panel: Panel) -> &mut dyn EditorSurface {
        match panel {
            Panel::Primary => self.primary.as_mut(),
            Panel::Secondary => self.secondary.as_mut(),
        }
    }

    pub fn prompt_mut(&mut self) -> &mut dyn ConfirmPort {
        self.prompt.as_mut()
    }

    /// File shown in `panel`. Outside split mode only the primary panel has one.
    pub fn active_file(&self, panel: Panel) -> Option<&FileId> {
        match (self.layout.split_mode, panel) {
            (false, Panel::Primary) => self.tabs.active_tab.as_ref(),
            (false, Panel::Secondary) => None,
            (true, Panel::Primary) => self.layout.active_tab1.as_ref(),
            (true, Panel::Secondary) => self.layout.active_tab2.as_ref(),
        }
    }

    fn set_active_file(&mut self, panel: Panel, id: Option<FileId>) {
        match (self.layout.split_mode, panel) {
            (false, Panel::Primary) => self.tabs.active_tab = id,
            (false, Panel::Secondary) => {}
            (true, Panel::Primary) => {
                self.tabs.active_tab = id.clone();
                self.layout.active_tab1 = id;
            }
            (true, Panel::Secondary) => self.layout.active_tab2 = id,
        }
    }

    fn live_panels(&self) -> &'static [Panel] {
        if self.layout.split_mode {
            &[Panel::Primary, Panel::Secondary]
        } else {
            &[Panel::Primary]
        }
    }

    fn bump_tree(&mut self) {
        self.tree_version = self.tree_version.wrapping_add(1);
    }

    /// Notifies the kernel of an edit in `panel`; restarts both debounce
    /// windows.
    pub fn on_editor_input(&mut self, panel: Panel, now: Instant) {
        if self.active_file(panel).is_none() {
            return;
        }
        self.autosave.schedule(now);
        self.preview_refresh.schedule(now);
    }

    /// Runs whatever debounced work is due. Returns `true` if anything ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut ran = false;
        if self.autosave.fire_due(now) {
            let changed = self.flush_live_panels();
            if changed {
                self.persist_vfs();
            }
            tracing::debug!(changed, "autosave");
            ran = true;
        }
        if self.preview_refresh.fire_due(now) {
            self.update_output();
            ran = true;
        }
        ran
    }

    pub fn has_pending_work(&self) -> bool {
        self.autosave.is_pending() || self.preview_refresh.is_pending()
    }

    /// Re-indents the buffer of `panel` with the formatter for its file kind.
    pub fn format_active(&mut self, panel: Panel) -> bool {
        let Some(id) = self.active_file(panel).cloned() else {
            return false;
        };
        let Some(kind) = self.files.get(&id).map(|f| f.kind) else {
            return false;
        };

        let text = self.editor(panel).get_value();
        let formatted = format_source(kind, &text);
        if formatted == text {
            return false;
        }

        self.editor_mut(panel).set_value(&formatted);
        self.flush_panel(panel);
        self.persist_vfs();
        tracing::debug!(file = %id, kind = kind.label(), "formatted active file");
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/vfs.rs"]
mod tests;
