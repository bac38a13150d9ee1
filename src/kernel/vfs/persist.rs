//! Store records for the VFS and its rehydration rules.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Panel, TabSession, Vfs, VfsPorts};
use crate::kernel::services::ports::PlaygroundConfig;
use crate::kernel::split::SplitLayout;
use crate::models::{FileId, FileKind, FileRecord, FolderId, FolderRecord};

pub const VFS_KEY: &str = "vfs";
pub const TABS_KEY: &str = "tabs";
pub const SPLIT_KEY: &str = "split";

/// Un-namespaced keys written by the single-editor version of the playground.
pub const LEGACY_HTML_KEY: &str = "HtmlTextEditorData";
pub const LEGACY_CSS_KEY: &str = "CssTextEditorData";
pub const LEGACY_JS_KEY: &str = "JavascriptTextEditorData";

const STARTER_HTML: &str =
    "<h1>Hello, codepad!</h1>\n<p>Edit the files on the left to get started.</p>\n";
const STARTER_CSS: &str =
    "body {\n  font-family: sans-serif;\n}\n\nh1 {\n  color: #3366cc;\n}\n";
const STARTER_JS: &str = "console.log(\"ready\");\n";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VfsRecord {
    #[serde(default)]
    pub files: BTreeMap<FileId, FileRecord>,
    #[serde(default)]
    pub folders: BTreeMap<FolderId, FolderRecord>,
    #[serde(default)]
    pub collapsed_folders: BTreeMap<FolderId, bool>,
}

/// Accepts the current shape and the older bare `{id: file}` map.
pub fn parse_vfs_record(value: serde_json::Value) -> serde_json::Result<VfsRecord> {
    let legacy = value.as_object().is_some_and(|o| !o.contains_key("files"));
    let mut record = if legacy {
        VfsRecord {
            files: serde_json::from_value(value)?,
            ..VfsRecord::default()
        }
    } else {
        serde_json::from_value(value)?
    };

    // Map keys are authoritative.
    for (id, file) in record.files.iter_mut() {
        file.id = id.clone();
    }
    for (id, folder) in record.folders.iter_mut() {
        folder.id = id.clone();
    }
    Ok(record)
}

impl Vfs {
    /// Rehydrates from the store. Missing or corrupt records fall back to
    /// defaults; an empty project is migrated from legacy keys or seeded.
    pub fn load(ports: VfsPorts, config: &PlaygroundConfig) -> Self {
        let mut vfs = Self::empty(ports, config);

        let record = vfs.read_vfs_record();
        vfs.adopt_record(record);

        vfs.tabs = match vfs.store.load_json::<TabSession>(TABS_KEY) {
            Ok(tabs) => tabs.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "tab session unreadable, starting with no tabs");
                TabSession::default()
            }
        };
        let default_layout = SplitLayout::with_orientation(config.default_orientation);
        vfs.layout = match vfs.store.load_json::<SplitLayout>(SPLIT_KEY) {
            Ok(layout) => layout.unwrap_or(default_layout),
            Err(e) => {
                tracing::warn!(error = %e, "split layout unreadable, using defaults");
                default_layout
            }
        };

        if vfs.files.is_empty() {
            if vfs.migrate_legacy() {
                tracing::info!("migrated single-editor data into files");
            } else if config.starter_files {
                vfs.seed_trio(STARTER_HTML, STARTER_CSS, STARTER_JS);
            }
        }

        vfs.sanitize_session();
        vfs.restore_editors();
        tracing::info!(
            files = vfs.files.len(),
            folders = vfs.folders.len(),
            tabs = vfs.tabs.open_tabs.len(),
            split = vfs.layout.split_mode,
            backend = vfs.store.backend_name(),
            "vfs loaded"
        );
        vfs
    }

    fn read_vfs_record(&self) -> VfsRecord {
        let value = match self.store.load_value(VFS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return VfsRecord::default(),
            Err(e) => {
                tracing::warn!(error = %e, "vfs record unreadable, starting empty");
                return VfsRecord::default();
            }
        };
        parse_vfs_record(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "vfs record has an unexpected shape, starting empty");
            VfsRecord::default()
        })
    }

    fn adopt_record(&mut self, record: VfsRecord) {
        let mut folders: Vec<FolderRecord> = record.folders.into_values().collect();
        folders.sort_by(|a, b| (a.created, &a.id).cmp(&(b.created, &b.id)));
        for folder in folders {
            self.folder_order.push(folder.id.clone());
            self.folders.insert(folder.id.clone(), folder);
        }

        let known: FxHashSet<FolderId> = self.folders.keys().cloned().collect();
        for folder in self.folders.values_mut() {
            if folder.parent_id.as_ref().is_some_and(|p| !known.contains(p)) {
                folder.parent_id = None;
            }
        }
        self.break_parent_cycles();

        let mut files: Vec<FileRecord> = record.files.into_values().collect();
        files.sort_by(|a, b| (a.created, &a.id).cmp(&(b.created, &b.id)));
        for mut file in files {
            if file.folder_id.as_ref().is_some_and(|f| !known.contains(f)) {
                file.folder_id = None;
            }
            self.file_order.push(file.id.clone());
            self.files.insert(file.id.clone(), file);
        }

        self.collapsed = record
            .collapsed_folders
            .into_iter()
            .filter(|(id, collapsed)| *collapsed && known.contains(id))
            .map(|(id, _)| id)
            .collect();
    }

    /// Detaches any folder whose parent chain leads back to itself.
    fn break_parent_cycles(&mut self) {
        for id in self.folder_order.clone() {
            let mut visited = FxHashSet::default();
            let mut cursor = self.folders.get(&id).and_then(|f| f.parent_id.clone());
            let mut cyclic = false;
            while let Some(current) = cursor {
                if current == id {
                    cyclic = true;
                    break;
                }
                if !visited.insert(current.clone()) {
                    break;
                }
                cursor = self.folders.get(&current).and_then(|f| f.parent_id.clone());
            }
            if cyclic {
                tracing::warn!(folder = %id, "folder parent chain is cyclic, moving it to the root");
                if let Some(folder) = self.folders.get_mut(&id) {
                    folder.parent_id = None;
                }
            }
        }
    }

    fn migrate_legacy(&mut self) -> bool {
        let html = self.store.get_raw(LEGACY_HTML_KEY);
        let css = self.store.get_raw(LEGACY_CSS_KEY);
        let js = self.store.get_raw(LEGACY_JS_KEY);
        if html.is_none() && css.is_none() && js.is_none() {
            return false;
        }
        self.seed_trio(
            html.as_deref().unwrap_or_default(),
            css.as_deref().unwrap_or_default(),
            js.as_deref().unwrap_or_default(),
        );
        true
    }

    fn seed_trio(&mut self, html: &str, css: &str, js: &str) {
        let html = self.insert_file("index.html", FileKind::Html, html, None);
        let css = self.insert_file("style.css", FileKind::Css, css, None);
        let js = self.insert_file("script.js", FileKind::JavaScript, js, None);
        self.tabs.open_tabs = vec![html.clone(), css, js];
        self.tabs.active_tab = Some(html);
        self.persist_vfs();
        self.persist_tabs();
        self.bump_tree();
    }

    /// Drops dangling tab references and repairs the active pointers.
    fn sanitize_session(&mut self) {
        let mut seen = FxHashSet::default();
        let files = &self.files;
        self.tabs
            .open_tabs
            .retain(|id| files.contains_key(id) && seen.insert(id.clone()));

        let open = &self.tabs.open_tabs;
        let first = open.first().cloned();
        let valid = |id: &Option<FileId>| id.as_ref().is_some_and(|id| open.contains(id));

        if !valid(&self.tabs.active_tab) {
            self.tabs.active_tab = first.clone();
        }
        if !valid(&self.layout.active_tab1) {
            self.layout.active_tab1 = None;
        }
        if !valid(&self.layout.active_tab2) {
            self.layout.active_tab2 = None;
        }

        if self.layout.split_mode {
            if self.layout.active_tab1.is_none() {
                self.layout.active_tab1 = self.tabs.active_tab.clone();
            }
            if self.layout.active_tab2.is_none() {
                self.layout.active_tab2 = self
                    .tabs
                    .open_tabs
                    .get(1)
                    .cloned()
                    .or_else(|| self.layout.active_tab1.clone());
            }
            let primary = self.layout.active_tab1.clone();
            self.set_active_file(Panel::Primary, primary);
        }

        self.layout.panel_widths = self.layout.panel_widths.normalized();
        self.layout.panel_heights = self.layout.panel_heights.normalized();
    }

    pub(super) fn vfs_record(&self) -> VfsRecord {
        VfsRecord {
            files: self
                .files
                .iter()
                .map(|(id, f)| (id.clone(), f.clone()))
                .collect(),
            folders: self
                .folders
                .iter()
                .map(|(id, f)| (id.clone(), f.clone()))
                .collect(),
            collapsed_folders: self.collapsed.iter().map(|id| (id.clone(), true)).collect(),
        }
    }

    pub(super) fn persist_vfs(&mut self) {
        let record = self.vfs_record();
        self.store.save_json(VFS_KEY, &record);
    }

    pub(super) fn persist_tabs(&mut self) {
        self.store.save_json(TABS_KEY, &self.tabs);
    }

    pub(super) fn persist_split(&mut self) {
        self.store.save_json(SPLIT_KEY, &self.layout);
    }
}
