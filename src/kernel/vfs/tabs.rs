use serde::{Deserialize, Serialize};

use super::{Panel, Vfs};
use crate::models::FileId;

/// Open tabs shared by both panels plus the single-panel active pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSession {
    #[serde(default)]
    pub open_tabs: Vec<FileId>,
    #[serde(default)]
    pub active_tab: Option<FileId>,
}

impl TabSession {
    pub fn position(&self, id: &FileId) -> Option<usize> {
        self.open_tabs.iter().position(|t| t == id)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.position(id).is_some()
    }

    /// Tab that takes over after the tab at `closed_index` was removed:
    /// the one just before it, or the new first tab.
    pub fn fallback_for(&self, closed_index: usize) -> Option<FileId> {
        if self.open_tabs.is_empty() {
            return None;
        }
        let index = closed_index
            .saturating_sub(1)
            .min(self.open_tabs.len() - 1);
        self.open_tabs.get(index).cloned()
    }
}

impl Vfs {
    /// Copies the live buffer of `panel` into its file record and into the
    /// other panel if it shows the same file. Returns `true` if the record
    /// changed. Does not persist.
    pub(super) fn flush_panel(&mut self, panel: Panel) -> bool {
        let Some(id) = self.active_file(panel).cloned() else {
            return false;
        };
        let content = self.editor(panel).get_value();
        let Some(record) = self.files.get_mut(&id) else {
            return false;
        };
        if record.content == content {
            return false;
        }
        record.content = content.clone();
        self.sync_twin(panel, &id, &content);
        true
    }

    /// Flushes every live panel. A buffer still equal to its record is left
    /// alone, so a stale twin never overwrites the panel that was edited.
    pub(super) fn flush_live_panels(&mut self) -> bool {
        let mut pending = Vec::new();
        for &panel in self.live_panels() {
            let Some(id) = self.active_file(panel) else {
                continue;
            };
            let Some(record) = self.files.get(id) else {
                continue;
            };
            let content = self.editor(panel).get_value();
            if content != record.content {
                pending.push((panel, id.clone(), content));
            }
        }

        let flushed = !pending.is_empty();
        for (panel, id, content) in pending {
            if let Some(record) = self.files.get_mut(&id) {
                record.content = content.clone();
            }
            self.sync_twin(panel, &id, &content);
        }
        flushed
    }

    /// Both panels may show one file; keep the other buffer in step.
    fn sync_twin(&mut self, panel: Panel, id: &FileId, content: &str) {
        if self.layout.split_mode && self.active_file(panel.other()) == Some(id) {
            self.editor_mut(panel.other()).set_value(content);
        }
    }

    pub(super) fn load_into_panel(&mut self, panel: Panel, id: Option<&FileId>) {
        let content = id.and_then(|id| self.files.get(id)).map(|f| f.content.clone());
        let editor = self.editor_mut(panel);
        match content {
            Some(content) => {
                editor.set_value(&content);
                editor.enable();
            }
            None => {
                editor.set_value("");
                editor.disable();
            }
        }
    }

    /// Pushes each panel's active file into its editor, disabling idle panels.
    pub(super) fn restore_editors(&mut self) {
        let primary = self.active_file(Panel::Primary).cloned();
        self.load_into_panel(Panel::Primary, primary.as_ref());
        let secondary = self.active_file(Panel::Secondary).cloned();
        self.load_into_panel(Panel::Secondary, secondary.as_ref());
    }

    pub fn save_current_content(&mut self) {
        self.save_panel_content(Panel::Primary);
    }

    pub fn save_secondary_content(&mut self) {
        self.save_panel_content(Panel::Secondary);
    }

    fn save_panel_content(&mut self, panel: Panel) {
        if self.active_file(panel).is_none() {
            return;
        }
        self.flush_panel(panel);
        self.persist_vfs();
    }

    pub fn open_tab(&mut self, id: &FileId) -> bool {
        if !self.files.contains_key(id) {
            return false;
        }
        if !self.tabs.contains(id) {
            self.tabs.open_tabs.push(id.clone());
        }
        self.switch_to_tab(id, Panel::Primary);
        true
    }

    /// Makes `id` the active file of `panel` (the primary panel outside
    /// split mode), flushing whatever the panel showed before.
    pub fn switch_to_tab(&mut self, id: &FileId, panel: Panel) -> bool {
        if !self.files.contains_key(id) {
            return false;
        }
        if !self.tabs.contains(id) {
            self.tabs.open_tabs.push(id.clone());
        }
        let panel = if self.layout.split_mode {
            panel
        } else {
            Panel::Primary
        };
        if self.active_file(panel) == Some(id) {
            self.persist_tabs();
            return false;
        }

        let mut flushed = self.flush_panel(panel);
        // The other panel may hold unsaved edits of the very file we load.
        if self.layout.split_mode && self.active_file(panel.other()) == Some(id) {
            flushed |= self.flush_panel(panel.other());
        }

        self.set_active_file(panel, Some(id.clone()));
        self.load_into_panel(panel, Some(id));

        if flushed {
            self.persist_vfs();
        }
        self.persist_tabs();
        if self.layout.split_mode {
            self.persist_split();
        }
        tracing::debug!(file = %id, ?panel, "switched tab");
        true
    }

    pub fn close_tab(&mut self, id: &FileId) -> bool {
        let Some(index) = self.tabs.position(id) else {
            return false;
        };

        // The fallback may already sit in the other panel with unsaved edits.
        let flushed = self.flush_live_panels();
        let vacated: Vec<Panel> = self
            .live_panels()
            .iter()
            .copied()
            .filter(|&panel| self.active_file(panel) == Some(id))
            .collect();

        self.tabs.open_tabs.remove(index);
        let fallback = self.tabs.fallback_for(index);

        for panel in vacated {
            self.set_active_file(panel, fallback.clone());
            self.load_into_panel(panel, fallback.as_ref());
        }
        if self.tabs.active_tab.as_ref() == Some(id) {
            self.tabs.active_tab = fallback;
        }

        if flushed {
            self.persist_vfs();
        }
        self.persist_tabs();
        if self.layout.split_mode {
            self.persist_split();
        }
        tracing::debug!(file = %id, index, "closed tab");
        true
    }
}
