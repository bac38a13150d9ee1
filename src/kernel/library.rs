//! Named snapshots of a project's sources, kept in the store under `library`.

use serde::{Deserialize, Serialize};

use crate::kernel::services::ports::{ConfirmPort, PersistentStore};
use crate::kernel::share::SharedSources;
use crate::kernel::vfs::Vfs;
use crate::models::{now_millis, FileKind, FolderId};

pub const LIBRARY_KEY: &str = "library";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    #[serde(flatten)]
    pub sources: SharedSources,
    #[serde(default)]
    pub created: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    snippets: Vec<Snippet>,
}

impl Library {
    pub fn load(store: &PersistentStore) -> Self {
        match store.load_json::<Library>(LIBRARY_KEY) {
            Ok(library) => library.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "snippet library unreadable, starting empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut PersistentStore) {
        store.save_json(LIBRARY_KEY, self);
    }

    /// Stores `sources` under `name`, replacing a snippet of the same name.
    /// Returns `true` if the name was new.
    pub fn add(&mut self, name: &str, sources: SharedSources) -> bool {
        let snippet = Snippet {
            name: name.to_string(),
            sources,
            created: now_millis(),
        };
        match self.snippets.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                *existing = snippet;
                false
            }
            None => {
                self.snippets.push(snippet);
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.snippets.len();
        self.snippets.retain(|s| s.name != name);
        self.snippets.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snippet> + '_ {
        self.snippets.iter()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Copies `snippet` into a new folder of `target`, one file per non-empty
/// source. Without a project a notice is shown instead.
pub fn import_snippet(
    target: Option<&mut Vfs>,
    snippet: &Snippet,
    notices: &mut dyn ConfirmPort,
) -> Option<FolderId> {
    let Some(vfs) = target else {
        notices.notice(&format!(
            "Cannot import \"{}\": no project is open yet.",
            snippet.name
        ));
        return None;
    };

    let folder = vfs.create_folder(&snippet.name, None);
    let parts = [
        (FileKind::Html, &snippet.sources.html),
        (FileKind::Css, &snippet.sources.css),
        (FileKind::JavaScript, &snippet.sources.js),
    ];
    let mut first = None;
    for (kind, content) in parts {
        if content.is_empty() {
            continue;
        }
        let name = format!("{}.{}", snippet.name, kind.extension());
        let id = vfs.create_file(&name, kind, content, Some(folder.clone()));
        first.get_or_insert(id);
    }
    if let Some(id) = first {
        vfs.open_tab(&id);
    }
    tracing::debug!(snippet = %snippet.name, folder = %folder, "imported snippet");
    Some(folder)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/library.rs"]
mod tests;
