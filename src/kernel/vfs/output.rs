use super::{Panel, Vfs};
use crate::kernel::services::ports::PreviewSurface;
use crate::kernel::share::{self, SharedSources};
use crate::models::{FileId, FileKind};

/// Builds the preview document: CSS inlined in `<head>`, HTML then JS in `<body>`.
pub fn compose_document(sources: &SharedSources) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <style>\n{css}\n</style>\n\
         </head>\n\
         <body>\n\
         {html}\n\
         <script>\n{js}\n</script>\n\
         </body>\n\
         </html>\n",
        css = sources.css,
        html = sources.html,
        js = sources.js,
    )
}

impl Vfs {
    /// Current text of `id`: the live buffer if a panel shows it, otherwise
    /// the stored record.
    pub fn content_of(&self, id: &FileId) -> Option<String> {
        for &panel in self.live_panels() {
            if self.active_file(panel) == Some(id) {
                return Some(self.editor(panel).get_value());
            }
        }
        self.files.get(id).map(|f| f.content.clone())
    }

    fn joined(&self, kind: FileKind) -> String {
        let parts: Vec<String> = self
            .files()
            .filter(|f| f.kind == kind)
            .filter_map(|f| self.content_of(&f.id))
            .collect();
        parts.join("\n")
    }

    fn has_kind(&self, kind: FileKind) -> bool {
        self.files().any(|f| f.kind == kind)
    }

    /// All sources concatenated per kind, in insertion order.
    pub fn sources(&self) -> SharedSources {
        SharedSources {
            html: self.joined(FileKind::Html),
            css: self.joined(FileKind::Css),
            js: self.joined(FileKind::JavaScript),
        }
    }

    /// Recomputes the preview. `None` (and cleared previews) when the
    /// project has no HTML file.
    pub fn update_output(&mut self) -> Option<String> {
        self.preview_refresh.cancel();
        if !self.has_kind(FileKind::Html) {
            self.preview.clear();
            if let Some(detached) = self.detached.as_mut() {
                if detached.is_alive() {
                    detached.clear();
                }
            }
            self.drop_dead_preview();
            return None;
        }

        let document = compose_document(&self.sources());
        self.preview.render(&document);
        if let Some(detached) = self.detached.as_mut() {
            if detached.is_alive() {
                detached.render(&document);
            }
        }
        self.drop_dead_preview();
        Some(document)
    }

    fn drop_dead_preview(&mut self) {
        if self.detached.as_ref().is_some_and(|d| !d.is_alive()) {
            tracing::debug!("detached preview closed, dropping it");
            self.detached = None;
        }
    }

    /// Opens a second preview target mirroring the embedded one.
    pub fn attach_detached_preview(&mut self, mut surface: Box<dyn PreviewSurface>) {
        if self.has_kind(FileKind::Html) {
            surface.render(&compose_document(&self.sources()));
        }
        self.detached = Some(surface);
    }

    pub fn detach_preview(&mut self) -> bool {
        self.detached.take().is_some()
    }

    pub fn has_detached_preview(&self) -> bool {
        self.detached.is_some()
    }

    /// Downloadable single-text bundle: all HTML, then CSS, then JS.
    pub fn export_bundle(&self) -> String {
        let sources = self.sources();
        format!("{}{}{}", sources.html, sources.css, sources.js)
    }

    pub fn share_token(&self) -> String {
        share::encode(&self.sources())
    }

    /// Replaces the whole project with the decoded sources. A malformed
    /// token leaves everything untouched.
    pub fn load_shared(&mut self, token: &str) -> bool {
        let Some(sources) = share::decode(token) else {
            return false;
        };

        self.files.clear();
        self.file_order.clear();
        self.folders.clear();
        self.folder_order.clear();
        self.collapsed.clear();
        self.tabs = Default::default();
        self.layout.active_tab1 = None;
        self.layout.active_tab2 = None;

        let html = self.insert_file("shared.html", FileKind::Html, &sources.html, None);
        let css = self.insert_file("shared.css", FileKind::Css, &sources.css, None);
        let js = self.insert_file("shared.js", FileKind::JavaScript, &sources.js, None);
        self.tabs.open_tabs = vec![html.clone(), css.clone(), js];
        self.set_active_file(Panel::Primary, Some(html));
        if self.layout.split_mode {
            self.set_active_file(Panel::Secondary, Some(css));
        }

        self.restore_editors();
        self.persist_vfs();
        self.persist_tabs();
        self.persist_split();
        self.bump_tree();
        self.update_output();
        tracing::info!(
            html = sources.html.len(),
            css = sources.css.len(),
            js = sources.js.len(),
            "loaded shared project"
        );
        true
    }

    /// Handles a URL fragment change; empty fragments are ignored.
    pub fn on_fragment_change(&mut self, fragment: &str) -> bool {
        let token = fragment.trim().trim_start_matches('#');
        if token.is_empty() {
            return false;
        }
        self.load_shared(token)
    }
}
