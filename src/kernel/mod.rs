//! Headless playground core: the VFS, layout, formatters and sharing.

pub mod debounce;
pub mod format;
pub mod library;
pub mod services;
pub mod share;
pub mod split;
pub mod vfs;

pub use debounce::Debouncer;
pub use format::{format_css, format_html, format_js, format_source};
pub use library::{import_snippet, Library, Snippet};
pub use share::SharedSources;
pub use split::{DividerTrack, Orientation, PanelSizes, SplitLayout};
pub use vfs::{compose_document, Panel, TabSession, TreeEntry, TreeRow, Vfs, VfsError, VfsPorts};
