//! Service adapters: OS/runtime specific implementations (IO).

pub mod file_store;
pub mod memory_store;
pub mod paths;
pub mod settings;
pub mod surfaces;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use paths::{DataDirs, DATA_DIR_ENV};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
pub use surfaces::{BufferEditor, FilePreview, MemoryPreview, ScriptedPrompt, TerminalPrompt};
