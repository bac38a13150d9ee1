//! Service ports: traits + data contracts.

pub mod editor;
pub mod settings;
pub mod store;

pub use editor::{ConfirmPort, EditorSurface, PreviewSurface};
pub use settings::{PlaygroundConfig, Settings};
pub use store::{KeyValueStore, PersistentStore, Result as StoreResult, StoreError};
