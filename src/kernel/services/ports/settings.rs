use serde::{Deserialize, Serialize};

use crate::kernel::split::Orientation;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub playground: PlaygroundConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    #[serde(alias = "autosaveDelayMs")]
    pub autosave_delay_ms: u64,
    #[serde(alias = "previewDelayMs")]
    pub preview_delay_ms: u64,
    pub namespace: String,
    #[serde(alias = "starterFiles")]
    pub starter_files: bool,
    #[serde(alias = "defaultOrientation")]
    pub default_orientation: Orientation,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 500,
            preview_delay_ms: 300,
            namespace: "codepad".to_string(),
            starter_files: true,
            default_orientation: Orientation::Horizontal,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
