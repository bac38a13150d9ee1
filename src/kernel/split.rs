//! Two-panel layout state.

use serde::{Deserialize, Serialize};

use crate::models::FileId;

pub const MIN_PANEL_PERCENT: f64 = 20.0;
pub const MAX_PANEL_PERCENT: f64 = 80.0;

/// `Horizontal` lays the panels side by side (the divider edits widths),
/// `Vertical` stacks them (the divider edits heights).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Some(Self::Horizontal),
            "vertical" | "v" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Percent pair, always summing to 100 with each side in `[20, 80]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelSizes {
    pub panel1: f64,
    pub panel2: f64,
}

impl Default for PanelSizes {
    fn default() -> Self {
        Self {
            panel1: 50.0,
            panel2: 50.0,
        }
    }
}

impl PanelSizes {
    pub fn from_ratio(panel1_percent: f64) -> Self {
        let panel1 = if panel1_percent.is_finite() {
            panel1_percent.clamp(MIN_PANEL_PERCENT, MAX_PANEL_PERCENT)
        } else {
            50.0
        };
        Self {
            panel1,
            panel2: 100.0 - panel1,
        }
    }

    /// Re-derives a valid pair from possibly hand-edited persisted values.
    pub fn normalized(self) -> Self {
        Self::from_ratio(self.panel1)
    }
}

/// Pointer-space geometry of the container along the split axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividerTrack {
    pub start: f64,
    pub extent: f64,
}

impl DividerTrack {
    pub fn new(start: f64, extent: f64) -> Self {
        Self { start, extent }
    }

    /// Raw (unclamped) first-panel percentage for a pointer position.
    pub fn ratio_at(&self, pointer: f64) -> f64 {
        if self.extent <= 0.0 {
            return 50.0;
        }
        (pointer - self.start) * 100.0 / self.extent
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividerDrag {
    pub track: DividerTrack,
    pub current: PanelSizes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitLayout {
    pub split_mode: bool,
    pub split_orientation: Orientation,
    pub active_tab1: Option<FileId>,
    pub active_tab2: Option<FileId>,
    pub panel_widths: PanelSizes,
    pub panel_heights: PanelSizes,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self {
            split_mode: false,
            split_orientation: Orientation::Horizontal,
            active_tab1: None,
            active_tab2: None,
            panel_widths: PanelSizes::default(),
            panel_heights: PanelSizes::default(),
        }
    }
}

impl SplitLayout {
    pub fn with_orientation(orientation: Orientation) -> Self {
        Self {
            split_orientation: orientation,
            ..Self::default()
        }
    }

    /// The size pair the divider currently edits.
    pub fn sizes(&self) -> PanelSizes {
        match self.split_orientation {
            Orientation::Horizontal => self.panel_widths,
            Orientation::Vertical => self.panel_heights,
        }
    }

    pub fn set_sizes(&mut self, sizes: PanelSizes) {
        match self.split_orientation {
            Orientation::Horizontal => self.panel_widths = sizes,
            Orientation::Vertical => self.panel_heights = sizes,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/split.rs"]
mod tests;
