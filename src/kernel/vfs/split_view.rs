use super::{Panel, Vfs};
use crate::kernel::split::{DividerDrag, DividerTrack, Orientation, PanelSizes};
use crate::models::FileId;

impl Vfs {
    /// Enters or leaves split mode. Returns the new mode.
    pub fn toggle_split_view(&mut self) -> bool {
        if self.layout.split_mode {
            self.leave_split();
        } else {
            self.enter_split();
        }
        self.persist_tabs();
        self.persist_split();
        self.bump_tree();
        tracing::debug!(split = self.layout.split_mode, "toggled split view");
        self.layout.split_mode
    }

    fn enter_split(&mut self) {
        // Panel 2 may load the file panel 1 is editing.
        if self.flush_panel(Panel::Primary) {
            self.persist_vfs();
        }

        let first = self
            .tabs
            .active_tab
            .clone()
            .or_else(|| self.tabs.open_tabs.first().cloned());
        let second = self
            .tabs
            .open_tabs
            .get(1)
            .cloned()
            .or_else(|| first.clone());

        self.layout.split_mode = true;
        self.layout.active_tab1 = first;
        self.layout.active_tab2 = second;
        self.tabs.active_tab = self.layout.active_tab1.clone();
        self.layout.panel_widths = self.layout.panel_widths.normalized();
        self.layout.panel_heights = self.layout.panel_heights.normalized();

        // Panel 1 keeps its buffer; only panel 2 needs loading.
        let secondary = self.layout.active_tab2.clone();
        self.load_into_panel(Panel::Secondary, secondary.as_ref());
    }

    fn leave_split(&mut self) {
        let flushed = self.flush_live_panels();

        let single = self
            .layout
            .active_tab1
            .clone()
            .or_else(|| self.tabs.open_tabs.first().cloned());

        self.drag = None;
        self.layout.split_mode = false;
        self.tabs.active_tab = single.clone();
        self.layout.active_tab2 = None;

        self.load_into_panel(Panel::Primary, single.as_ref());
        self.load_into_panel(Panel::Secondary, None);
        if flushed {
            self.persist_vfs();
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if self.layout.split_orientation == orientation {
            return false;
        }
        self.drag = None;
        self.layout.split_orientation = orientation;
        self.persist_split();
        true
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        let next = self.layout.split_orientation.toggled();
        self.set_orientation(next);
        next
    }

    /// Starts a divider drag over `track`. Ignored outside split mode.
    pub fn begin_divider_drag(&mut self, track: DividerTrack) -> bool {
        if !self.layout.split_mode {
            return false;
        }
        self.drag = Some(DividerDrag {
            track,
            current: self.layout.sizes(),
        });
        true
    }

    /// Live resize; applied to the layout but not persisted.
    pub fn drag_divider(&mut self, pointer: f64) -> Option<PanelSizes> {
        let drag = self.drag.as_mut()?;
        let sizes = PanelSizes::from_ratio(drag.track.ratio_at(pointer));
        drag.current = sizes;
        self.layout.set_sizes(sizes);
        Some(sizes)
    }

    /// Finishes the drag and persists the final ratio.
    pub fn end_divider_drag(&mut self) -> Option<PanelSizes> {
        let drag = self.drag.take()?;
        self.layout.set_sizes(drag.current);
        self.persist_split();
        tracing::debug!(
            panel1 = drag.current.panel1,
            panel2 = drag.current.panel2,
            "divider released"
        );
        Some(drag.current)
    }

    /// Sets the first-panel percentage directly, clamped like a drag.
    pub fn set_split_ratio(&mut self, panel1_percent: f64) -> PanelSizes {
        let sizes = PanelSizes::from_ratio(panel1_percent);
        self.layout.set_sizes(sizes);
        self.persist_split();
        sizes
    }

    /// Alternate-click on a tab in split mode: shows it in panel 2, or in
    /// panel 1 if panel 2 already shows it.
    pub fn assign_tab_to_other_panel(&mut self, id: &FileId) -> bool {
        if !self.layout.split_mode || !self.tabs.contains(id) {
            return false;
        }
        let target = if self.layout.active_tab2.as_ref() == Some(id) {
            Panel::Primary
        } else {
            Panel::Secondary
        };
        self.switch_to_tab(id, target)
    }
}
