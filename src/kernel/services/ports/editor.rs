//! Surfaces the kernel drives but does not own: editor buffers, preview
//! targets and user prompts.

/// A text editor widget holding the live buffer of one panel.
pub trait EditorSurface {
    fn get_value(&self) -> String;

    fn set_value(&mut self, text: &str);

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Byte offsets `(start, end)` of the current selection.
    fn selection(&self) -> (usize, usize) {
        (0, 0)
    }
}

/// Receives the composite preview document.
pub trait PreviewSurface {
    fn render(&mut self, document: &str);

    fn clear(&mut self);

    /// Liveness check; a detached window closed by the user reports `false`.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Blocking yes/no confirmation plus one-shot notices.
pub trait ConfirmPort {
    fn confirm(&mut self, message: &str) -> bool;

    fn notice(&mut self, message: &str);
}
