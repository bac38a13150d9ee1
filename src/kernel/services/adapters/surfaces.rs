//! Headless editor/preview/prompt implementations.
//!
//! Handles are `Rc<RefCell<..>>` backed; clone one before handing it to the
//! kernel to keep a view of what the kernel did with it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use crate::kernel::services::ports::{ConfirmPort, EditorSurface, PreviewSurface};

#[derive(Debug, Default)]
struct BufferState {
    text: String,
    enabled: bool,
    selection: (usize, usize),
}

#[derive(Clone, Debug, Default)]
pub struct BufferEditor {
    state: Rc<RefCell<BufferState>>,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates typing: replaces the buffer the way a user edit would.
    pub fn type_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.selection = (text.len(), text.len());
    }

    pub fn set_selection(&self, start: usize, end: usize) {
        let mut state = self.state.borrow_mut();
        let len = state.text.len();
        state.selection = (start.min(len), end.min(len));
    }
}

impl EditorSurface for BufferEditor {
    fn get_value(&self) -> String {
        self.state.borrow().text.clone()
    }

    fn set_value(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.selection = (0, 0);
    }

    fn enable(&mut self) {
        self.state.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.state.borrow_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    fn selection(&self) -> (usize, usize) {
        self.state.borrow().selection
    }
}

#[derive(Debug)]
struct PreviewState {
    document: Option<String>,
    renders: usize,
    alive: bool,
}

#[derive(Clone, Debug)]
pub struct MemoryPreview {
    state: Rc<RefCell<PreviewState>>,
}

impl MemoryPreview {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(PreviewState {
                document: None,
                renders: 0,
                alive: true,
            })),
        }
    }

    pub fn document(&self) -> Option<String> {
        self.state.borrow().document.clone()
    }

    pub fn renders(&self) -> usize {
        self.state.borrow().renders
    }

    /// Marks the surface as closed by the user.
    pub fn close(&self) {
        self.state.borrow_mut().alive = false;
    }
}

impl Default for MemoryPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSurface for MemoryPreview {
    fn render(&mut self, document: &str) {
        let mut state = self.state.borrow_mut();
        state.document = Some(document.to_string());
        state.renders += 1;
    }

    fn clear(&mut self) {
        self.state.borrow_mut().document = None;
    }

    fn is_alive(&self) -> bool {
        self.state.borrow().alive
    }
}

/// Writes the preview document to an HTML file on disk.
#[derive(Debug, Clone)]
pub struct FilePreview {
    path: PathBuf,
}

impl FilePreview {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreviewSurface for FilePreview {
    fn render(&mut self, document: &str) {
        if let Err(e) = std::fs::write(&self.path, document) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write preview");
        }
    }

    fn clear(&mut self) {
        if let Err(e) = std::fs::write(&self.path, "") {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to clear preview");
        }
    }

    fn is_alive(&self) -> bool {
        self.path.parent().map_or(true, |p| p.as_os_str().is_empty() || p.exists())
    }
}

/// Answers confirmations from a queue; an exhausted queue declines.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPrompt {
    answers: Rc<RefCell<VecDeque<bool>>>,
    asked: Rc<RefCell<Vec<String>>>,
    notices: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn push_answers(&self, answers: impl IntoIterator<Item = bool>) {
        self.answers.borrow_mut().extend(answers);
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl ConfirmPort for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }

    fn notice(&mut self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

/// `y/N` prompts on stdin/stderr.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmPort for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{} [y/N] ", message);
        let _ = stderr.flush();

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
