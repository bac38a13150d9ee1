//! Best-effort source re-indenters.
//!
//! None of these parse: they re-flow indentation around structural
//! characters, accept partial input and always return some text.

mod css;
mod html;
mod js;

use crate::models::FileKind;

pub use css::format_css;
pub use html::format_html;
pub use js::format_js;

pub(crate) const INDENT_UNIT: &str = "  ";

pub fn format_source(kind: FileKind, text: &str) -> String {
    match kind {
        FileKind::Html => format_html(text),
        FileKind::Css => format_css(text),
        FileKind::JavaScript => format_js(text),
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT_UNIT);
    }
}

/// Strips trailing whitespace per line, keeps at most one blank line in a row
/// and trims the ends.
fn tidy_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
