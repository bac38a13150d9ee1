use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::OnceLock;

use super::{push_indent, tidy_lines};

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn skip_spaces(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|ch| *ch == ' ').is_some() {}
}

fn trim_trailing_whitespace(out: &mut String) {
    let len = out.trim_end().len();
    out.truncate(len);
}

pub fn format_css(source: &str) -> String {
    let normalized = whitespace_run().replace_all(source, " ");
    let normalized = normalized.trim();

    let mut out = String::with_capacity(normalized.len() * 2);
    let mut indent = 0usize;
    let mut chars = normalized.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                trim_trailing_whitespace(&mut out);
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str("{\n");
                indent += 1;
                push_indent(&mut out, indent);
                skip_spaces(&mut chars);
            }
            '}' => {
                trim_trailing_whitespace(&mut out);
                indent = indent.saturating_sub(1);
                if !out.is_empty() {
                    out.push('\n');
                }
                push_indent(&mut out, indent);
                out.push_str("}\n\n");
                push_indent(&mut out, indent);
                skip_spaces(&mut chars);
            }
            ';' => {
                out.push_str(";\n");
                push_indent(&mut out, indent);
                skip_spaces(&mut chars);
            }
            _ => out.push(ch),
        }
    }

    tidy_lines(&out)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/format/css.rs"]
mod tests;
