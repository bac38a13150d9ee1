use super::{push_indent, tidy_lines};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Code,
    Str(char),
    LineComment,
    BlockComment,
}

const JOINED_KEYWORDS: &[&str] = &["else", "catch", "finally"];

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches([' ', '\t']).len();
    out.truncate(len);
}

fn line_start(out: &str) -> usize {
    out.rfind('\n').map_or(0, |i| i + 1)
}

fn current_line_is_blank(out: &str) -> bool {
    out[line_start(out)..].trim().is_empty()
}

fn reset_line(out: &mut String, indent: usize) {
    let start = line_start(out);
    out.truncate(start);
    push_indent(out, indent);
}

fn skip_inline_spaces(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && matches!(chars[i], ' ' | '\t' | '\r') {
        i += 1;
    }
    i
}

/// Skips all whitespace from `i`; returns the next index and the number of
/// newlines skipped.
fn skip_whitespace(chars: &[char], mut i: usize) -> (usize, usize) {
    let mut newlines = 0;
    while i < chars.len() && chars[i].is_whitespace() {
        if chars[i] == '\n' {
            newlines += 1;
        }
        i += 1;
    }
    (i, newlines)
}

fn starts_with_at(chars: &[char], i: usize, word: &str) -> bool {
    let mut idx = i;
    for expected in word.chars() {
        if chars.get(idx) != Some(&expected) {
            return false;
        }
        idx += 1;
    }
    !chars
        .get(idx)
        .is_some_and(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '$')
}

fn break_line(out: &mut String, indent: usize, newlines: usize) {
    trim_trailing_spaces(out);
    out.push('\n');
    if newlines >= 2 {
        out.push('\n');
    }
    push_indent(out, indent);
}

pub fn format_js(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() + source.len() / 4);
    let mut state = ScanState::Code;
    let mut indent = 0usize;
    let mut paren_depth = 0usize;
    let mut paren_stack: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            ScanState::Str(quote) => {
                if ch == '\n' && quote != '`' {
                    // unterminated literal, resume scanning code on the newline
                    state = ScanState::Code;
                    continue;
                }
                out.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = next {
                        out.push(escaped);
                        i += 1;
                    }
                } else if ch == quote {
                    state = ScanState::Code;
                }
                i += 1;
                continue;
            }
            ScanState::LineComment => {
                if ch == '\n' {
                    state = ScanState::Code;
                    continue;
                }
                out.push(ch);
                i += 1;
                continue;
            }
            ScanState::BlockComment => {
                out.push(ch);
                if ch == '*' && next == Some('/') {
                    out.push('/');
                    i += 2;
                    state = ScanState::Code;
                } else {
                    i += 1;
                }
                continue;
            }
            ScanState::Code => {}
        }

        match ch {
            '"' | '\'' | '`' => {
                out.push(ch);
                state = ScanState::Str(ch);
                i += 1;
            }
            '/' if next == Some('/') => {
                out.push_str("//");
                state = ScanState::LineComment;
                i += 2;
            }
            '/' if next == Some('*') => {
                out.push_str("/*");
                state = ScanState::BlockComment;
                i += 2;
            }
            '(' => {
                paren_depth += 1;
                out.push(ch);
                i += 1;
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(ch);
                i += 1;
            }
            '{' => {
                trim_trailing_spaces(&mut out);
                if current_line_is_blank(&out) {
                    reset_line(&mut out, indent);
                } else {
                    out.push(' ');
                }
                out.push_str("{\n");
                indent += 1;
                paren_stack.push(paren_depth);
                paren_depth = 0;
                push_indent(&mut out, indent);
                i = skip_whitespace(&chars, i + 1).0;
            }
            '}' => {
                indent = indent.saturating_sub(1);
                paren_depth = paren_stack.pop().unwrap_or(0);
                trim_trailing_spaces(&mut out);
                if current_line_is_blank(&out) {
                    reset_line(&mut out, indent);
                } else {
                    out.push('\n');
                    push_indent(&mut out, indent);
                }
                out.push('}');

                let (j, newlines) = skip_whitespace(&chars, i + 1);
                match chars.get(j) {
                    None => i = j,
                    Some(';' | ',' | ')') => i = j,
                    Some(_) if JOINED_KEYWORDS.iter().any(|w| starts_with_at(&chars, j, w)) => {
                        out.push(' ');
                        i = j;
                    }
                    Some(_) => {
                        break_line(&mut out, indent, newlines);
                        i = j;
                    }
                }
            }
            ';' => {
                out.push(';');
                i += 1;
                if paren_depth > 0 {
                    continue;
                }
                let j = skip_inline_spaces(&chars, i);
                if chars.get(j) == Some(&'/') && chars.get(j + 1) == Some(&'/') {
                    out.push(' ');
                    i = j;
                    continue;
                }
                let (k, newlines) = skip_whitespace(&chars, i);
                match chars.get(k) {
                    None | Some('}') => {}
                    Some(_) => break_line(&mut out, indent, newlines),
                }
                i = k;
            }
            '\n' => {
                trim_trailing_spaces(&mut out);
                out.push('\n');
                push_indent(&mut out, indent);
                i = skip_inline_spaces(&chars, i + 1);
            }
            ' ' | '\t' | '\r' => {
                if !out.is_empty() && !out.ends_with([' ', '\n']) {
                    out.push(' ');
                }
                i += 1;
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    tidy_lines(&out)
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/format/js.rs"]
mod tests;
