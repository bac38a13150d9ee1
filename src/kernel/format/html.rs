use regex::Regex;
use std::sync::OnceLock;

use super::push_indent;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

fn whitespace_between_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s+<").expect("valid regex"))
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^<>]+>").expect("valid regex"))
}

enum Token<'a> {
    Tag(&'a str),
    Text(&'a str),
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in tag_pattern().find_iter(source) {
        if m.start() > last {
            tokens.push(Token::Text(&source[last..m.start()]));
        }
        tokens.push(Token::Tag(m.as_str()));
        last = m.end();
    }
    if last < source.len() {
        tokens.push(Token::Text(&source[last..]));
    }
    tokens
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn opens_block(tag: &str) -> bool {
    if tag.starts_with("<!") || tag.starts_with("<?") || tag.ends_with("/>") {
        return false;
    }
    let name = tag_name(tag);
    !name.is_empty() && !VOID_ELEMENTS.contains(&name.as_str())
}

fn push_line(out: &mut String, level: usize, line: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    push_indent(out, level);
    out.push_str(line);
}

pub fn format_html(source: &str) -> String {
    let collapsed = whitespace_between_tags().replace_all(source.trim(), "><");

    let mut out = String::with_capacity(collapsed.len() + collapsed.len() / 4);
    let mut indent = 0usize;

    for token in tokenize(&collapsed) {
        match token {
            Token::Tag(tag) if tag.starts_with("</") => {
                indent = indent.saturating_sub(1);
                push_line(&mut out, indent, tag);
            }
            Token::Tag(tag) => {
                push_line(&mut out, indent, tag);
                if opens_block(tag) {
                    indent += 1;
                }
            }
            Token::Text(text) => {
                for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    push_line(&mut out, indent, line);
                }
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/format/html.rs"]
mod tests;
