//! Ini document parsing and encoding
//!
//! The config files are ini documents where dotted section headers build a
//! tree: `[endpoint.local]` puts the `local` section inside `endpoint`.

use crate::error::{Result, ShellError};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A parsed section: key to value, sorted by key
pub type Section = BTreeMap<String, Value>;

/// A single value in a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(i64),
    Section(Section),
}

impl Value {
    /// Short type name used in error messages
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match *self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Section(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<Section> for Value {
    fn from(value: Section) -> Self {
        Self::Section(value)
    }
}

/// Parse an ini document into a tree of sections
///
/// # Errors
///
/// Returns an error if:
/// - A section header is not closed
/// - A key is used both as a value and as a section
/// - A double-quoted value is not a valid JSON string
pub fn parse(text: &str) -> Result<Section> {
    let mut root = Section::new();
    let mut path: Vec<String> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let header = rest.strip_suffix(']').ok_or_else(|| {
                ShellError::invalid_config(format!(
                    "Unterminated section header on line {line_number}: {line}"
                ))
            })?;
            path = split_section_name(header.trim());
            section_at(&mut root, &path, line_number)?;
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), decode_value(value.trim(), line_number)?),
            None => (line, String::new()),
        };
        let key = if key.starts_with(['"', '\'']) {
            unquote(key, line_number)?
        } else {
            unescape(key)
        };

        let section = section_at(&mut root, &path, line_number)?;
        if let Some(Value::Section(_)) = section.get(&key) {
            return Err(ShellError::invalid_config(format!(
                "Key '{key}' on line {line_number} is already a section"
            )));
        }
        section.insert(key, Value::String(value));
    }

    Ok(root)
}

/// Encode a tree of sections as an ini document
#[must_use]
pub fn encode(section: &Section) -> String {
    let mut out = String::new();
    encode_into(&mut out, section, &[]);
    out
}

fn encode_into(out: &mut String, section: &Section, path: &[String]) {
    let has_scalars = section
        .values()
        .any(|value| !matches!(value, Value::Section(_)));

    if !path.is_empty() && has_scalars {
        if !out.is_empty() {
            out.push('\n');
        }
        let header = path
            .iter()
            .map(|part| part.replace('.', "\\."))
            .collect::<Vec<_>>()
            .join(".");
        let _ = writeln!(out, "[{header}]");
    }

    for (key, value) in section {
        match value {
            Value::String(s) => {
                let _ = writeln!(out, "{} = {}", safe(key), safe(s));
            }
            Value::Number(n) => {
                let _ = writeln!(out, "{} = {n}", safe(key));
            }
            Value::Section(_) => {}
        }
    }

    for (key, value) in section {
        if let Value::Section(child) = value {
            let mut child_path = path.to_vec();
            child_path.push(key.clone());
            encode_into(out, child, &child_path);
        }
    }
}

/// Walk (creating as needed) to the section named by `path`
fn section_at<'a>(
    root: &'a mut Section,
    path: &[String],
    line_number: usize,
) -> Result<&'a mut Section> {
    let mut current = root;
    for part in path {
        let entry = current
            .entry(part.clone())
            .or_insert_with(|| Value::Section(Section::new()));
        current = match entry {
            Value::Section(child) => child,
            other => {
                return Err(ShellError::invalid_config(format!(
                    "Section '{part}' on line {line_number} conflicts with a {} value",
                    other.type_name()
                )));
            }
        };
    }
    Ok(current)
}

/// Split a header on unescaped dots
fn split_section_name(header: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = header.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => parts.push(core::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn decode_value(raw: &str, line_number: usize) -> Result<String> {
    if raw.starts_with('"') || raw.starts_with('\'') {
        return unquote(raw, line_number);
    }

    // Unquoted: an unescaped ';' or '#' starts a comment
    let mut value = String::new();
    let mut escaped = false;
    for c in raw.chars() {
        if escaped {
            if !matches!(c, ';' | '#' | '\\') {
                value.push('\\');
            }
            value.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ';' | '#' => break,
            _ => value.push(c),
        }
    }
    if escaped {
        value.push('\\');
    }
    Ok(value.trim().to_owned())
}

fn unquote(raw: &str, line_number: usize) -> Result<String> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return serde_json::from_str::<String>(raw).map_err(|e| {
            ShellError::invalid_config(format!(
                "Invalid quoted value on line {line_number}: {e}"
            ))
        });
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Ok(raw[1..raw.len() - 1].to_owned());
    }
    Ok(raw.to_owned())
}

/// Undo the escaping `safe` applies to unquoted text
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, ';' | '#' | '\\')
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Quote or escape a value so that it survives a round trip through `parse`
fn safe(value: &str) -> String {
    let needs_quotes = value.trim() != value
        || value.contains(['=', '\n', '\r'])
        || value.starts_with(['"', '\'', '['])
        || value.is_empty();

    if needs_quotes {
        serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
    } else {
        value
            .replace('\\', "\\\\")
            .replace(';', "\\;")
            .replace('#', "\\#")
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;

    fn string(value: &str) -> Value {
        Value::String(value.to_owned())
    }

    #[test]
    fn test_parse_top_level_and_nested_sections() {
        let doc = parse(
            "default = local\n\
             [endpoint.local]\n\
             secret = fn1234\n\
             url = http://localhost:8443\n",
        )
        .unwrap();

        assert_eq!(doc.get("default"), Some(&string("local")));
        let Some(Value::Section(endpoint)) = doc.get("endpoint") else {
            panic!("expected endpoint section");
        };
        let Some(Value::Section(local)) = endpoint.get("local") else {
            panic!("expected local section");
        };
        assert_eq!(local.get("secret"), Some(&string("fn1234")));
        assert_eq!(local.get("url"), Some(&string("http://localhost:8443")));
    }

    #[test]
    fn test_parse_comments_and_quotes() {
        let doc = parse(
            "; a comment\n\
             # another\n\
             a = \"  padded \"\n\
             b = 'single'\n\
             c = value ; trailing\n\
             d = semi\\;colon\n",
        )
        .unwrap();

        assert_eq!(doc.get("a"), Some(&string("  padded ")));
        assert_eq!(doc.get("b"), Some(&string("single")));
        assert_eq!(doc.get("c"), Some(&string("value")));
        assert_eq!(doc.get("d"), Some(&string("semi;colon")));
    }

    #[test]
    fn test_parse_escaped_dot_in_header() {
        let doc = parse("[endpoint.my\\.host]\nsecret = fn1\n").unwrap();
        let Some(Value::Section(endpoint)) = doc.get("endpoint") else {
            panic!("expected endpoint section");
        };
        assert!(endpoint.contains_key("my.host"));
    }

    #[test]
    fn test_parse_unterminated_header() {
        let err = parse("[endpoint\nsecret = x\n").unwrap_err();
        assert!(err.to_string().contains("Unterminated section header"));
    }

    #[test]
    fn test_parse_value_section_conflict() {
        let err = parse("endpoint = x\n[endpoint.a]\nsecret = y\n").unwrap_err();
        assert!(err.to_string().contains("conflicts with a string value"));
    }

    #[test]
    fn test_encode_skips_headers_for_pure_parents() {
        let mut local = Section::new();
        local.insert("secret".to_owned(), string("fn1234"));
        local.insert("graphqlPort".to_owned(), Value::Number(8084));
        let mut endpoint = Section::new();
        endpoint.insert("local".to_owned(), Value::Section(local));
        let mut doc = Section::new();
        doc.insert("default".to_owned(), string("local"));
        doc.insert("endpoint".to_owned(), Value::Section(endpoint));

        assert_eq!(
            encode(&doc),
            "default = local\n\n[endpoint.local]\ngraphqlPort = 8084\nsecret = fn1234\n"
        );
    }

    #[test]
    fn test_encode_then_parse_preserves_awkward_values() {
        let mut doc = Section::new();
        doc.insert("a".to_owned(), string(" spaced "));
        doc.insert("b".to_owned(), string("x=y"));
        doc.insert("c".to_owned(), string("hash#and;semi"));
        doc.insert("d".to_owned(), string(""));
        doc.insert("e".to_owned(), string(r"back\slash"));
        doc.insert("f".to_owned(), string(r"fn\;y"));
        doc.insert("g".to_owned(), string(r"trailing\"));

        let reparsed = parse(&encode(&doc)).unwrap();
        assert_eq!(reparsed, doc);
    }
}
