//! String templates (`rr:template`).
//!
//! A template mixes literal text with `{column}` placeholders. A backslash
//! escapes a literal brace (`\{`, `\}`) or backslash.

use std::collections::HashMap;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::MappingError;

/// Escapes, placeholders, and stray braces, in that order of precedence.
static TEMPLATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\\.)|\{([^{}\\]*)\}|([{}])").unwrap());

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Column(String),
}

/// Parse a template into literal and column segments.
///
/// Adjacent literal text (including unescaped backslash escapes) is merged
/// into a single segment. Unbalanced braces are an error.
pub fn parse_template(template: &str) -> Result<Vec<Segment>, MappingError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in TEMPLATE_TOKEN.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&template[last..whole.start()]);
        last = whole.end();

        if let Some(escape) = caps.get(1) {
            // Drop the backslash, keep the escaped character.
            literal.push_str(&escape.as_str()[1..]);
        } else if let Some(column) = caps.get(2) {
            if column.as_str().is_empty() {
                return Err(MappingError::InvalidTemplate {
                    template: template.to_string(),
                    message: format!("empty placeholder at offset {}", whole.start()),
                });
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Column(column.as_str().to_string()));
        } else if let Some(brace) = caps.get(3) {
            return Err(MappingError::InvalidTemplate {
                template: template.to_string(),
                message: format!("unbalanced '{}' at offset {}", brace.as_str(), brace.start()),
            });
        }
    }

    literal.push_str(&template[last..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Column names referenced by a template, in order of first appearance.
///
/// Malformed templates yield the columns of their well-formed placeholders.
pub fn extract_template_columns(template: &str) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for caps in TEMPLATE_TOKEN.captures_iter(template) {
        if let Some(column) = caps.get(2) {
            let name = column.as_str();
            if !name.is_empty() && !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

/// Match a rendered value against a template, recovering the column values.
///
/// Literal segments must match exactly and every placeholder must capture a
/// non-empty, percent-decoded value. A column that appears more than once
/// must capture the same value each time. Returns the column values in
/// placeholder order, or `None` if the value cannot have come from this
/// template.
pub fn match_template(template: &str, value: &str) -> Option<Vec<(String, String)>> {
    let segments = parse_template(template).ok()?;

    let mut pattern = String::from("^");
    let mut order = Vec::new();
    for segment in &segments {
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Column(name) => {
                pattern.push_str("(.+?)");
                order.push(name.as_str());
            }
        }
    }
    pattern.push('$');

    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(value)?;

    let mut seen: HashMap<&str, String> = HashMap::new();
    let mut bindings = Vec::new();
    for (i, name) in order.iter().enumerate() {
        let raw = caps.get(i + 1)?.as_str();
        let decoded = percent_decode_str(raw).decode_utf8().ok()?.into_owned();

        match seen.get(name) {
            Some(previous) if *previous != decoded => return None,
            Some(_) => {}
            None => {
                seen.insert(name, decoded.clone());
                bindings.push((name.to_string(), decoded));
            }
        }
    }

    Some(bindings)
}
