//! Text helpers shared by the query layer and tool output.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Removes inline markup tags and collapses runs of whitespace.
///
/// This is not an HTML parser: entities are left untouched and a stray `<`
/// swallows text up to the next `>`.
///
/// # Examples
///
/// ```
/// use wcag_mcp::wcag::text::strip_markup;
///
/// assert_eq!(strip_markup("<p>All  <a href=\"#x\">non-text</a>\n content</p>"), "All non-text content");
/// ```
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(text, "");
    WHITESPACE_PATTERN
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Truncates `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Compares two dotted numbers segment by segment (`1.4.3` < `1.4.10`).
///
/// Non-numeric segments fall back to string comparison.
#[must_use]
pub fn compare_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u32>(), r.parse::<u32>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Compares technique identifiers by alphabetic prefix, then numeric suffix
/// (`H2` < `H10` < `SCR1`).
#[must_use]
pub fn compare_technique_ids(a: &str, b: &str) -> Ordering {
    let (a_prefix, a_number) = split_identifier(a);
    let (b_prefix, b_number) = split_identifier(b);

    a_prefix
        .cmp(b_prefix)
        .then_with(|| a_number.cmp(&b_number))
        .then_with(|| a.cmp(b))
}

fn split_identifier(id: &str) -> (&str, Option<u32>) {
    let split_at = id
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(id.len());
    let (prefix, digits) = id.split_at(split_at);
    (prefix, digits.parse().ok())
}

/// Normalises a WCAG version string.
///
/// `"2.2"` is returned unchanged; compact forms like `"22"` become `"2.2"`.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    let version = version.trim();
    if version.contains('.') {
        return version.to_string();
    }

    let mut chars = version.chars();
    match (chars.next(), chars.as_str()) {
        (Some(major), "") => format!("{major}.0"),
        (Some(major), minor) => format!("{major}.{minor}"),
        (None, _) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_markup_removes_tags_and_collapses_whitespace() {
        assert_eq!(strip_markup("  <b>bold</b>\t\ttext  "), "bold text");
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("no markup"), "no markup");
    }

    #[test]
    fn strip_markup_is_lossy_on_stray_angle_brackets() {
        assert_eq!(strip_markup("a < b > c"), "a c");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn dotted_comparison_is_numeric() {
        assert_eq!(compare_dotted("1.4.3", "1.4.10"), Ordering::Less);
        assert_eq!(compare_dotted("2.1", "1.4.13"), Ordering::Greater);
        assert_eq!(compare_dotted("1.4", "1.4.1"), Ordering::Less);
        assert_eq!(compare_dotted("3.3.7", "3.3.7"), Ordering::Equal);
    }

    #[test]
    fn technique_id_comparison_is_natural() {
        let mut ids = vec!["H10", "ARIA1", "H2", "G94", "H37", "F65"];
        ids.sort_by(|a, b| compare_technique_ids(a, b));
        assert_eq!(ids, vec!["ARIA1", "F65", "G94", "H2", "H10", "H37"]);
    }

    #[test]
    fn version_normalisation() {
        assert_eq!(normalize_version("2.2"), "2.2");
        assert_eq!(normalize_version("22"), "2.2");
        assert_eq!(normalize_version("21"), "2.1");
        assert_eq!(normalize_version("2"), "2.0");
        assert_eq!(normalize_version(""), "");
    }
}
