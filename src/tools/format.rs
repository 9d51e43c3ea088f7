//! Markdown fragments shared by several tools.

use std::fmt::Write;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::wcag::{CriterionRef, Detail, SuccessCriterion};

/// Longest title shown in search result lists.
pub const SEARCH_TITLE_CHARS: usize = 150;

/// Longest title shown under a guideline or version heading.
pub const LIST_TITLE_CHARS: usize = 200;

/// Message for a criterion reference that resolves to nothing.
///
/// The lookup tools add a format hint; the technique tools do not.
pub fn criterion_not_found(ref_id: &str, with_hint: bool) -> String {
    if with_hint {
        format!(
            "No success criterion found with number \"{ref_id}\". Use format like \"1.1.1\" or \"2.4.7\"."
        )
    } else {
        format!("No success criterion found with number \"{ref_id}\".")
    }
}

/// Reads an optional filter argument as text.
///
/// Numbers and booleans are taken in their JSON spelling, so `1` and `"1"`
/// filter alike. `null` means absent.
pub fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, number or boolean, got {other}"
        ))),
    }
}

/// Parses an optional enumerated argument leniently.
///
/// An absent or empty value is no constraint. An unrecognised value is
/// returned as `Err` so the caller can answer with a "no results" message.
pub fn parse_optional<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, String> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| value.to_string()),
    }
}

/// Writes the level, principle, guideline and version lines.
pub fn push_overview(out: &mut String, found: &CriterionRef<'_>) {
    let CriterionRef {
        principle,
        guideline,
        criterion,
    } = found;

    let _ = writeln!(out, "**Level:** {}", criterion.level);
    let _ = writeln!(out, "**Principle:** {} {}", principle.num, principle.handle);
    let _ = writeln!(out, "**Guideline:** {} {}", guideline.num, guideline.handle);
    let _ = writeln!(out, "**WCAG Versions:** {}\n", criterion.versions.join(", "));
}

/// Writes the `## Details` section when the criterion has any.
pub fn push_details(out: &mut String, details: &[Detail]) {
    if details.is_empty() {
        return;
    }

    out.push_str("## Details\n\n");
    for detail in details {
        match detail {
            Detail::Ulist { items } => {
                for item in items {
                    match &item.handle {
                        Some(handle) => {
                            let _ = writeln!(out, "- **{handle}:** {}", item.text);
                        }
                        None => {
                            let _ = writeln!(out, "- {}", item.text);
                        }
                    }
                }
                out.push('\n');
            }
            Detail::Note { handle, text } => {
                let _ = writeln!(out, "> **{handle}:** {text}\n");
            }
            Detail::P { text } => {
                let _ = writeln!(out, "{text}\n");
            }
            Detail::Other => {}
        }
    }
}

/// Writes the `## Links` section for a criterion.
pub fn push_links(out: &mut String, criterion: &SuccessCriterion) {
    out.push_str("## Links\n\n");
    let _ = writeln!(out, "- [WCAG Specification]({})", criterion.spec_url());
    let _ = writeln!(
        out,
        "- [Understanding {}]({})",
        criterion.num,
        criterion.understanding_url()
    );
    let _ = writeln!(
        out,
        "- [How to Meet {}]({})",
        criterion.num,
        criterion.quickref_url()
    );
}
