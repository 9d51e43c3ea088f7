//! Principle and guideline tools.

use std::fmt::Write;

use serde::Deserialize;
use serde_json::json;

use super::format::{scalar_string, LIST_TITLE_CHARS};
use super::{object_schema, NoParams, Tool};
use crate::wcag::text::{strip_markup, truncate};
use crate::wcag::WcagDocument;

pub fn list_principles() -> Tool {
    Tool::new(
        "list-principles",
        "Lists all four WCAG 2.2 principles: Perceivable, Operable, Understandable, and Robust.",
        object_schema(json!({}), &[]),
        |document: &WcagDocument, _: NoParams| {
            let entries: Vec<String> = document
                .principles
                .iter()
                .map(|p| {
                    format!(
                        "**{}. {}**\n{}\nURL: {}",
                        p.num,
                        p.handle,
                        strip_markup(&p.content),
                        p.url()
                    )
                })
                .collect();

            format!("# WCAG 2.2 Principles\n\n{}", entries.join("\n\n"))
        },
    )
}

#[derive(Debug, Deserialize)]
struct ListGuidelinesParams {
    #[serde(default, deserialize_with = "scalar_string")]
    principle: Option<String>,
}

pub fn list_guidelines() -> Tool {
    Tool::new(
        "list-guidelines",
        "Lists WCAG 2.2 guidelines, optionally filtered by principle number (1-4).",
        object_schema(
            json!({
                "principle": {
                    "type": "string",
                    "description": "Filter by principle number (1=Perceivable, 2=Operable, 3=Understandable, 4=Robust)",
                    "enum": ["1", "2", "3", "4"]
                }
            }),
            &[],
        ),
        |document: &WcagDocument, params: ListGuidelinesParams| {
            let principles: Vec<_> = match params.principle.as_deref().filter(|p| !p.is_empty()) {
                Some(num) => document.find_principle(num).into_iter().collect(),
                None => document.principles.iter().collect(),
            };

            if principles.is_empty() {
                return "No principles found matching your criteria.".to_string();
            }

            let sections: Vec<String> = principles
                .iter()
                .map(|p| {
                    let guidelines: Vec<String> = p
                        .guidelines
                        .iter()
                        .map(|g| {
                            format!("  **{} {}**\n  {}", g.num, g.handle, strip_markup(&g.content))
                        })
                        .collect();
                    format!(
                        "## Principle {}: {}\n\n{}",
                        p.num,
                        p.handle,
                        guidelines.join("\n\n")
                    )
                })
                .collect();

            format!("# WCAG 2.2 Guidelines\n\n{}", sections.join("\n\n---\n\n"))
        },
    )
}

#[derive(Debug, Deserialize)]
struct GuidelineParams {
    ref_id: String,
}

pub fn get_guideline() -> Tool {
    Tool::new(
        "get-guideline",
        "Gets full details for a specific WCAG guideline including all its success criteria.",
        object_schema(
            json!({
                "ref_id": {
                    "type": "string",
                    "description": "Guideline reference number (e.g., \"1.1\", \"2.4\", \"4.1\")"
                }
            }),
            &["ref_id"],
        ),
        |document: &WcagDocument, params: GuidelineParams| {
            let Some((principle, guideline)) = document.find_guideline(&params.ref_id) else {
                return format!(
                    "No guideline found with number \"{}\". Use format like \"1.1\" or \"2.4\".",
                    params.ref_id
                );
            };

            let mut out = format!("# Guideline {}: {}\n\n", guideline.num, guideline.handle);
            let _ = writeln!(out, "**Principle:** {} {}\n", principle.num, principle.handle);
            let _ = writeln!(out, "## Description\n\n{}\n", strip_markup(&guideline.content));
            let _ = writeln!(out, "**URL:** {}", guideline.url());

            let _ = writeln!(
                out,
                "\n## Success Criteria ({})\n",
                guideline.success_criteria.len()
            );
            for sc in &guideline.success_criteria {
                let _ = writeln!(out, "### {} {} (Level {})", sc.num, sc.handle, sc.level);
                let _ = writeln!(out, "{}\n", truncate(&sc.title, LIST_TITLE_CHARS));
            }

            out
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::tools::test_support::call;
    use serde_json::json;

    #[test]
    fn principles_are_listed_with_urls() {
        let text = call("list-principles", json!({}));
        assert!(text.contains("**1. Perceivable**\nInformation and user interface components"));
        assert!(text.contains("URL: https://www.w3.org/TR/WCAG22/#operable"));
    }

    #[test]
    fn guidelines_filter_by_principle() {
        let text = call("list-guidelines", json!({"principle": "2"}));
        assert!(text.contains("## Principle 2: Operable"));
        assert!(!text.contains("Perceivable"));
        assert!(text.contains("  **2.4 Navigable**\n  Provide ways to help users navigate."));
    }

    #[test]
    fn unknown_principle_yields_message() {
        let text = call("list-guidelines", json!({"principle": "7"}));
        assert_eq!(text, "No principles found matching your criteria.");
    }

    #[test]
    fn guideline_lists_its_criteria() {
        let text = call("get-guideline", json!({"ref_id": "1.4"}));
        assert!(text.starts_with("# Guideline 1.4: Distinguishable"));
        assert!(text.contains("**Principle:** 1 Perceivable"));
        assert!(text.contains("## Success Criteria (1)"));
        assert!(text.contains("### 1.4.3 Contrast (Minimum) (Level AA)"));
    }

    #[test]
    fn unknown_guideline_yields_message() {
        let text = call("get-guideline", json!({"ref_id": "9.9"}));
        assert!(text.starts_with("No guideline found with number \"9.9\"."));
    }
}
