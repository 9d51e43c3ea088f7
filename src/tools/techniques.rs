//! Technique tools.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Deserialize;
use serde_json::json;

use super::format::{criterion_not_found, parse_optional, scalar_string};
use super::{object_schema, ref_id_schema, QueryParams, RefIdParams, Tool};
use crate::wcag::text::strip_markup;
use crate::wcag::{TechniqueEntry, TechniqueFilter, TechniqueType, WcagDocument};

#[derive(Debug, Deserialize)]
struct ListTechniquesParams {
    #[serde(default, deserialize_with = "scalar_string")]
    technology: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "scalar_string")]
    kind: Option<String>,
}

pub fn list_techniques() -> Tool {
    Tool::new(
        "list-techniques",
        "Lists WCAG techniques, optionally filtered by technology (html, aria, css, pdf, general, etc.) or type (sufficient, advisory, failure).",
        object_schema(
            json!({
                "technology": {
                    "type": "string",
                    "description": "Filter by technology",
                    "enum": ["html", "aria", "css", "pdf", "general", "client-side-script", "server-side-script", "smil", "text", "failures"]
                },
                "type": {
                    "type": "string",
                    "description": "Filter by technique type",
                    "enum": ["sufficient", "advisory", "failure"]
                }
            }),
            &[],
        ),
        |document: &WcagDocument, params: ListTechniquesParams| {
            const NO_MATCH: &str = "No techniques found matching your filters.";

            let Ok(kind) = parse_optional::<TechniqueType>(params.kind.as_deref()) else {
                return NO_MATCH.to_string();
            };
            let filter = TechniqueFilter {
                technology: params.technology.filter(|t| !t.is_empty()),
                kind,
            };

            let techniques = document.filter_techniques(&filter);
            if techniques.is_empty() {
                return NO_MATCH.to_string();
            }

            let mut by_technology: BTreeMap<&str, Vec<_>> = BTreeMap::new();
            for technique in &techniques {
                by_technology
                    .entry(technique.technology_or_other())
                    .or_default()
                    .push(technique);
            }

            let mut out = format!("# WCAG Techniques ({} found)\n\n", techniques.len());
            for (technology, group) in by_technology {
                let _ = writeln!(
                    out,
                    "## {} ({})\n",
                    technology.to_uppercase(),
                    group.len()
                );
                for technique in group {
                    let _ = writeln!(out, "- **{}**: {}", technique.id, technique.title);
                }
                out.push('\n');
            }

            out
        },
    )
}

#[derive(Debug, Deserialize)]
struct TechniqueParams {
    id: String,
}

pub fn get_technique() -> Tool {
    Tool::new(
        "get-technique",
        "Gets details for a specific technique by ID (e.g., \"H37\", \"ARIA1\", \"G94\", \"F65\").",
        object_schema(
            json!({
                "id": {
                    "type": "string",
                    "description": "Technique ID (e.g., \"H37\", \"ARIA1\", \"G94\", \"F65\")"
                }
            }),
            &["id"],
        ),
        |document: &WcagDocument, params: TechniqueParams| {
            let Some(technique) = document.find_technique(params.id.trim()) else {
                return format!("No technique found with ID \"{}\".", params.id);
            };

            let types: Vec<&str> = technique.types.iter().map(|t| t.as_str()).collect();

            let mut out = format!("# {}: {}\n\n", technique.id, technique.title);
            let _ = writeln!(out, "**Technology:** {}", technique.technology_or_other());
            let _ = writeln!(out, "**Types:** {}", types.join(", "));
            let _ = writeln!(
                out,
                "**Applies to:** {} success criteria\n",
                technique.criteria.len()
            );

            out.push_str("## Related Success Criteria\n\n");
            for num in &technique.criteria {
                if let Some(found) = document.find_success_criterion(num) {
                    let _ = writeln!(
                        out,
                        "- **{num}** {} (Level {})",
                        found.criterion.handle, found.criterion.level
                    );
                }
            }

            out.push_str("\n## Links\n\n");
            let _ = writeln!(out, "- [Full Technique Documentation]({})", technique.url());
            out
        },
    )
}

/// Renders one technique tree as an indented outline.
fn push_tree(out: &mut String, entries: &[TechniqueEntry], indent: &str) {
    for entry in entries {
        match (&entry.id, &entry.title) {
            (None, Some(heading)) => {
                let _ = writeln!(out, "{indent}**{}**", strip_markup(heading));
                let nested = format!("{indent}  ");
                push_tree(out, &entry.techniques, &nested);
                for group in &entry.groups {
                    let _ = writeln!(out, "{indent}  *{}*", group.title);
                    push_tree(out, &group.techniques, &format!("{indent}    "));
                }
            }
            (Some(id), title) => {
                let _ = writeln!(out, "{indent}- **{id}**: {}", title.as_deref().unwrap_or_default());
                push_tree(out, &entry.using, &format!("{indent}  "));
            }
            (None, None) if !entry.and.is_empty() => {
                let _ = writeln!(out, "{indent}- Combined techniques:");
                for part in &entry.and {
                    if let Some(id) = &part.id {
                        let _ = writeln!(
                            out,
                            "{indent}  - **{id}**: {}",
                            part.title.as_deref().unwrap_or_default()
                        );
                    }
                }
            }
            (None, None) => {}
        }
    }
}

pub fn get_techniques_for_criterion() -> Tool {
    Tool::new(
        "get-techniques-for-criterion",
        "Gets all techniques (sufficient, advisory, and failures) for a specific success criterion.",
        ref_id_schema(),
        |document: &WcagDocument, params: RefIdParams| {
            let Some((found, trees)) = document.techniques_for_criterion(&params.ref_id) else {
                return criterion_not_found(&params.ref_id, false);
            };
            let sc = found.criterion;

            let mut out = format!("# Techniques for {} {}\n\n", sc.num, sc.handle);
            let mut any = false;
            for (kind, heading) in [
                (TechniqueType::Sufficient, "Sufficient Techniques"),
                (TechniqueType::Advisory, "Advisory Techniques"),
                (TechniqueType::Failure, "Failure Techniques"),
            ] {
                let tree = trees.tree(kind);
                if tree.is_empty() {
                    continue;
                }
                any = true;
                let _ = writeln!(out, "## {heading}\n");
                push_tree(&mut out, tree, "");
                out.push('\n');
            }

            if !any {
                let _ = writeln!(out, "No techniques are documented for {}.", sc.num);
            }

            out
        },
    )
}

pub fn search_techniques() -> Tool {
    Tool::new(
        "search-techniques",
        "Searches techniques by keyword in titles.",
        object_schema(
            json!({
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            }),
            &["query"],
        ),
        |document: &WcagDocument, params: QueryParams| {
            let techniques = document.search_techniques(&params.query);
            if techniques.is_empty() {
                return format!("No techniques found matching \"{}\".", params.query);
            }

            let lines: Vec<String> = techniques
                .iter()
                .map(|t| format!("**{}** ({}): {}", t.id, t.technology_or_other(), t.title))
                .collect();

            format!(
                "# Technique Search Results for \"{}\" ({} found)\n\n{}",
                params.query,
                techniques.len(),
                lines.join("\n")
            )
        },
    )
}

pub fn get_failures_for_criterion() -> Tool {
    Tool::new(
        "get-failures-for-criterion",
        "Gets failure techniques (common mistakes) for a specific success criterion.",
        ref_id_schema(),
        |document: &WcagDocument, params: RefIdParams| {
            let Some((found, trees)) = document.techniques_for_criterion(&params.ref_id) else {
                return criterion_not_found(&params.ref_id, false);
            };
            let sc = found.criterion;

            let failures: Vec<_> = trees
                .failure
                .iter()
                .filter_map(|entry| entry.id.as_ref().map(|id| (id, entry.title.as_deref())))
                .collect();
            if failures.is_empty() {
                return format!(
                    "No documented failure techniques for {} {}.",
                    sc.num, sc.handle
                );
            }

            let mut out = format!("# Failure Techniques for {} {}\n\n", sc.num, sc.handle);
            out.push_str(
                "These are common mistakes that would cause this success criterion to fail:\n\n",
            );
            for (id, title) in failures {
                let _ = writeln!(out, "- **{id}**: {}", title.unwrap_or_default());
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
    fn list_groups_by_technology() {
        let text = call("list-techniques", json!({}));
        assert!(text.starts_with("# WCAG Techniques (5 found)"));
        assert!(text.contains("## CSS (1)\n\n- **C9**: Using CSS to include decorative images"));
        assert!(text.contains("## GENERAL (2)\n\n- **G18**"));
        assert!(text.contains("## HTML (1)"));
    }

    #[test]
    fn list_filters_by_type_and_technology() {
        let text = call("list-techniques", json!({"type": "failure"}));
        assert!(text.starts_with("# WCAG Techniques (1 found)"));
        assert!(text.contains("**F65**"));

        let text = call("list-techniques", json!({"technology": "html"}));
        assert!(text.contains("**H37**"));
        assert!(!text.contains("**G94**"));

        let text = call("list-techniques", json!({"type": "bogus"}));
        assert_eq!(text, "No techniques found matching your filters.");
    }

    #[test]
    fn technique_detail_is_case_insensitive() {
        let text = call("get-technique", json!({"id": "h37"}));
        assert!(text.starts_with("# H37: Using alt attributes on img elements"));
        assert!(text.contains("**Technology:** html"));
        assert!(text.contains("**Types:** sufficient"));
        assert!(text.contains("- **1.1.1** Non-text Content (Level A)"));
        assert!(text.contains("https://www.w3.org/WAI/WCAG22/Techniques/html/H37"));
    }

    #[test]
    fn unknown_technique() {
        let text = call("get-technique", json!({"id": "Z999"}));
        assert_eq!(text, "No technique found with ID \"Z999\".");
    }

    #[test]
    fn criterion_tree_outline() {
        let text = call("get-techniques-for-criterion", json!({"ref_id": "1.1.1"}));
        assert!(text.contains(
            "## Sufficient Techniques\n\n**Situation A: short description**\n  - **G94**: Providing short text alternative\n    - **H37**:"
        ));
        assert!(text.contains("## Advisory Techniques\n\n- **C9**"));
        assert!(text.contains("## Failure Techniques\n\n- **F65**"));

        let text = call("get-techniques-for-criterion", json!({"ref_id": "2.4.11"}));
        assert!(text.contains("No techniques are documented for 2.4.11."));
    }

    #[test]
    fn search_matches_title_or_id() {
        let text = call("search-techniques", json!({"query": "ALT"}));
        assert!(text.contains("**H37** (html): Using alt attributes"));
        assert!(text.contains("**F65** (failures)"));

        let text = call("search-techniques", json!({"query": "nothing-like-this"}));
        assert_eq!(text, "No techniques found matching \"nothing-like-this\".");
    }

    #[test]
    fn failures_for_criterion() {
        let text = call("get-failures-for-criterion", json!({"ref_id": "1.1.1"}));
        assert!(text.starts_with("# Failure Techniques for 1.1.1 Non-text Content"));
        assert!(text.contains("- **F65**: Failure due to omitting the alt attribute"));

        let text = call("get-failures-for-criterion", json!({"ref_id": "1.4.3"}));
        assert_eq!(
            text,
            "No documented failure techniques for 1.4.3 Contrast (Minimum)."
        );
    }
}
