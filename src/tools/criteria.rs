//! Success criterion tools.

use std::fmt::Write;

use serde::Deserialize;
use serde_json::json;

use super::format::{
    criterion_not_found, parse_optional, push_details, push_links, push_overview,
    scalar_string, LIST_TITLE_CHARS, SEARCH_TITLE_CHARS,
};
use super::{object_schema, ref_id_schema, NoParams, RefIdParams, Tool};
use crate::wcag::techniques::count_technique_references;
use crate::wcag::text::{normalize_version, truncate};
use crate::wcag::{CriteriaFilter, GroupBy, Level, TechniqueType, WcagDocument};

const BRIEF_LABELS: [(&str, &str); 3] = [
    ("goal", "Goal"),
    ("what to do", "What to do"),
    ("why it's important", "Why it's important"),
];

#[derive(Debug, Deserialize)]
struct ListCriteriaParams {
    #[serde(default, deserialize_with = "scalar_string")]
    level: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    guideline: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    principle: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    version: Option<String>,
}

pub fn list_success_criteria() -> Tool {
    Tool::new(
        "list-success-criteria",
        "Lists WCAG 2.2 success criteria with optional filters by level (A, AA, AAA), guideline (e.g., \"1.1\"), principle (1-4), or WCAG version (e.g., \"2.1\").",
        object_schema(
            json!({
                "level": {
                    "type": "string",
                    "description": "Filter by conformance level",
                    "enum": ["A", "AA", "AAA"]
                },
                "guideline": {
                    "type": "string",
                    "description": "Filter by guideline number (e.g., \"1.1\", \"2.4\")"
                },
                "principle": {
                    "type": "string",
                    "description": "Filter by principle number (1-4)",
                    "enum": ["1", "2", "3", "4"]
                },
                "version": {
                    "type": "string",
                    "description": "Filter by WCAG version the criterion belongs to (e.g., \"2.0\", \"2.1\", \"2.2\")"
                }
            }),
            &[],
        ),
        |document: &WcagDocument, params: ListCriteriaParams| {
            const NO_MATCH: &str = "No success criteria found matching your filters.";

            let Ok(level) = parse_optional::<Level>(params.level.as_deref()) else {
                return NO_MATCH.to_string();
            };
            let non_empty = |v: &Option<String>| v.clone().filter(|v| !v.trim().is_empty());
            let filter = CriteriaFilter {
                principle: non_empty(&params.principle),
                guideline: non_empty(&params.guideline),
                level,
                levels: None,
                version: non_empty(&params.version).map(|v| normalize_version(&v)),
            };

            let criteria = document.list_success_criteria(&filter);
            if criteria.is_empty() {
                return NO_MATCH.to_string();
            }

            let entries: Vec<String> = criteria
                .iter()
                .map(|r| {
                    format!(
                        "**{} {}** (Level {})\nGuideline: {} {}",
                        r.criterion.num,
                        r.criterion.handle,
                        r.criterion.level,
                        r.guideline.num,
                        r.guideline.handle
                    )
                })
                .collect();

            let mut applied = Vec::new();
            if let Some(level) = filter.level {
                applied.push(format!("Level: {level}"));
            }
            if let Some(guideline) = &filter.guideline {
                applied.push(format!("Guideline: {guideline}"));
            }
            if let Some(principle) = &filter.principle {
                applied.push(format!("Principle: {principle}"));
            }
            if let Some(version) = &filter.version {
                applied.push(format!("Version: {version}"));
            }
            let filter_text = if applied.is_empty() {
                String::new()
            } else {
                format!("\nFilters: {}\n", applied.join(", "))
            };

            format!(
                "# WCAG 2.2 Success Criteria ({} found)\n{filter_text}\n{}",
                criteria.len(),
                entries.join("\n\n")
            )
        },
    )
}

pub fn get_success_criteria_detail() -> Tool {
    Tool::new(
        "get-success-criteria-detail",
        "Gets the normative success criterion requirements - just the title and exception details without Understanding documentation.",
        ref_id_schema(),
        |document: &WcagDocument, params: RefIdParams| {
            let Some(found) = document.resolve_criterion(&params.ref_id) else {
                return criterion_not_found(&params.ref_id, true);
            };
            let sc = found.criterion;

            let mut out = format!("# {} {}\n\n", sc.num, sc.handle);
            push_overview(&mut out, &found);
            let _ = writeln!(out, "## Success Criterion\n\n{}\n", sc.title);
            push_details(&mut out, &sc.details);
            push_links(&mut out, sc);
            out
        },
    )
}

pub fn get_criterion() -> Tool {
    Tool::new(
        "get-criterion",
        "Gets full details for a specific WCAG success criterion by its reference number (e.g., \"1.1.1\", \"2.4.7\", \"4.1.2\"), including complete Understanding documentation.",
        ref_id_schema(),
        |document: &WcagDocument, params: RefIdParams| {
            let Some(found) = document.resolve_criterion(&params.ref_id) else {
                return criterion_not_found(&params.ref_id, true);
            };
            let sc = found.criterion;
            let understanding = sc.understanding.as_ref();

            let mut out = format!("# {} {}\n\n", sc.num, sc.handle);
            push_overview(&mut out, &found);

            if let Some(brief) = understanding.and_then(|u| u.brief.as_ref()) {
                out.push_str("## In Brief\n\n");
                for (key, label) in BRIEF_LABELS {
                    if let Some(text) = brief.get(key) {
                        let _ = writeln!(out, "**{label}:** {text}");
                    }
                }
                out.push('\n');
            }

            let _ = writeln!(out, "## Description\n\n{}\n", sc.title);
            push_details(&mut out, &sc.details);

            if let Some(understanding) = understanding {
                if let Some(intent) = &understanding.intent {
                    let _ = writeln!(out, "## Intent\n\n{intent}\n");
                }

                if !understanding.benefits.is_empty() {
                    out.push_str("## Benefits\n\n");
                    for benefit in &understanding.benefits {
                        let _ = writeln!(out, "- {benefit}");
                    }
                    out.push('\n');
                }

                if !understanding.examples.is_empty() {
                    out.push_str("## Examples\n\n");
                    for (i, example) in understanding.examples.iter().enumerate() {
                        let _ = writeln!(out, "### Example {}\n\n{example}\n", i + 1);
                    }
                }

                if !understanding.resources.is_empty() {
                    out.push_str("## Resources\n\n");
                    for resource in &understanding.resources {
                        let _ = writeln!(out, "- [{}]({})", resource.title, resource.url);
                    }
                    out.push('\n');
                }
            }

            push_links(&mut out, sc);
            out
        },
    )
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default, deserialize_with = "scalar_string")]
    level: Option<String>,
}

pub fn search_wcag() -> Tool {
    Tool::new(
        "search-wcag",
        "Searches WCAG 2.2 success criteria by keyword in titles and descriptions.",
        object_schema(
            json!({
                "query": {
                    "type": "string",
                    "description": "Search query (searches titles and descriptions)"
                },
                "level": {
                    "type": "string",
                    "description": "Optional: Filter results by conformance level",
                    "enum": ["A", "AA", "AAA"]
                }
            }),
            &["query"],
        ),
        |document: &WcagDocument, params: SearchParams| {
            let no_match = || {
                let at_level = params
                    .level
                    .as_deref()
                    .filter(|l| !l.is_empty())
                    .map(|l| format!(" at level {l}"))
                    .unwrap_or_default();
                format!(
                    "No success criteria found matching \"{}\"{at_level}.",
                    params.query
                )
            };

            let Ok(level) = parse_optional::<Level>(params.level.as_deref()) else {
                return no_match();
            };
            let matches = document.search_success_criteria(&params.query, level);
            if matches.is_empty() {
                return no_match();
            }

            let entries: Vec<String> = matches
                .iter()
                .map(|r| {
                    let sc = r.criterion;
                    format!(
                        "**{} {}** (Level {})\n{}",
                        sc.num,
                        sc.handle,
                        sc.level,
                        truncate(&sc.title, SEARCH_TITLE_CHARS)
                    )
                })
                .collect();

            format!(
                "# Search Results for \"{}\" ({} found)\n\n{}",
                params.query,
                matches.len(),
                entries.join("\n\n---\n\n")
            )
        },
    )
}

#[derive(Debug, Deserialize)]
struct ByLevelParams {
    level: Level,
    #[serde(default)]
    include_lower: bool,
}

pub fn get_criteria_by_level() -> Tool {
    Tool::new(
        "get-criteria-by-level",
        "Gets all success criteria for a specific conformance level. Optionally includes lower levels (e.g., AA includes A).",
        object_schema(
            json!({
                "level": {
                    "type": "string",
                    "description": "Conformance level to retrieve",
                    "enum": ["A", "AA", "AAA"]
                },
                "include_lower": {
                    "type": "boolean",
                    "description": "If true, includes criteria from lower levels (e.g., AA query returns both A and AA criteria)"
                }
            }),
            &["level"],
        ),
        |document: &WcagDocument, params: ByLevelParams| {
            let levels = if params.include_lower {
                params.level.at_or_below()
            } else {
                vec![params.level]
            };

            let criteria = document.list_success_criteria(&CriteriaFilter {
                levels: Some(levels.clone()),
                ..CriteriaFilter::default()
            });
            if criteria.is_empty() {
                return format!("No success criteria found for level {}.", params.level);
            }

            let mut out = format!(
                "# WCAG 2.2 Level {}{}\n\n",
                params.level,
                if params.include_lower {
                    " (including lower levels)"
                } else {
                    ""
                }
            );
            let _ = writeln!(out, "Total: {} success criteria\n", criteria.len());

            for level in levels {
                let at_level: Vec<_> = criteria
                    .iter()
                    .filter(|r| r.criterion.level == level)
                    .collect();
                if at_level.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "## Level {level} ({} criteria)\n", at_level.len());
                for r in at_level {
                    let _ = writeln!(out, "- **{}** {}", r.criterion.num, r.criterion.handle);
                }
                out.push('\n');
            }

            out
        },
    )
}

#[derive(Debug, Deserialize)]
struct CountParams {
    group_by: GroupBy,
}

pub fn count_criteria() -> Tool {
    Tool::new(
        "count-criteria",
        "Returns counts of success criteria grouped by level, principle, or guideline.",
        object_schema(
            json!({
                "group_by": {
                    "type": "string",
                    "description": "How to group the counts",
                    "enum": ["level", "principle", "guideline"]
                }
            }),
            &["group_by"],
        ),
        |document: &WcagDocument, params: CountParams| {
            let heading = match params.group_by {
                GroupBy::Level => "Level",
                GroupBy::Principle => "Principle",
                GroupBy::Guideline => "Guideline",
            };
            let lines: Vec<String> = document
                .count_criteria(params.group_by)
                .into_iter()
                .map(|(key, count)| format!("- **{key}**: {count}"))
                .collect();

            format!(
                "# WCAG 2.2 Success Criteria by {heading}\n\nTotal: {} success criteria\n\n{}",
                document.criteria().count(),
                lines.join("\n")
            )
        },
    )
}

pub fn whats_new_in_wcag22() -> Tool {
    Tool::new(
        "whats-new-in-wcag22",
        "Lists all success criteria that were added in WCAG 2.2.",
        object_schema(json!({}), &[]),
        |document: &WcagDocument, _: NoParams| {
            let added = document.criteria_introduced_in("2.2");

            let mut out = String::from("# What's New in WCAG 2.2\n\n");
            let _ = writeln!(out, "WCAG 2.2 added {} new success criteria:\n", added.len());

            for level in Level::ALL {
                let at_level: Vec<_> = added
                    .iter()
                    .filter(|r| r.criterion.level == level)
                    .collect();
                if at_level.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "## Level {level}\n");
                for r in at_level {
                    let sc = r.criterion;
                    let _ = writeln!(out, "### {} {}", sc.num, sc.handle);
                    let _ = writeln!(out, "{}\n", truncate(&sc.title, LIST_TITLE_CHARS));
                }
            }

            out
        },
    )
}

pub fn get_full_criterion_context() -> Tool {
    Tool::new(
        "get-full-criterion-context",
        "Gets comprehensive context for a success criterion including its overview, a techniques summary and reference links.",
        ref_id_schema(),
        |document: &WcagDocument, params: RefIdParams| {
            let Some((found, trees)) = document.techniques_for_criterion(&params.ref_id) else {
                return criterion_not_found(&params.ref_id, false);
            };
            let sc = found.criterion;

            let mut out = format!("# Complete Context: {} {}\n\n", sc.num, sc.handle);
            out.push_str("## Overview\n\n");
            push_overview(&mut out, &found);
            let _ = writeln!(out, "{}\n", sc.title);

            out.push_str("## Techniques Summary\n\n");
            for (kind, label) in [
                (TechniqueType::Sufficient, "Sufficient"),
                (TechniqueType::Advisory, "Advisory"),
                (TechniqueType::Failure, "Failure"),
            ] {
                let _ = writeln!(
                    out,
                    "- **{label}:** {} techniques",
                    count_technique_references(trees.tree(kind))
                );
            }
            out.push('\n');

            push_links(&mut out, sc);
            out
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::tools::test_support::call;
    use serde_json::json;

    #[test]
    fn list_with_filters() {
        let text = call("list-success-criteria", json!({"level": "AA"}));
        assert!(text.starts_with("# WCAG 2.2 Success Criteria (2 found)\n\nFilters: Level: AA\n"));
        assert!(text.contains("**1.4.3 Contrast (Minimum)** (Level AA)\nGuideline: 1.4 Distinguishable"));
        assert!(!text.contains("1.1.1"));

        let text = call("list-success-criteria", json!({"version": "20"}));
        assert!(text.contains("Filters: Version: 2.0"));
        assert!(!text.contains("2.4.11"));
    }

    #[test]
    fn numeric_filters_match_their_string_form() {
        let by_number = call("list-success-criteria", json!({"principle": 1}));
        assert_eq!(by_number, call("list-success-criteria", json!({"principle": "1"})));
        assert!(by_number.contains("1.1.1"));
        assert!(!by_number.contains("2.4.11"));

        let by_number = call("list-success-criteria", json!({"guideline": 1.4, "version": 2.2}));
        assert_eq!(
            by_number,
            call("list-success-criteria", json!({"guideline": "1.4", "version": "2.2"}))
        );
    }

    #[test]
    fn list_with_invalid_level_is_empty() {
        let text = call("list-success-criteria", json!({"level": "B"}));
        assert_eq!(text, "No success criteria found matching your filters.");
    }

    #[test]
    fn criterion_with_understanding() {
        let text = call("get-criterion", json!({"ref_id": "1.4.3"}));
        assert!(text.starts_with("# 1.4.3 Contrast (Minimum)\n\n**Level:** AA\n"));
        assert!(text.contains("## In Brief\n\n**Goal:** Text can be seen by more people.\n**What to do:**"));
        assert!(text.contains("## Description\n\nThe visual presentation of text"));
        assert!(text.contains("> **Note 1:** Logotypes have no contrast requirement."));
        assert!(text.contains("## Intent\n\nThe intent is"));
        assert!(text.contains("## Benefits\n\n- People with low vision"));
        assert!(text.contains("### Example 1\n\nA grey background"));
        assert!(text.contains("- [Contrast checker](https://example.org/contrast)"));
        assert!(text.ends_with("- [How to Meet 1.4.3](https://www.w3.org/WAI/WCAG22/quickref/#contrast-minimum)\n"));
    }

    #[test]
    fn criterion_by_slug() {
        let text = call("get-criterion", json!({"ref_id": "non-text-content"}));
        assert!(text.starts_with("# 1.1.1 Non-text Content"));
        assert!(!text.contains("## Intent"));
    }

    #[test]
    fn criterion_not_found_is_text() {
        let text = call("get-criterion", json!({"ref_id": "9.9.9"}));
        assert_eq!(
            text,
            "No success criterion found with number \"9.9.9\". Use format like \"1.1.1\" or \"2.4.7\"."
        );
    }

    #[test]
    fn detail_is_normative_only() {
        let text = call("get-success-criteria-detail", json!({"ref_id": "1.1.1"}));
        assert!(text.contains("## Success Criterion\n\nAll non-text content"));
        assert!(text.contains("- **Controls, Input:** If non-text content is a control"));
        assert!(!text.contains("## In Brief"));
    }

    #[test]
    fn search_by_keyword_and_level() {
        let text = call("search-wcag", json!({"query": "contrast"}));
        assert!(text.starts_with("# Search Results for \"contrast\" (1 found)"));

        let text = call("search-wcag", json!({"query": "contrast", "level": "A"}));
        assert_eq!(text, "No success criteria found matching \"contrast\" at level A.");
    }

    #[test]
    fn by_level_includes_lower() {
        let text = call("get-criteria-by-level", json!({"level": "AA", "include_lower": true}));
        assert!(text.starts_with("# WCAG 2.2 Level AA (including lower levels)\n\nTotal: 3 success criteria"));
        assert!(text.contains("## Level A (1 criteria)\n\n- **1.1.1** Non-text Content"));
        assert!(text.contains("## Level AA (2 criteria)"));

        let text = call("get-criteria-by-level", json!({"level": "AAA"}));
        assert_eq!(text, "No success criteria found for level AAA.");
    }

    #[test]
    fn by_level_rejects_unknown_level() {
        let registry = crate::tools::test_support::registry();
        assert!(registry
            .call("get-criteria-by-level", json!({"level": "B"}))
            .is_err());
    }

    #[test]
    fn counts_by_principle() {
        let text = call("count-criteria", json!({"group_by": "principle"}));
        assert!(text.starts_with("# WCAG 2.2 Success Criteria by Principle\n\nTotal: 3 success criteria"));
        assert!(text.contains("- **1. Perceivable**: 2"));
        assert!(text.contains("- **2. Operable**: 1"));
    }

    #[test]
    fn whats_new_lists_22_only() {
        let text = call("whats-new-in-wcag22", json!({}));
        assert!(text.contains("WCAG 2.2 added 1 new success criteria:"));
        assert!(text.contains("## Level AA\n\n### 2.4.11 Focus Not Obscured (Minimum)"));
        assert!(!text.contains("1.4.3"));
    }

    #[test]
    fn full_context_counts_techniques() {
        let text = call("get-full-criterion-context", json!({"ref_id": "1.1.1"}));
        assert!(text.starts_with("# Complete Context: 1.1.1 Non-text Content\n\n## Overview"));
        assert!(text.contains("- **Sufficient:** 2 techniques"));
        assert!(text.contains("- **Advisory:** 1 techniques"));
        assert!(text.contains("- **Failure:** 1 techniques"));

        let text = call("get-full-criterion-context", json!({"ref_id": "2.4.11"}));
        assert!(text.contains("- **Sufficient:** 0 techniques"));
    }
}
