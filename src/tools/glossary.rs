//! Glossary tools.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Deserialize;
use serde_json::json;

use super::format::SEARCH_TITLE_CHARS;
use super::{object_schema, NoParams, QueryParams, Tool};
use crate::wcag::text::{strip_markup, truncate};
use crate::wcag::{GlossaryTerm, WcagDocument};

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct TermParams {
    term: String,
}

pub fn get_glossary_term() -> Tool {
    Tool::new(
        "get-glossary-term",
        "Gets the definition of a WCAG glossary term.",
        object_schema(
            json!({
                "term": {
                    "type": "string",
                    "description": "The term to look up (e.g., \"programmatically determined\", \"text alternative\")"
                }
            }),
            &["term"],
        ),
        |document: &WcagDocument, params: TermParams| {
            let Some(term) = document.find_term(&params.term) else {
                let suggestions: Vec<String> = document
                    .search_terms(&params.term)
                    .into_iter()
                    .take(MAX_SUGGESTIONS)
                    .map(|t| format!("- {}", t.name))
                    .collect();

                if suggestions.is_empty() {
                    return format!("Term \"{}\" not found in the WCAG glossary.", params.term);
                }
                return format!(
                    "Term \"{}\" not found. Did you mean:\n\n{}",
                    params.term,
                    suggestions.join("\n")
                );
            };

            format!(
                "# {}\n\n{}\n\n[View in WCAG 2.2 Glossary]({})",
                term.name,
                strip_markup(&term.definition),
                term.url()
            )
        },
    )
}

pub fn list_glossary_terms() -> Tool {
    Tool::new(
        "list-glossary-terms",
        "Lists all WCAG glossary terms.",
        object_schema(json!({}), &[]),
        |document: &WcagDocument, _: NoParams| {
            let mut terms: Vec<&GlossaryTerm> = document.terms.iter().collect();
            terms.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });

            let mut by_letter: BTreeMap<String, Vec<&GlossaryTerm>> = BTreeMap::new();
            for &term in &terms {
                let letter = term
                    .name
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().to_string())
                    .unwrap_or_default();
                by_letter.entry(letter).or_default().push(term);
            }

            let mut out = format!("# WCAG 2.2 Glossary ({} terms)\n\n", terms.len());
            for (letter, group) in by_letter {
                let _ = writeln!(out, "## {letter}\n");
                for term in group {
                    let _ = writeln!(out, "- **{}**", term.name);
                }
                out.push('\n');
            }

            out
        },
    )
}

pub fn search_glossary() -> Tool {
    Tool::new(
        "search-glossary",
        "Searches the WCAG glossary by keyword.",
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
            let matches = document.search_terms(&params.query);
            if matches.is_empty() {
                return format!("No glossary terms found matching \"{}\".", params.query);
            }

            let entries: Vec<String> = matches
                .iter()
                .map(|t| {
                    format!(
                        "**{}**\n{}",
                        t.name,
                        truncate(&strip_markup(&t.definition), SEARCH_TITLE_CHARS)
                    )
                })
                .collect();

            format!(
                "# Glossary Search Results for \"{}\" ({} found)\n\n{}",
                params.query,
                matches.len(),
                entries.join("\n\n---\n\n")
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::tools::test_support::call;
    use serde_json::json;

    #[test]
    fn term_definition_is_plain_text() {
        let text = call("get-glossary-term", json!({"term": "Text Alternative"}));
        assert_eq!(
            text,
            "# text alternative\n\nText that is programmatically associated with non-text content.\n\n[View in WCAG 2.2 Glossary](https://www.w3.org/TR/WCAG22/#dfn-text-alternative)"
        );
    }

    #[test]
    fn missing_term_suggests_similar() {
        let text = call("get-glossary-term", json!({"term": "contrast"}));
        assert_eq!(text, "Term \"contrast\" not found. Did you mean:\n\n- contrast ratio");

        let text = call("get-glossary-term", json!({"term": "zebra"}));
        assert_eq!(text, "Term \"zebra\" not found in the WCAG glossary.");
    }

    #[test]
    fn terms_are_grouped_by_letter() {
        let text = call("list-glossary-terms", json!({}));
        assert_eq!(
            text,
            "# WCAG 2.2 Glossary (2 terms)\n\n## C\n\n- **contrast ratio**\n\n## T\n\n- **text alternative**\n\n"
        );
    }

    #[test]
    fn glossary_search() {
        let text = call("search-glossary", json!({"query": "programmatically"}));
        assert!(text.starts_with("# Glossary Search Results for \"programmatically\" (1 found)"));
        assert!(text.contains("**text alternative**\nText that is programmatically"));

        let text = call("search-glossary", json!({"query": "zebra"}));
        assert_eq!(text, "No glossary terms found matching \"zebra\".");
    }
}
