//! Read-only lookups over the document tree.
//!
//! Every function here is a pure read. "Not found" is `None` or an empty
//! result, never an error; callers decide how to phrase a miss.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::wcag::model::{
    GlossaryTerm, Guideline, Level, Principle, SuccessCriterion, WcagDocument,
};
use crate::wcag::text::{normalize_version, strip_markup};

/// A success criterion together with its parent guideline and principle.
#[derive(Debug, Clone, Copy)]
pub struct CriterionRef<'a> {
    /// Owning principle.
    pub principle: &'a Principle,
    /// Owning guideline.
    pub guideline: &'a Guideline,
    /// The criterion itself.
    pub criterion: &'a SuccessCriterion,
}

/// Optional constraints for [`WcagDocument::list_success_criteria`].
///
/// Fields combine with logical AND. An absent field imposes no constraint.
#[derive(Debug, Clone, Default)]
pub struct CriteriaFilter {
    /// Keep criteria under this principle number (`"1"`..`"4"`).
    pub principle: Option<String>,
    /// Keep criteria under this guideline number (`"2.4"`).
    pub guideline: Option<String>,
    /// Keep criteria of exactly this level.
    pub level: Option<Level>,
    /// Keep criteria whose level is one of these.
    pub levels: Option<Vec<Level>>,
    /// Keep criteria that belong to this WCAG version (`"2.1"`).
    pub version: Option<String>,
}

impl CriteriaFilter {
    fn matches(&self, item: &CriterionRef<'_>) -> bool {
        if self
            .principle
            .as_deref()
            .is_some_and(|p| item.principle.num != p)
        {
            return false;
        }
        if self
            .guideline
            .as_deref()
            .is_some_and(|g| item.guideline.num != g)
        {
            return false;
        }
        if self.level.is_some_and(|l| item.criterion.level != l) {
            return false;
        }
        if self
            .levels
            .as_ref()
            .is_some_and(|levels| !levels.contains(&item.criterion.level))
        {
            return false;
        }
        if self
            .version
            .as_deref()
            .is_some_and(|v| !item.criterion.versions.iter().any(|cv| cv == v))
        {
            return false;
        }
        true
    }
}

/// Grouping key for [`WcagDocument::count_criteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Group by conformance level.
    Level,
    /// Group by principle.
    Principle,
    /// Group by guideline.
    Guideline,
}

impl GroupBy {
    /// Returns the lowercase grouping name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Principle => "principle",
            Self::Guideline => "guideline",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "level" => Ok(Self::Level),
            "principle" => Ok(Self::Principle),
            "guideline" => Ok(Self::Guideline),
            other => Err(format!("unknown grouping '{other}'")),
        }
    }
}

/// Dataset-wide counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Number of principles.
    pub principles: usize,
    /// Number of guidelines.
    pub guidelines: usize,
    /// Number of success criteria.
    pub criteria: usize,
    /// Number of success criteria per level.
    pub criteria_by_level: BTreeMap<Level, usize>,
    /// Number of distinct techniques.
    pub techniques: usize,
    /// Number of glossary terms.
    pub terms: usize,
}

impl WcagDocument {
    /// Iterates over every success criterion in document order.
    pub fn criteria(&self) -> impl Iterator<Item = &SuccessCriterion> {
        self.principles
            .iter()
            .flat_map(|p| &p.guidelines)
            .flat_map(|g| &g.success_criteria)
    }

    /// Iterates over every success criterion with its parents, in document order.
    pub fn criterion_refs(&self) -> impl Iterator<Item = CriterionRef<'_>> {
        self.principles.iter().flat_map(|principle| {
            principle.guidelines.iter().flat_map(move |guideline| {
                guideline
                    .success_criteria
                    .iter()
                    .map(move |criterion| CriterionRef {
                        principle,
                        guideline,
                        criterion,
                    })
            })
        })
    }

    /// Finds a principle by number (`"1"`..`"4"`).
    #[must_use]
    pub fn find_principle(&self, num: &str) -> Option<&Principle> {
        let num = num.trim();
        self.principles.iter().find(|p| p.num == num)
    }

    /// Finds a guideline by dotted number, searching every principle.
    #[must_use]
    pub fn find_guideline(&self, num: &str) -> Option<(&Principle, &Guideline)> {
        let num = num.trim();
        self.principles.iter().find_map(|principle| {
            principle
                .guidelines
                .iter()
                .find(|g| g.num == num)
                .map(|guideline| (principle, guideline))
        })
    }

    /// Finds a success criterion by dotted number.
    #[must_use]
    pub fn find_success_criterion(&self, num: &str) -> Option<CriterionRef<'_>> {
        let num = num.trim();
        self.criterion_refs().find(|r| r.criterion.num == num)
    }

    /// Finds a success criterion by its stable identifier (`"non-text-content"`).
    #[must_use]
    pub fn find_success_criterion_by_slug(&self, id: &str) -> Option<CriterionRef<'_>> {
        let id = id.trim();
        self.criterion_refs().find(|r| r.criterion.id == id)
    }

    /// Resolves a criterion reference given either as a number or as an identifier.
    #[must_use]
    pub fn resolve_criterion(&self, reference: &str) -> Option<CriterionRef<'_>> {
        self.find_success_criterion(reference)
            .or_else(|| self.find_success_criterion_by_slug(reference))
    }

    /// Lists the criteria matching every field of `filter`, in document order.
    #[must_use]
    pub fn list_success_criteria(&self, filter: &CriteriaFilter) -> Vec<CriterionRef<'_>> {
        self.criterion_refs().filter(|r| filter.matches(r)).collect()
    }

    /// Finds criteria whose handle, title or plain-text content contains `query`.
    #[must_use]
    pub fn search_success_criteria(
        &self,
        query: &str,
        level: Option<Level>,
    ) -> Vec<CriterionRef<'_>> {
        let query = query.to_lowercase();
        let filter = CriteriaFilter {
            level,
            ..CriteriaFilter::default()
        };

        self.criterion_refs()
            .filter(|r| filter.matches(r))
            .filter(|r| {
                let sc = r.criterion;
                sc.handle.to_lowercase().contains(&query)
                    || sc.title.to_lowercase().contains(&query)
                    || strip_markup(&sc.content).to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Lists criteria first introduced in `version`.
    ///
    /// A criterion qualifies when its version tags contain the target and none
    /// of its tags sort before it.
    #[must_use]
    pub fn criteria_introduced_in(&self, version: &str) -> Vec<CriterionRef<'_>> {
        let version = normalize_version(version);

        self.criterion_refs()
            .filter(|r| {
                let versions = &r.criterion.versions;
                versions.iter().any(|v| *v == version)
                    && !versions.iter().any(|v| v.as_str() < version.as_str())
            })
            .collect()
    }

    /// Counts criteria per group, ordered by level or by document order.
    #[must_use]
    pub fn count_criteria(&self, group_by: GroupBy) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();

        let labelled: Vec<String> = match group_by {
            GroupBy::Level => {
                let mut refs = self.criterion_refs().collect::<Vec<_>>();
                refs.sort_by_key(|r| r.criterion.level);
                refs.iter()
                    .map(|r| format!("Level {}", r.criterion.level))
                    .collect()
            }
            GroupBy::Principle => self
                .criterion_refs()
                .map(|r| format!("{}. {}", r.principle.num, r.principle.handle))
                .collect(),
            GroupBy::Guideline => self
                .criterion_refs()
                .map(|r| format!("{} {}", r.guideline.num, r.guideline.handle))
                .collect(),
        };

        for label in labelled {
            match counts.last_mut() {
                Some((last, count)) if *last == label => *count += 1,
                _ => counts.push((label, 1)),
            }
        }

        counts
    }

    /// Finds a glossary term by name or derived identifier, ignoring case.
    #[must_use]
    pub fn find_term(&self, name: &str) -> Option<&GlossaryTerm> {
        let name = name.trim().to_lowercase();
        let derived_id = format!(
            "dfn-{}",
            name.split_whitespace().collect::<Vec<_>>().join("-")
        );

        self.terms
            .iter()
            .find(|t| t.name.to_lowercase() == name || t.id.to_lowercase() == derived_id)
    }

    /// Finds glossary terms whose name or plain-text definition contains `query`.
    #[must_use]
    pub fn search_terms(&self, query: &str) -> Vec<&GlossaryTerm> {
        let query = query.to_lowercase();
        self.terms
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&query)
                    || strip_markup(&t.definition).to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Returns the number of guidelines across all principles.
    #[must_use]
    pub fn guideline_count(&self) -> usize {
        self.principles.iter().map(|p| p.guidelines.len()).sum()
    }

    /// Computes dataset-wide counts.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let mut criteria_by_level: BTreeMap<Level, usize> =
            Level::ALL.into_iter().map(|l| (l, 0)).collect();
        for sc in self.criteria() {
            *criteria_by_level.entry(sc.level).or_default() += 1;
        }

        Statistics {
            principles: self.principles.len(),
            guidelines: self.guideline_count(),
            criteria: self.criteria().count(),
            criteria_by_level,
            techniques: self.list_techniques().len(),
            terms: self.terms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> WcagDocument {
        serde_json::from_str(
            r#"{
                "principles": [
                    {"id": "perceivable", "num": "1", "handle": "Perceivable", "guidelines": [
                        {"id": "text-alternatives", "num": "1.1", "handle": "Text Alternatives", "successcriteria": [
                            {"id": "non-text-content", "num": "1.1.1", "handle": "Non-text Content", "title": "All non-text content...", "level": "A", "versions": ["2.0", "2.1", "2.2"]}
                        ]},
                        {"id": "distinguishable", "num": "1.4", "handle": "Distinguishable", "successcriteria": [
                            {"id": "contrast-minimum", "num": "1.4.3", "handle": "Contrast (Minimum)", "level": "AA", "versions": ["2.0", "2.1", "2.2"]},
                            {"id": "reflow", "num": "1.4.10", "handle": "Reflow", "level": "AA", "versions": ["2.1", "2.2"]}
                        ]}
                    ]},
                    {"id": "operable", "num": "2", "handle": "Operable", "guidelines": [
                        {"id": "navigable", "num": "2.4", "handle": "Navigable", "successcriteria": [
                            {"id": "focus-not-obscured-minimum", "num": "2.4.11", "handle": "Focus Not Obscured (Minimum)", "level": "AA", "content": "<p>When a <em>user interface component</em> receives focus</p>", "versions": ["2.2"]},
                            {"id": "focus-appearance", "num": "2.4.13", "handle": "Focus Appearance", "level": "AAA", "versions": ["2.2"]}
                        ]}
                    ]}
                ],
                "terms": [
                    {"id": "dfn-text-alternative", "name": "text alternative", "definition": "<p>Text that is programmatically associated</p>"},
                    {"id": "dfn-user-agent", "name": "user agent", "definition": "any software that retrieves web content"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn find_by_number_and_slug() {
        let doc = document();
        assert_eq!(doc.find_principle("2").unwrap().handle, "Operable");
        assert!(doc.find_principle("5").is_none());

        let (principle, guideline) = doc.find_guideline("1.4").unwrap();
        assert_eq!(principle.num, "1");
        assert_eq!(guideline.handle, "Distinguishable");

        let found = doc.find_success_criterion("1.4.10").unwrap();
        assert_eq!(found.criterion.handle, "Reflow");
        assert_eq!(found.guideline.num, "1.4");

        let by_slug = doc.find_success_criterion_by_slug("contrast-minimum").unwrap();
        assert_eq!(by_slug.criterion.num, "1.4.3");
        assert_eq!(doc.resolve_criterion("reflow").unwrap().criterion.num, "1.4.10");
        assert!(doc.resolve_criterion("9.9.9").is_none());
    }

    #[test]
    fn filters_compose_with_and() {
        let doc = document();
        let filter = CriteriaFilter {
            principle: Some("1".to_string()),
            level: Some(Level::AA),
            ..CriteriaFilter::default()
        };
        let nums: Vec<&str> = doc
            .list_success_criteria(&filter)
            .iter()
            .map(|r| r.criterion.num.as_str())
            .collect();
        assert_eq!(nums, vec!["1.4.3", "1.4.10"]);

        let filter = CriteriaFilter {
            version: Some("2.0".to_string()),
            levels: Some(vec![Level::A]),
            ..CriteriaFilter::default()
        };
        assert_eq!(doc.list_success_criteria(&filter).len(), 1);
        assert_eq!(doc.list_success_criteria(&CriteriaFilter::default()).len(), 5);
    }

    #[test]
    fn introduced_in_is_first_appearance() {
        let doc = document();
        let new_in_21: Vec<&str> = doc
            .criteria_introduced_in("2.1")
            .iter()
            .map(|r| r.criterion.num.as_str())
            .collect();
        assert_eq!(new_in_21, vec!["1.4.10"]);
        assert_eq!(doc.criteria_introduced_in("22").len(), 2);
    }

    #[test]
    fn search_matches_stripped_content() {
        let doc = document();
        let found = doc.search_success_criteria("user interface component", None);
        assert_eq!(found.len(), 1);
        assert!(doc
            .search_success_criteria("user interface component", Some(Level::A))
            .is_empty());
        assert_eq!(doc.search_success_criteria("CONTRAST", None).len(), 1);
    }

    #[test]
    fn term_lookup_by_name_or_derived_id() {
        let doc = document();
        assert_eq!(doc.find_term("Text Alternative").unwrap().id, "dfn-text-alternative");
        assert_eq!(doc.find_term("user   agent").unwrap().name, "user agent");
        assert!(doc.find_term("alternative").is_none());
        assert_eq!(doc.search_terms("programmatically").len(), 1);
        assert_eq!(doc.search_terms("alternative").len(), 1);
    }

    #[test]
    fn counts_by_group() {
        let doc = document();
        assert_eq!(
            doc.count_criteria(GroupBy::Level),
            vec![
                ("Level A".to_string(), 1),
                ("Level AA".to_string(), 3),
                ("Level AAA".to_string(), 1)
            ]
        );
        assert_eq!(
            doc.count_criteria(GroupBy::Principle),
            vec![("1. Perceivable".to_string(), 3), ("2. Operable".to_string(), 2)]
        );
        assert_eq!(doc.count_criteria(GroupBy::Guideline).len(), 3);
    }

    #[test]
    fn statistics_cover_every_tier() {
        let stats = document().statistics();
        assert_eq!(stats.principles, 2);
        assert_eq!(stats.guidelines, 3);
        assert_eq!(stats.criteria, 5);
        assert_eq!(stats.criteria_by_level[&Level::AA], 3);
        assert_eq!(stats.techniques, 0);
        assert_eq!(stats.terms, 2);
    }
}
