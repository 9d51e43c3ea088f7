//! Technique index derived from the criteria tree.
//!
//! Techniques are not stored in the dataset as a flat list. Each criterion
//! references them from three trees (sufficient, advisory, failure) with
//! arbitrarily nested sections, groups, `using` and `and` sub-references. The
//! index is rebuilt from those references on demand: a technique referenced by
//! N criteria is one record carrying N criterion numbers.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::wcag::model::{
    TechniqueEntry, TechniqueTrees, TechniqueType, WcagDocument, TECHNIQUES_BASE_URL,
};
use crate::wcag::query::CriterionRef;
use crate::wcag::text::{compare_dotted, compare_technique_ids};

static NO_TECHNIQUES: TechniqueTrees = TechniqueTrees {
    sufficient: Vec::new(),
    advisory: Vec::new(),
    failure: Vec::new(),
};

/// A technique merged across every criterion that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Technique {
    /// Technique identifier, e.g. `H37`.
    pub id: String,
    /// Technology folder, e.g. `html`.
    pub technology: Option<String>,
    /// Technique title.
    pub title: String,
    /// Every tree the technique appears in.
    pub types: BTreeSet<TechniqueType>,
    /// Referencing criterion numbers, in dotted order.
    pub criteria: Vec<String>,
}

impl Technique {
    /// Returns the technology, or `other` when the dataset omits it.
    #[must_use]
    pub fn technology_or_other(&self) -> &str {
        self.technology.as_deref().unwrap_or("other")
    }

    /// Returns the documentation URL for this technique.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{TECHNIQUES_BASE_URL}{}/{}",
            self.technology_or_other(),
            self.id
        )
    }
}

/// Optional constraints for [`WcagDocument::filter_techniques`].
///
/// Absent fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct TechniqueFilter {
    /// Keep techniques of this technology only.
    pub technology: Option<String>,
    /// Keep techniques that appear in this tree.
    pub kind: Option<TechniqueType>,
}

#[derive(Debug, Default)]
struct PendingTechnique {
    technology: Option<String>,
    title: String,
    types: BTreeSet<TechniqueType>,
    criteria: BTreeSet<String>,
}

/// Merges technique references into one record per identifier.
///
/// Merging is commutative: conflicting titles or technologies resolve to the
/// lexicographically smallest value, so the result does not depend on the
/// order references are added in.
#[derive(Debug, Default)]
pub struct TechniqueAccumulator {
    entries: BTreeMap<String, PendingTechnique>,
}

impl TechniqueAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every technique reachable from `tree` as referenced by `criterion`.
    pub fn add_tree(&mut self, criterion: &str, kind: TechniqueType, tree: &[TechniqueEntry]) {
        let mut stack: Vec<&TechniqueEntry> = tree.iter().collect();

        while let Some(entry) = stack.pop() {
            if let (Some(id), Some(title)) = (&entry.id, &entry.title) {
                self.record(criterion, kind, id, entry.technology.as_deref(), title);
            }

            stack.extend(&entry.techniques);
            stack.extend(entry.groups.iter().flat_map(|g| &g.techniques));
            stack.extend(&entry.using);
            stack.extend(&entry.and);
        }
    }

    /// Records a single reference.
    pub fn record(
        &mut self,
        criterion: &str,
        kind: TechniqueType,
        id: &str,
        technology: Option<&str>,
        title: &str,
    ) {
        let pending = self.entries.entry(id.to_string()).or_default();

        if pending.title.is_empty() || title < pending.title.as_str() {
            pending.title = title.to_string();
        }
        if let Some(technology) = technology {
            match &pending.technology {
                Some(existing) if existing.as_str() <= technology => {}
                _ => pending.technology = Some(technology.to_string()),
            }
        }
        pending.types.insert(kind);
        pending.criteria.insert(criterion.to_string());
    }

    /// Returns the number of distinct techniques seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no technique has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produces the merged records ordered by technique identifier.
    #[must_use]
    pub fn finish(self) -> Vec<Technique> {
        let mut techniques: Vec<Technique> = self
            .entries
            .into_iter()
            .map(|(id, pending)| {
                let mut criteria: Vec<String> = pending.criteria.into_iter().collect();
                criteria.sort_by(|a, b| compare_dotted(a, b));
                Technique {
                    id,
                    technology: pending.technology,
                    title: pending.title,
                    types: pending.types,
                    criteria,
                }
            })
            .collect();

        techniques.sort_by(|a, b| compare_technique_ids(&a.id, &b.id));
        techniques
    }
}

/// Counts technique references in one tree, including nested ones.
///
/// Each member of an `and` combination counts once, with or without an ID,
/// and is not descended into.
#[must_use]
pub fn count_technique_references(tree: &[TechniqueEntry]) -> usize {
    let mut stack: Vec<&TechniqueEntry> = tree.iter().collect();
    let mut count = 0;

    while let Some(entry) = stack.pop() {
        if entry.id.is_some() {
            count += 1;
        }
        stack.extend(&entry.techniques);
        stack.extend(entry.groups.iter().flat_map(|g| &g.techniques));
        stack.extend(&entry.using);
        count += entry.and.len();
    }

    count
}

impl WcagDocument {
    /// Derives the deduplicated technique index from every criterion.
    #[must_use]
    pub fn list_techniques(&self) -> Vec<Technique> {
        let mut accumulator = TechniqueAccumulator::new();

        for criterion in self.criteria() {
            let Some(trees) = &criterion.techniques else {
                continue;
            };
            for kind in TechniqueType::ALL {
                accumulator.add_tree(&criterion.num, kind, trees.tree(kind));
            }
        }

        accumulator.finish()
    }

    /// Returns the techniques matching every field of `filter`.
    #[must_use]
    pub fn filter_techniques(&self, filter: &TechniqueFilter) -> Vec<Technique> {
        self.list_techniques()
            .into_iter()
            .filter(|t| {
                filter
                    .technology
                    .as_deref()
                    .map_or(true, |tech| t.technology.as_deref() == Some(tech))
            })
            .filter(|t| filter.kind.map_or(true, |kind| t.types.contains(&kind)))
            .collect()
    }

    /// Finds a technique by identifier, ignoring case.
    #[must_use]
    pub fn find_technique(&self, id: &str) -> Option<Technique> {
        self.list_techniques()
            .into_iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }

    /// Returns the raw technique trees of a criterion given by number or identifier.
    ///
    /// A criterion without technique data yields empty trees.
    #[must_use]
    pub fn techniques_for_criterion(
        &self,
        reference: &str,
    ) -> Option<(CriterionRef<'_>, &TechniqueTrees)> {
        self.resolve_criterion(reference).map(|found| {
            let trees = found.criterion.techniques.as_ref().unwrap_or(&NO_TECHNIQUES);
            (found, trees)
        })
    }

    /// Finds techniques whose title or identifier contains `query`, ignoring case.
    #[must_use]
    pub fn search_techniques(&self, query: &str) -> Vec<Technique> {
        let query = query.to_lowercase();
        self.list_techniques()
            .into_iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query) || t.id.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str, technology: &str, title: &str) -> TechniqueEntry {
        TechniqueEntry {
            id: Some(id.to_string()),
            technology: Some(technology.to_string()),
            title: Some(title.to_string()),
            ..TechniqueEntry::default()
        }
    }

    #[test]
    fn merges_references_by_id() {
        let mut acc = TechniqueAccumulator::new();
        acc.add_tree("1.1.1", TechniqueType::Sufficient, &[reference("H37", "html", "Using alt")]);
        acc.add_tree("2.4.4", TechniqueType::Advisory, &[reference("H37", "html", "Using alt")]);
        acc.add_tree("1.1.1", TechniqueType::Sufficient, &[reference("H37", "html", "Using alt")]);

        let techniques = acc.finish();
        assert_eq!(techniques.len(), 1);
        assert_eq!(techniques[0].criteria, vec!["1.1.1", "2.4.4"]);
        assert_eq!(
            techniques[0].types.iter().copied().collect::<Vec<_>>(),
            vec![TechniqueType::Sufficient, TechniqueType::Advisory]
        );
    }

    #[test]
    fn walks_sections_groups_using_and_combinations() {
        let tree = vec![TechniqueEntry {
            title: Some("Situation A".to_string()),
            techniques: vec![TechniqueEntry {
                using: vec![reference("H2", "html", "Combining links")],
                ..reference("G94", "general", "Short text alternative")
            }],
            groups: vec![crate::wcag::model::TechniqueGroup {
                id: Some("group-1".to_string()),
                title: "Short text alternative techniques".to_string(),
                techniques: vec![TechniqueEntry {
                    and: vec![
                        reference("ARIA6", "aria", "Using aria-label"),
                        reference("ARIA10", "aria", "Using aria-labelledby"),
                    ],
                    ..TechniqueEntry::default()
                }],
            }],
            ..TechniqueEntry::default()
        }];

        let mut acc = TechniqueAccumulator::new();
        acc.add_tree("1.1.1", TechniqueType::Sufficient, &tree);
        let ids: Vec<String> = acc.finish().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["ARIA6", "ARIA10", "G94", "H2"]);
        assert_eq!(count_technique_references(&tree), 4);
    }

    #[test]
    fn and_members_count_once_each() {
        let tree = vec![TechniqueEntry {
            and: vec![
                TechniqueEntry {
                    title: Some("Marking up the label".to_string()),
                    ..TechniqueEntry::default()
                },
                TechniqueEntry {
                    using: vec![
                        reference("H44", "html", "Using label elements"),
                        reference("H71", "html", "Providing a description for groups"),
                    ],
                    ..reference("G131", "general", "Providing descriptive labels")
                },
            ],
            ..reference("G162", "general", "Positioning labels")
        }];
        assert_eq!(count_technique_references(&tree), 3);
    }

    #[test]
    fn conflicting_titles_resolve_independently_of_order() {
        let mut forward = TechniqueAccumulator::new();
        forward.record("1.1.1", TechniqueType::Sufficient, "G1", Some("general"), "Beta");
        forward.record("2.4.1", TechniqueType::Sufficient, "G1", None, "Alpha");

        let mut backward = TechniqueAccumulator::new();
        backward.record("2.4.1", TechniqueType::Sufficient, "G1", None, "Alpha");
        backward.record("1.1.1", TechniqueType::Sufficient, "G1", Some("general"), "Beta");

        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn section_headings_are_not_techniques() {
        let tree = vec![TechniqueEntry {
            title: Some("Situation B".to_string()),
            ..TechniqueEntry::default()
        }];
        let mut acc = TechniqueAccumulator::new();
        acc.add_tree("1.1.1", TechniqueType::Sufficient, &tree);
        assert!(acc.is_empty());
        assert_eq!(count_technique_references(&tree), 0);
    }
}
