//! Document model for the WCAG dataset.
//!
//! These structures map directly to the published `wcag.json` artifact:
//! principles own guidelines, guidelines own success criteria, and each
//! criterion optionally carries Understanding content and technique trees.
//! Glossary terms are a flat list beside the tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Base URL of the WCAG 2.2 recommendation.
pub const SPEC_BASE_URL: &str = "https://www.w3.org/TR/WCAG22/";

/// Base URL of the Understanding WCAG 2.2 documents.
pub const UNDERSTANDING_BASE_URL: &str = "https://www.w3.org/WAI/WCAG22/Understanding/";

/// Base URL of the "How to Meet WCAG" quick reference.
pub const QUICKREF_BASE_URL: &str = "https://www.w3.org/WAI/WCAG22/quickref/";

/// Base URL of the technique documentation.
pub const TECHNIQUES_BASE_URL: &str = "https://www.w3.org/WAI/WCAG22/Techniques/";

/// Conformance level of a success criterion.
///
/// Levels are totally ordered: `A < AA < AAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Level A (minimum conformance).
    A,
    /// Level AA.
    AA,
    /// Level AAA (highest conformance).
    AAA,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Self; 3] = [Self::A, Self::AA, Self::AAA];

    /// Returns this level and every level below it, in ascending order.
    #[must_use]
    pub fn at_or_below(self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|l| *l <= self).collect()
    }

    /// Returns the level as it appears in the dataset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            other => Err(format!("unknown conformance level '{other}'")),
        }
    }
}

/// The three technique classifications used by Understanding documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechniqueType {
    /// Techniques sufficient to meet the criterion.
    Sufficient,
    /// Advisory techniques that go beyond the requirement.
    Advisory,
    /// Documented failures of the criterion.
    Failure,
}

impl TechniqueType {
    /// All technique types in display order.
    pub const ALL: [Self; 3] = [Self::Sufficient, Self::Advisory, Self::Failure];

    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sufficient => "sufficient",
            Self::Advisory => "advisory",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for TechniqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechniqueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sufficient" => Ok(Self::Sufficient),
            "advisory" => Ok(Self::Advisory),
            "failure" => Ok(Self::Failure),
            other => Err(format!("unknown technique type '{other}'")),
        }
    }
}

/// Root of the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct WcagDocument {
    /// The four principles, in document order.
    pub principles: Vec<Principle>,

    /// Glossary terms.
    #[serde(default)]
    pub terms: Vec<GlossaryTerm>,
}

/// A WCAG principle (Perceivable, Operable, Understandable, Robust).
#[derive(Debug, Clone, Deserialize)]
pub struct Principle {
    /// Stable anchor identifier, e.g. `perceivable`.
    pub id: String,
    /// Principle number, `"1"` to `"4"`.
    pub num: String,
    /// Short name.
    pub handle: String,
    /// Descriptive text (may contain markup).
    #[serde(default)]
    pub content: String,
    /// Guidelines under this principle.
    #[serde(default)]
    pub guidelines: Vec<Guideline>,
}

impl Principle {
    /// Returns the specification URL for this principle.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{SPEC_BASE_URL}#{}", self.id)
    }
}

/// A guideline within a principle.
#[derive(Debug, Clone, Deserialize)]
pub struct Guideline {
    /// Stable anchor identifier, e.g. `text-alternatives`.
    pub id: String,
    /// Dotted number, e.g. `"1.1"`.
    pub num: String,
    /// Short name.
    pub handle: String,
    /// Descriptive text (may contain markup).
    #[serde(default)]
    pub content: String,
    /// Success criteria under this guideline.
    #[serde(default, rename = "successcriteria")]
    pub success_criteria: Vec<SuccessCriterion>,
}

impl Guideline {
    /// Returns the specification URL for this guideline.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{SPEC_BASE_URL}#{}", self.id)
    }
}

/// A testable success criterion.
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessCriterion {
    /// Stable anchor identifier, e.g. `non-text-content`.
    pub id: String,
    /// Dotted number, e.g. `"1.1.1"`.
    pub num: String,
    /// Short name.
    pub handle: String,
    /// Normative requirement text.
    #[serde(default)]
    pub title: String,
    /// Full normative content (may contain markup).
    #[serde(default)]
    pub content: String,
    /// Conformance level.
    pub level: Level,
    /// WCAG versions this criterion belongs to, e.g. `["2.0", "2.1", "2.2"]`.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Notes, exceptions and sub-items.
    #[serde(default)]
    pub details: Vec<Detail>,
    /// Understanding document content, when parsed.
    #[serde(default)]
    pub understanding: Option<Understanding>,
    /// Sufficient, advisory and failure technique trees.
    #[serde(default)]
    pub techniques: Option<TechniqueTrees>,
}

impl SuccessCriterion {
    /// Returns the specification URL for this criterion.
    #[must_use]
    pub fn spec_url(&self) -> String {
        format!("{SPEC_BASE_URL}#{}", self.id)
    }

    /// Returns the Understanding document URL.
    #[must_use]
    pub fn understanding_url(&self) -> String {
        format!("{UNDERSTANDING_BASE_URL}{}.html", self.id)
    }

    /// Returns the quick reference URL.
    #[must_use]
    pub fn quickref_url(&self) -> String {
        format!("{QUICKREF_BASE_URL}#{}", self.id)
    }
}

/// One structured detail attached to a criterion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Detail {
    /// A bulleted list of (optionally labelled) items.
    Ulist {
        /// List items.
        #[serde(default)]
        items: Vec<DetailItem>,
    },
    /// A labelled note.
    Note {
        /// Note label, e.g. `Note 1`.
        #[serde(default)]
        handle: String,
        /// Note text.
        #[serde(default)]
        text: String,
    },
    /// A free paragraph.
    P {
        /// Paragraph text.
        #[serde(default)]
        text: String,
    },
    /// Any detail kind this server does not render.
    #[serde(other)]
    Other,
}

/// An item of a [`Detail::Ulist`].
#[derive(Debug, Clone, Deserialize)]
pub struct DetailItem {
    /// Optional label, e.g. `Controls, Input`.
    #[serde(default)]
    pub handle: Option<String>,
    /// Item text.
    #[serde(default)]
    pub text: String,
}

/// Content parsed from the Understanding document of a criterion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Understanding {
    /// "In brief" summary keyed by label (`goal`, `what to do`, `why it's important`).
    #[serde(default)]
    pub brief: Option<BTreeMap<String, String>>,
    /// Long-form intent.
    #[serde(default)]
    pub intent: Option<String>,
    /// Benefit statements.
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Example texts.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Related resources.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A titled link from an Understanding document.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    /// Link text.
    pub title: String,
    /// Link target.
    pub url: String,
}

/// The three technique trees of a criterion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechniqueTrees {
    /// Sufficient techniques.
    #[serde(default)]
    pub sufficient: Vec<TechniqueEntry>,
    /// Advisory techniques.
    #[serde(default)]
    pub advisory: Vec<TechniqueEntry>,
    /// Failures.
    #[serde(default)]
    pub failure: Vec<TechniqueEntry>,
}

impl TechniqueTrees {
    /// Returns the tree for the given technique type.
    #[must_use]
    pub fn tree(&self, kind: TechniqueType) -> &[TechniqueEntry] {
        match kind {
            TechniqueType::Sufficient => &self.sufficient,
            TechniqueType::Advisory => &self.advisory,
            TechniqueType::Failure => &self.failure,
        }
    }
}

/// A node in a technique tree.
///
/// The same shape covers technique references (`id` + `title`), section
/// headings (`title` without `id`, with nested `techniques` and `groups`),
/// and combinations (`and`). A reference may list further techniques it is
/// `using`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechniqueEntry {
    /// Technique identifier, e.g. `H37`.
    #[serde(default)]
    pub id: Option<String>,
    /// Technology folder, e.g. `html`, `aria`, `failures`.
    #[serde(default)]
    pub technology: Option<String>,
    /// Technique title or section heading (may contain markup).
    #[serde(default)]
    pub title: Option<String>,
    /// Techniques nested under a section heading.
    #[serde(default)]
    pub techniques: Vec<TechniqueEntry>,
    /// Titled groups of techniques under a section heading.
    #[serde(default)]
    pub groups: Vec<TechniqueGroup>,
    /// Techniques used together with this one.
    #[serde(default)]
    pub using: Vec<TechniqueEntry>,
    /// Techniques that must all be applied together.
    #[serde(default)]
    pub and: Vec<TechniqueEntry>,
}

impl TechniqueEntry {
    /// Returns `true` if this entry references a concrete technique.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.id.is_some() && self.title.is_some()
    }
}

/// A titled group of techniques inside a section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechniqueGroup {
    /// Group identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Group title.
    #[serde(default)]
    pub title: String,
    /// Techniques in the group.
    #[serde(default)]
    pub techniques: Vec<TechniqueEntry>,
}

/// A glossary definition.
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryTerm {
    /// Anchor identifier, e.g. `dfn-text-alternative`.
    pub id: String,
    /// Term name.
    pub name: String,
    /// Definition (may contain markup).
    #[serde(default)]
    pub definition: String,
}

impl GlossaryTerm {
    /// Returns the glossary URL for this term.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{SPEC_BASE_URL}#{}", self.id)
    }
}
