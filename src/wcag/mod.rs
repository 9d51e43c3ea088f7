//! WCAG 2.2 dataset: document model and read-only query layer.
//!
//! The dataset is the published `wcag.json` artifact, extended with parsed
//! Understanding content:
//!
//! - `principles[]` → `guidelines[]` → `successcriteria[]`
//! - each criterion may carry `understanding` and `techniques`
//! - `terms[]` holds the glossary
//!
//! The document is loaded once at startup and never mutated afterwards.
//! Loading failures are fatal; there is no degraded mode.

pub mod error;
pub mod model;
pub mod query;
pub mod techniques;
pub mod text;

pub use error::{DataError, DataResult};
pub use model::{
    Detail, GlossaryTerm, Guideline, Level, Principle, SuccessCriterion, TechniqueEntry,
    TechniqueTrees, TechniqueType, Understanding, WcagDocument,
};
pub use query::{CriteriaFilter, CriterionRef, GroupBy, Statistics};
pub use techniques::{Technique, TechniqueAccumulator, TechniqueFilter};

use std::path::Path;

impl WcagDocument {
    /// Reads and parses the dataset artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid WCAG
    /// document, or contains no principles.
    pub fn load(path: &Path) -> DataResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| DataError::file_read(path, e))?;
        let document = Self::parse(&contents, &path.display().to_string())?;

        tracing::info!(
            path = %path.display(),
            principles = document.principles.len(),
            criteria = document.criteria().count(),
            terms = document.terms.len(),
            "WCAG dataset loaded"
        );

        Ok(document)
    }

    /// Parses a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a valid WCAG document or contains
    /// no principles.
    pub fn from_json(json: &str) -> DataResult<Self> {
        Self::parse(json, "<inline>")
    }

    fn parse(json: &str, origin: &str) -> DataResult<Self> {
        let document: Self =
            serde_json::from_str(json).map_err(|e| DataError::parse(origin, e))?;

        if document.principles.is_empty() {
            return Err(DataError::Empty {
                origin: origin.to_string(),
            });
        }

        Ok(document)
    }
}
