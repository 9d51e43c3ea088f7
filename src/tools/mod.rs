//! Tool registry: the catalog of WCAG tools exposed over MCP.
//!
//! Each tool pairs a JSON Schema (advertised by `tools/list`) with a typed
//! parameter struct. The registry deserializes the caller's `arguments` into
//! that struct before the handler runs, so handlers never see malformed input.
//!
//! Handlers are pure reads over the shared [`WcagDocument`] and always return
//! one Markdown text payload. A lookup miss is explanatory text, not an error.

mod criteria;
mod format;
mod glossary;
mod info;
mod principles;
mod techniques;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::wcag::WcagDocument;

/// Errors raised while dispatching a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name is registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments did not match the tool's parameter schema.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Deserialization failure.
        message: String,
    },
}

/// Tool definition as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input.
    pub input_schema: Value,
}

/// Parameters of tools that take none.
#[derive(Debug, Deserialize)]
pub struct NoParams {}

type Handler = Box<dyn Fn(&WcagDocument, Value) -> Result<String, ToolError> + Send + Sync>;

/// A registered tool.
pub struct Tool {
    name: &'static str,
    description: &'static str,
    input_schema: Value,
    handler: Handler,
}

impl Tool {
    /// Declares a tool whose handler takes typed parameters `P`.
    ///
    /// `null` arguments are treated as an empty object; unknown extra
    /// arguments are ignored.
    pub fn new<P, F>(
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        handler: F,
    ) -> Self
    where
        P: DeserializeOwned,
        F: Fn(&WcagDocument, P) -> String + Send + Sync + 'static,
    {
        let erased = move |document: &WcagDocument,
                           arguments: Value|
              -> Result<String, ToolError> {
            let arguments = if arguments.is_null() {
                Value::Object(serde_json::Map::new())
            } else {
                arguments
            };
            let params: P =
                serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
                    tool: name.to_string(),
                    message: e.to_string(),
                })?;
            Ok(handler(document, params))
        };

        Self {
            name,
            description,
            input_schema,
            handler: Box::new(erased),
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the JSON Schema of the tool's input.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns the `tools/list` entry for this tool.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The ordered tool catalog bound to one dataset.
#[derive(Debug)]
pub struct ToolRegistry {
    document: Arc<WcagDocument>,
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Creates the registry with the full catalog.
    #[must_use]
    pub fn new(document: Arc<WcagDocument>) -> Self {
        Self {
            document,
            tools: catalog(),
        }
    }

    /// Returns the dataset the tools read from.
    #[must_use]
    pub fn document(&self) -> &WcagDocument {
        &self.document
    }

    /// Iterates over the tools in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Returns every tool definition in catalog order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(Tool::definition).collect()
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Returns `true` if a tool with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validates `arguments` against the named tool and runs it.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unregistered name and
    /// [`ToolError::InvalidArguments`] when the arguments do not deserialize.
    pub fn call(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, "Calling tool");
        (tool.handler)(&self.document, arguments)
    }
}

fn catalog() -> Vec<Tool> {
    vec![
        // Core
        principles::list_principles(),
        principles::list_guidelines(),
        criteria::list_success_criteria(),
        criteria::get_success_criteria_detail(),
        criteria::get_criterion(),
        principles::get_guideline(),
        criteria::search_wcag(),
        criteria::get_criteria_by_level(),
        criteria::count_criteria(),
        // Techniques
        techniques::list_techniques(),
        techniques::get_technique(),
        techniques::get_techniques_for_criterion(),
        techniques::search_techniques(),
        techniques::get_failures_for_criterion(),
        // Glossary
        glossary::get_glossary_term(),
        glossary::list_glossary_terms(),
        glossary::search_glossary(),
        // Context
        criteria::whats_new_in_wcag22(),
        criteria::get_full_criterion_context(),
        info::get_server_info(),
    ]
}

/// Builds an object schema from `properties` and the `required` names.
fn object_schema(properties: Value, required: &[&str]) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Schema of a single required criterion reference.
fn ref_id_schema() -> Value {
    object_schema(
        serde_json::json!({
            "ref_id": {
                "type": "string",
                "description": "Success criterion reference number (e.g., \"1.1.1\", \"2.4.7\")"
            }
        }),
        &["ref_id"],
    )
}

/// Parameters of tools addressed by a criterion reference.
#[derive(Debug, Deserialize)]
pub struct RefIdParams {
    /// Criterion number (`1.4.3`) or identifier (`contrast-minimum`).
    pub ref_id: String,
}

/// Parameters of keyword-search tools.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Search text.
    pub query: String,
}
