//! OpenAPI 3.1 document for the REST bridge.
//!
//! Built from the registry on every request, so the paths always match
//! `tools/list`.

use serde_json::{json, Map, Value};

use crate::tools::{Tool, ToolRegistry};

/// Prefix under which each tool is exposed.
pub const TOOL_PATH_PREFIX: &str = "/bridge/tools/";

/// Builds the OpenAPI document advertising `server_url`.
#[must_use]
pub fn document(registry: &ToolRegistry, server_url: &str) -> Value {
    let paths: Map<String, Value> = registry
        .iter()
        .map(|tool| (format!("{TOOL_PATH_PREFIX}{}", tool.name()), path_item(tool)))
        .collect();

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "WCAG MCP API",
            "description": "REST access to WCAG 2.2 principles, success criteria, techniques and glossary terms. Each endpoint runs one tool and returns its text.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [{ "url": server_url }],
        "paths": paths,
        "components": {
            "schemas": {},
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "API Key",
                    "description": "Send the key as `Authorization: Bearer <key>` or in the `x-api-key` header.",
                },
            },
        },
        "security": [{ "bearerAuth": [] }],
    })
}

/// Maps a tool name to an identifier-safe operation ID.
#[must_use]
pub fn operation_id(name: &str) -> String {
    name.replace('-', "_")
}

fn path_item(tool: &Tool) -> Value {
    json!({
        "post": {
            "operationId": operation_id(tool.name()),
            "summary": tool.description(),
            "description": tool.description(),
            "security": [{ "bearerAuth": [] }],
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": { "schema": tool.input_schema() },
                },
            },
            "responses": {
                "200": {
                    "description": "Tool output",
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "properties": { "content": { "type": "string" } },
                                "required": ["content"],
                            },
                        },
                    },
                },
                "400": error_response("Invalid request or tool error"),
                "401": error_response("Missing or invalid API key"),
                "502": error_response("MCP backend unavailable"),
            },
        },
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } },
                    "required": ["error"],
                },
            },
        },
    })
}
