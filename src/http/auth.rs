//! Bridge authorization.
//!
//! A caller presents a key either as `Authorization: Bearer <key>` or, when no
//! bearer token is given, as `x-api-key: <key>`.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Header carrying the key when no bearer token is sent.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authorization policy for the REST bridge.
#[derive(Clone, Default)]
pub enum BridgeAuth {
    /// No secret configured: every caller is authorized.
    #[default]
    Open,
    /// Callers must present exactly this key.
    Secret(Arc<str>),
}

impl BridgeAuth {
    /// Builds the policy from an optional secret. An empty secret means open.
    #[must_use]
    pub fn from_secret(secret: Option<String>) -> Self {
        match secret {
            Some(s) if !s.is_empty() => Self::Secret(s.into()),
            _ => Self::Open,
        }
    }

    /// Returns `true` if no secret is configured.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Checks the request headers against the policy.
    #[must_use]
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        match self {
            Self::Open => true,
            Self::Secret(secret) => presented_key(headers)
                .is_some_and(|key| key.as_bytes().ct_eq(secret.as_bytes()).into()),
        }
    }
}

impl std::fmt::Debug for BridgeAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Secret(_) => f.write_str("Secret(<redacted>)"),
        }
    }
}

/// Extracts the presented key: a non-empty bearer token, else `x-api-key`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|k| !k.is_empty())
    })
}
