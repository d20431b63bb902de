//! Shared types for the contact form service and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// Source tag given to submissions that don't name one.
pub const DEFAULT_SOURCE: &str = "form";

/// Contact method tags the frontend sends. The service stores any tag as-is;
/// only `email` has side effects.
pub mod contact_method {
    pub const EMAIL: &str = "email";
    pub const WHATSAPP: &str = "whatsapp";
}

/// A visitor submission plus its accumulated query history.
///
/// Field names match the flat JSON file on disk. Everything except the
/// contact details is defaulted so records written by older revisions
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
    /// Distinct contact methods in order of first use.
    #[serde(default)]
    pub query_method: Vec<String>,
    #[serde(default)]
    pub query_id: String,
    #[serde(default)]
    pub id: String,
}

impl VisitorRecord {
    /// Appends `method` unless it's already present. Returns whether it was added.
    pub fn record_method(&mut self, method: &str) -> bool {
        if self.query_method.iter().any(|m| m == method) {
            return false;
        }
        self.query_method.push(method.to_string());
        true
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /submit-form`.
///
/// Fields default to empty so a missing field reaches validation and gets
/// a proper error instead of a bare deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitFormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Body of `POST /update-query/{visitor_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryUpdateRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub method: String,
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitFormResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_records: usize,
    pub version: String,
}
