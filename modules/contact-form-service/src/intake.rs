//! Turns a form submission into a fresh visitor record.

use crate::error::LedgerError;
use chrono::{SecondsFormat, Utc};
use contact_form_types::{DEFAULT_SOURCE, SubmitFormRequest, VisitorRecord};
use sha2::{Digest, Sha256};

/// Hex characters kept from the identifier hash.
pub const QUERY_ID_LEN: usize = 10;

/// Length of identifiers synthesized for legacy records.
const FALLBACK_ID_LEN: usize = 8;

/// Derives the record identifier from the email and creation timestamp.
///
/// Identical inputs always give the same identifier. Uniqueness is only as
/// good as 40 bits of SHA-256 and the timestamp resolution; collisions are
/// not checked.
pub fn generate_query_id(email: &str, timestamp: &str) -> String {
    let digest = Sha256::digest(format!("{}{}", email, timestamp).as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(QUERY_ID_LEN);
    id
}

/// Random short identifier for records that predate hashed ids.
pub fn fallback_query_id() -> String {
    let mut id = uuid::Uuid::new_v4().to_string();
    id.truncate(FALLBACK_ID_LEN);
    id
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Validates `req` and builds the record it describes, stamped at `timestamp`.
///
/// The submitted message is dropped: records start with no message and get
/// one from their first query update.
pub fn build_record(req: &SubmitFormRequest, timestamp: &str) -> Result<VisitorRecord, LedgerError> {
    let name = required("name", &req.name)?;
    let email = required("email", &req.email)?;
    let phone = required("phone", &req.phone)?;
    validate_email(&email)?;

    let source = req
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SOURCE)
        .to_string();

    let id = generate_query_id(&email, timestamp);

    Ok(VisitorRecord {
        name,
        email,
        phone,
        message: String::new(),
        source,
        timestamp: timestamp.to_string(),
        query_method: Vec::new(),
        query_id: id.clone(),
        id,
    })
}

fn required(field: &str, value: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn validate_email(email: &str) -> Result<(), LedgerError> {
    let invalid = || LedgerError::Validation(format!("{} is not a valid email address", email));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}
