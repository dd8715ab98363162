//! SQL schema generation with customizable table prefixes.
//!
//! Sessions live in a single `{prefix}sessions` table. The generated bundle
//! is stored as an opaque JSON document; only the columns needed for lookup
//! and expiry are broken out.
//!
//! Prefixes must contain only alphanumeric characters and underscores.

use crate::error::{Result, SessionError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SessionError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(SessionError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Generates the session table and its indexes for the given prefix.
///
/// # Errors
///
/// Returns [`SessionError::InvalidPrefix`] if the prefix is empty or contains
/// characters other than alphanumerics and underscores.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    Ok(format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}sessions (
    id TEXT PRIMARY KEY,
    challenge TEXT NOT NULL,
    user_name TEXT,
    user_email TEXT,
    bundle TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_{prefix}sessions_created ON {prefix}sessions(created_at);
"#
    ))
}

/// Generates SQL to drop the session table.
///
/// # Errors
///
/// Returns [`SessionError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;
    Ok(format!("DROP TABLE IF EXISTS {prefix}sessions;\n"))
}
