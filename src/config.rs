//! Environment-provided configuration for the Airtable backend.
//!
//! This is resolved per invocation rather than once at process start: a
//! deployment with a missing credential should answer every request with a
//! clean 500, not crash the Lambda runtime loop during init.

use anyhow::{anyhow, Result};

/// Fallback base when the deployment doesn't override it.
pub const DEFAULT_BASE_ID: &str = "appz0D6kUon2e70B5";

pub const MEMBER_TABLE: &str = "Member Registry";
pub const ASSESSMENT_TABLE: &str = "Assessment Data";

pub struct Config {
    pub token: String,
    pub base_id: String,
}

impl Config {
    /// Read the Airtable credential and base identifier from the environment.
    ///
    /// The token is required and has no default; an unset *or empty* value is
    /// a server misconfiguration. The base ID is optional.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("AIRTABLE_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("AIRTABLE_TOKEN is not set"))?;

        let base_id = std::env::var("AIRTABLE_BASE_ID")
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_ID.to_owned());

        Ok(Config { token, base_id })
    }
}
