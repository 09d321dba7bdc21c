//! A thin client for the two Airtable calls this service makes.
//!
//! Airtable's REST API is plain HTTPS + JSON with a bearer token: a GET with
//! a `filterByFormula` query to read, a POST of `{"fields": {...}}` to
//! create. We deliberately keep this layer dumb. No retries, no explicit
//! timeout beyond reqwest's defaults, one attempt per call. The interesting
//! error-handling policy (which failures are fatal, which are swallowed)
//! lives with the workflow in `submit`, not here.

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::{Config, ASSESSMENT_TABLE, MEMBER_TABLE};

const API_ROOT: &str = "https://api.airtable.com/v0/";

/// Why a record creation failed, since the two cases surface differently:
/// an API rejection propagates Airtable's own status and message to the
/// caller, while a transport-level failure becomes a generic 500.
pub enum CreateRecordError {
    Api { status: u16, message: String },
    Transport(anyhow::Error),
}

pub struct Client {
    http: reqwest::Client,
    token: String,
    base_id: String,
}

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct Record {
    id: String,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: String,
}

impl Client {
    pub fn new(http: reqwest::Client, config: Config) -> Self {
        Client {
            http,
            token: config.token,
            base_id: config.base_id,
        }
    }

    /// Look up at most one Member Registry record matching `formula`.
    ///
    /// Returns the matched record's opaque identifier, or `None` when the
    /// registry has no such member. Extra matches beyond the first are
    /// ignored; `maxRecords=1` means Airtable doesn't even send them.
    pub async fn find_member(&self, formula: &str) -> Result<Option<String>> {
        let url = self.table_url(MEMBER_TABLE)?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("filterByFormula", formula), ("maxRecords", "1")])
            .send()
            .await
            .context("member lookup request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("member lookup returned HTTP {status}"));
        }

        let list: RecordList = resp
            .json()
            .await
            .context("member lookup returned an unparseable body")?;

        Ok(list.records.into_iter().next().map(|r| r.id))
    }

    /// Create one Assessment Data record. Exactly one attempt, no retry.
    pub async fn create_assessment(
        &self,
        fields: &Map<String, Value>,
    ) -> std::result::Result<String, CreateRecordError> {
        let url = self
            .table_url(ASSESSMENT_TABLE)
            .map_err(CreateRecordError::Transport)?;

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| CreateRecordError::Transport(e.into()))?;

        let status = resp.status();
        let body: Value = resp.json().await.map_err(|e| {
            CreateRecordError::Transport(
                anyhow::Error::from(e).context("record creation returned an unparseable body"),
            )
        })?;

        if !status.is_success() {
            return Err(CreateRecordError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let created: CreatedRecord = serde_json::from_value(body).map_err(|e| {
            CreateRecordError::Transport(
                anyhow::Error::from(e).context("record creation response had no id"),
            )
        })?;

        Ok(created.id)
    }

    /// Build `<root>/<base>/<table>`; `push` percent-encodes the table name,
    /// which matters since both table names contain spaces.
    fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = Url::parse(API_ROOT)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("bad API root"))?
            .push(&self.base_id)
            .push(table);
        Ok(url)
    }
}

/// Exact-match filter formula for the member lookup.
///
/// Email wins over phone when both are present. The comparison is whatever
/// Airtable does for `=` on the raw value: case-sensitive, no normalization
/// of email casing or phone formatting. That mirrors how the registry has
/// always been queried; see DESIGN.md before "fixing" it.
pub fn member_filter(email: Option<&str>, phone: Option<&str>) -> Option<String> {
    if let Some(email) = email {
        Some(format!("{{Email}} = \"{}\"", escape(email)))
    } else {
        phone.map(|phone| format!("{{Phone}} = \"{}\"", escape(phone)))
    }
}

/// Keep an embedded double quote from terminating the formula string early.
fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Pull Airtable's human-readable message out of an error body, which is
/// usually `{"error": {"type": ..., "message": ...}}` but occasionally just
/// `{"error": "NOT_FOUND"}`.
pub fn error_message(body: &Value) -> String {
    body["error"]["message"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .unwrap_or("Airtable error")
        .to_owned()
}
