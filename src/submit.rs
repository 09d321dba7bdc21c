//! The assessment submission workflow.
//!
//! Three strictly sequential steps per invocation: resolve the submitter to
//! a Member Registry record (best-effort), map the form onto destination
//! field names, create one Assessment Data record. The lookup is an
//! enrichment: any failure there degrades to "no link" and the submission
//! still goes through. Only the final create call's errors ever reach the
//! caller.
//!
//! The Airtable client sits behind the small [`RecordStore`] trait so the
//! workflow's call pattern (which steps run, and how often) can be checked
//! without a network.

use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::airtable::{self, CreateRecordError};
use crate::submission::Submission;

/// Outcome of one member resolution.
///
/// `NoMatch` and `LookupFailed` behave identically downstream (record is
/// created without a link) but are kept distinct so the logs can tell "this
/// person isn't registered" apart from "the registry was unreachable."
enum MemberMatch {
    Linked(String),
    NoMatch,
    LookupFailed,
}

impl MemberMatch {
    fn id(&self) -> Option<&str> {
        match self {
            MemberMatch::Linked(id) => Some(id),
            _ => None,
        }
    }
}

/// What the workflow reads from and writes to the external store.
pub trait RecordStore {
    async fn find_member(&self, formula: &str) -> anyhow::Result<Option<String>>;

    async fn create_assessment(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<String, CreateRecordError>;
}

impl RecordStore for airtable::Client {
    async fn find_member(&self, formula: &str) -> anyhow::Result<Option<String>> {
        airtable::Client::find_member(self, formula).await
    }

    async fn create_assessment(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<String, CreateRecordError> {
        airtable::Client::create_assessment(self, fields).await
    }
}

/// An HTTP status plus a JSON body, ready for whichever entry point
/// (proxy-event or bare) is serving the request.
pub struct SubmitOutcome {
    pub status: u16,
    pub body: Value,
}

impl SubmitOutcome {
    fn error(status: u16, message: &str) -> Self {
        SubmitOutcome {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Run one submission end to end against `store`.
///
/// `body` is the raw POST body; anything that doesn't parse as a submission
/// object is a 400 and nothing else runs.
pub async fn handle_submission<S: RecordStore>(store: &S, body: &[u8]) -> SubmitOutcome {
    let submission: Submission = match serde_json::from_slice(body) {
        Ok(s) => s,
        Err(err) => {
            info!("rejecting unparseable submission body: {err}");
            return SubmitOutcome::error(400, "Invalid JSON");
        }
    };

    let member = resolve_member(store, &submission).await;

    let mut fields = submission.to_airtable_fields();
    if let Some(id) = member.id() {
        // Airtable's linked-record convention: a list of record IDs.
        fields.insert("Member ID".to_owned(), json!([id]));
    }

    match store.create_assessment(&fields).await {
        Ok(id) => {
            info!("created assessment record {id}");
            SubmitOutcome {
                status: 200,
                body: json!({
                    "success": true,
                    "id": id,
                    "memberLinked": member.id().is_some(),
                }),
            }
        }

        Err(CreateRecordError::Api { status, message }) => {
            error!("record creation rejected with HTTP {status}: {message}");
            SubmitOutcome::error(status, &message)
        }

        Err(CreateRecordError::Transport(err)) => {
            error!("record creation failed: {err:#}");
            SubmitOutcome::error(500, "Internal server error")
        }
    }
}

/// Step A: best-effort member resolution.
///
/// Skipped outright when the form carries neither email nor phone. A failed
/// lookup is logged and swallowed; linkage is never worth failing the
/// submission over.
async fn resolve_member<S: RecordStore>(store: &S, submission: &Submission) -> MemberMatch {
    let formula = match airtable::member_filter(
        submission.email().as_deref(),
        submission.phone().as_deref(),
    ) {
        Some(f) => f,
        None => {
            info!("no identity fields on submission; skipping member lookup");
            return MemberMatch::NoMatch;
        }
    };

    match store.find_member(&formula).await {
        Ok(Some(id)) => {
            info!("matched member record {id}");
            MemberMatch::Linked(id)
        }
        Ok(None) => {
            info!("no member record matched");
            MemberMatch::NoMatch
        }
        Err(err) => {
            warn!("member lookup failed, proceeding unlinked: {err:#}");
            MemberMatch::LookupFailed
        }
    }
}
