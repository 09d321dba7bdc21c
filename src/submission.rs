//! The inbound assessment form and its mapping to Airtable field names.
//!
//! The form posts a flat JSON object: survey metadata, optional contact
//! identity fields, the ten PSS item scores plus the PSS total, and the four
//! PSYCHLOPS sub-scales plus the PSYCHLOPS total. We do no validation of
//! score types or ranges here. Whatever the form sent is what lands in the
//! table, and the table's own schema decides what it will accept. Fields the
//! form omitted are omitted from the outgoing record too, not defaulted.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Literal value for the `Assessment Type` column; this handler only serves
/// the combined PSS + PSYCHLOPS form.
pub const ASSESSMENT_TYPE: &str = "PSS + PSYCHLOPS";

/// One posted assessment form.
///
/// Every field is an opaque JSON value, the contact fields included: the
/// form usually sends strings, but nothing here checks types or ranges.
/// `firstName`/`lastName` may also be present in the body; they are accepted
/// and ignored, since identity lives in the Member Registry and the created
/// record carries a link rather than a copy of the name.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub assessment_date: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,

    pub psychlops_problem: Option<Value>,
    pub psychlops_impact: Option<Value>,
    pub psychlops_functioning: Option<Value>,
    pub psychlops_wellbeing: Option<Value>,
    pub psychlops_total: Option<Value>,

    #[serde(rename = "PSS Q1")]
    pub pss_q1: Option<Value>,
    #[serde(rename = "PSS Q2")]
    pub pss_q2: Option<Value>,
    #[serde(rename = "PSS Q3")]
    pub pss_q3: Option<Value>,
    #[serde(rename = "PSS Q4")]
    pub pss_q4: Option<Value>,
    #[serde(rename = "PSS Q5")]
    pub pss_q5: Option<Value>,
    #[serde(rename = "PSS Q6")]
    pub pss_q6: Option<Value>,
    #[serde(rename = "PSS Q7")]
    pub pss_q7: Option<Value>,
    #[serde(rename = "PSS Q8")]
    pub pss_q8: Option<Value>,
    #[serde(rename = "PSS Q9")]
    pub pss_q9: Option<Value>,
    #[serde(rename = "PSS Q10")]
    pub pss_q10: Option<Value>,
    pub pss_total_score: Option<Value>,
}

impl Submission {
    /// The submitter's email, rendered as lookup text; see [`contact_value`].
    pub fn email(&self) -> Option<String> {
        contact_value(&self.email)
    }

    /// The submitter's phone, rendered as lookup text; see [`contact_value`].
    pub fn phone(&self) -> Option<String> {
        contact_value(&self.phone)
    }

    /// Map the form onto Airtable destination field names.
    ///
    /// Values pass through unmodified; absent fields are left out entirely.
    /// The member link, if any, is attached by the caller afterwards.
    pub fn to_airtable_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();

        fields.insert(
            "Assessment Type".to_owned(),
            Value::String(ASSESSMENT_TYPE.to_owned()),
        );

        put(&mut fields, "Assessment Date", &self.assessment_date);

        put(
            &mut fields,
            "PSYCHLOPS: Problem Description",
            &self.psychlops_problem,
        );
        put(
            &mut fields,
            "PSYCHLOPS: Problem Impact",
            &self.psychlops_impact,
        );
        put(
            &mut fields,
            "PSYCHLOPS: Functioning",
            &self.psychlops_functioning,
        );
        put(&mut fields, "PSYCHLOPS: Wellbeing", &self.psychlops_wellbeing);
        put(&mut fields, "PSYCHLOPS: Total Score", &self.psychlops_total);

        put(&mut fields, "PSS Q1", &self.pss_q1);
        put(&mut fields, "PSS Q2", &self.pss_q2);
        put(&mut fields, "PSS Q3", &self.pss_q3);
        put(&mut fields, "PSS Q4", &self.pss_q4);
        put(&mut fields, "PSS Q5", &self.pss_q5);
        put(&mut fields, "PSS Q6", &self.pss_q6);
        put(&mut fields, "PSS Q7", &self.pss_q7);
        put(&mut fields, "PSS Q8", &self.pss_q8);
        put(&mut fields, "PSS Q9", &self.pss_q9);
        put(&mut fields, "PSS Q10", &self.pss_q10);
        put(&mut fields, "PSS Total Score", &self.pss_total_score);

        fields
    }
}

/// Render a contact field as the text the member lookup should match on.
///
/// The form normally sends strings, but a number (a phone typed without
/// quotes upstream) becomes its decimal text, exactly as string
/// interpolation would render it. Empty strings, zero, `false`, and `null`
/// count as absent, and so do arrays and objects; the registry's contact
/// columns hold scalars.
fn contact_value(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

fn put(fields: &mut Map<String, Value>, name: &str, value: &Option<Value>) {
    if let Some(v) = value {
        fields.insert(name.to_owned(), v.clone());
    }
}
