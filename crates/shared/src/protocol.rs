use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::AlumniId;

/// One row of the employer candidate search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub alumni_id: AlumniId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub major: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grad_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_since_grad: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// Imported alumni records may carry `null` for blank spreadsheet cells.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub majors: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl FilterOptions {
    pub fn is_empty(&self) -> bool {
        self.majors.is_empty() && self.industries.is_empty() && self.skills.is_empty()
    }
}

/// Body of `POST /employers/contact-candidate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCandidateRequest {
    pub employer_email: String,
    pub employer_name: String,
    pub company_name: String,
    pub candidate_id: AlumniId,
    pub candidate_email: String,
    pub subject: String,
    pub message: String,
    pub job_title: String,
}
