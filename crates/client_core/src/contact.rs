//! Employer-to-candidate contact messages.

use shared::protocol::{CandidateSummary, ContactCandidateRequest};

use crate::error::ContactError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerIdentity {
    pub email: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

impl EmployerIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: None,
            company_name: None,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(self.full_name.as_deref()).unwrap_or(self.email.as_str())
    }

    fn company(&self) -> Option<&str> {
        non_blank(self.company_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Editable subject, job title and message of a contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub subject: String,
    pub job_title: String,
    pub message: String,
}

impl ContactDraft {
    /// Prefilled letter addressed to `candidate`.
    pub fn for_candidate(employer: &EmployerIdentity, candidate: &CandidateSummary) -> Self {
        let subject = format!(
            "Job Opportunity at {}",
            employer.company().unwrap_or("Our Company")
        );
        let message = format!(
            "Dear {name},\n\n\
             We came across your profile on the alumni network and are impressed with your background in {major}.\n\n\
             We have an exciting opportunity at {company} that we believe would be a great fit for your skills and experience.\n\n\
             Would you be interested in learning more about this position?\n\n\
             Best regards,\n{sender}",
            name = candidate.full_name,
            major = non_blank(Some(candidate.major.as_str())).unwrap_or("your field"),
            company = employer.company().unwrap_or("our company"),
            sender = employer.display_name(),
        );

        Self {
            subject,
            job_title: String::new(),
            message,
        }
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if self.subject.trim().is_empty() || self.message.trim().is_empty() {
            return Err(ContactError::MissingFields);
        }
        Ok(())
    }

    pub fn to_request(
        &self,
        employer: &EmployerIdentity,
        candidate: &CandidateSummary,
    ) -> ContactCandidateRequest {
        ContactCandidateRequest {
            employer_email: employer.email.clone(),
            employer_name: employer.display_name().to_string(),
            company_name: employer.company().unwrap_or("Company").to_string(),
            candidate_id: candidate.alumni_id,
            candidate_email: candidate.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            job_title: self.job_title.clone(),
        }
    }
}
