//! Employer candidate filter state, the query derived from it, and the
//! active-filter chips shown next to the filter panel.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::FilterField;

/// A single filter dimension: either no constraint, or a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue<T> {
    Unconstrained,
    Value(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        FilterValue::Unconstrained
    }
}

impl<T> FilterValue<T> {
    pub fn is_constrained(&self) -> bool {
        matches!(self, FilterValue::Value(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FilterValue::Value(value) => Some(value),
            FilterValue::Unconstrained => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            FilterValue::Value(value) => Some(value),
            FilterValue::Unconstrained => None,
        }
    }
}

impl<T> From<Option<T>> for FilterValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => FilterValue::Value(value),
            None => FilterValue::Unconstrained,
        }
    }
}

/// Returns true for the UI-level "no constraint" markers: empty text and `all`.
pub fn is_unconstrained_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

fn parse_text(raw: &str) -> FilterValue<String> {
    if is_unconstrained_marker(raw) {
        return FilterValue::Unconstrained;
    }
    FilterValue::Value(raw.trim().to_string())
}

fn parse_number<T>(field: FilterField, raw: &str) -> FilterValue<T>
where
    T: FromStr,
{
    if is_unconstrained_marker(raw) {
        return FilterValue::Unconstrained;
    }
    match raw.trim().parse::<T>() {
        Ok(value) => FilterValue::Value(value),
        Err(_) => {
            debug!(field = %field, raw, "skipping unparseable numeric filter");
            FilterValue::Unconstrained
        }
    }
}

fn parse_gpa(raw: &str) -> FilterValue<f64> {
    match parse_number::<f64>(FilterField::MinGpa, raw) {
        FilterValue::Value(gpa) if gpa.is_finite() && gpa >= 0.0 => FilterValue::Value(gpa),
        FilterValue::Value(gpa) => {
            debug!(gpa, "skipping out-of-range gpa filter");
            FilterValue::Unconstrained
        }
        FilterValue::Unconstrained => FilterValue::Unconstrained,
    }
}

/// Formats a GPA the way the filter menu lists it: `3.0`, `3.5`, `3.25`.
pub fn format_gpa(gpa: f64) -> String {
    if gpa.fract() == 0.0 {
        format!("{gpa:.1}")
    } else {
        gpa.to_string()
    }
}

/// Current, possibly partial, search constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub major: FilterValue<String>,
    pub industry: FilterValue<String>,
    pub min_gpa: FilterValue<f64>,
    pub min_experience_years: FilterValue<u32>,
    pub keyword: FilterValue<String>,
}

impl FilterState {
    /// Applies raw UI input to one field.
    ///
    /// Markers clear the field. Numeric fields are also cleared by text that
    /// does not parse and by negative values (`-1.5` for GPA, `-4` years), and
    /// a non-finite GPA is treated the same way.
    pub fn set_raw(&mut self, field: FilterField, raw: &str) {
        match field {
            FilterField::Major => self.major = parse_text(raw),
            FilterField::Industry => self.industry = parse_text(raw),
            FilterField::MinGpa => self.min_gpa = parse_gpa(raw),
            FilterField::MinExperienceYears => {
                self.min_experience_years = parse_number(field, raw)
            }
            FilterField::Keyword => self.keyword = parse_text(raw),
        }
    }

    pub fn with_raw(mut self, field: FilterField, raw: &str) -> Self {
        self.set_raw(field, raw);
        self
    }

    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Major => self.major = FilterValue::Unconstrained,
            FilterField::Industry => self.industry = FilterValue::Unconstrained,
            FilterField::MinGpa => self.min_gpa = FilterValue::Unconstrained,
            FilterField::MinExperienceYears => {
                self.min_experience_years = FilterValue::Unconstrained
            }
            FilterField::Keyword => self.keyword = FilterValue::Unconstrained,
        }
    }

    pub fn clear_all(&mut self) {
        *self = FilterState::default();
    }

    pub fn is_constrained(&self, field: FilterField) -> bool {
        match field {
            FilterField::Major => self.major.is_constrained(),
            FilterField::Industry => self.industry.is_constrained(),
            FilterField::MinGpa => self.min_gpa.is_constrained(),
            FilterField::MinExperienceYears => self.min_experience_years.is_constrained(),
            FilterField::Keyword => self.keyword.is_constrained(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| !self.is_constrained(*field))
    }

    pub fn to_query(&self) -> CandidateQuery {
        CandidateQuery {
            major: self.major.value().cloned(),
            industry: self.industry.value().cloned(),
            min_gpa: self.min_gpa.value().copied(),
            experience: self.min_experience_years.value().copied(),
            skills: self.keyword.value().cloned(),
        }
    }

    /// One chip per constrained field, in panel order.
    pub fn active_chips(&self) -> Vec<FilterChip> {
        FilterField::ALL
            .iter()
            .filter_map(|field| self.chip_label(*field).map(|label| FilterChip::new(*field, label)))
            .collect()
    }

    fn chip_label(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Major => self.major.value().cloned(),
            FilterField::Industry => self.industry.value().cloned(),
            FilterField::MinGpa => self
                .min_gpa
                .value()
                .map(|gpa| format!("GPA ≥ {}", format_gpa(*gpa))),
            FilterField::MinExperienceYears => self
                .min_experience_years
                .value()
                .map(|years| format!("{years}+ years exp")),
            FilterField::Keyword => self.keyword.value().map(|keyword| format!("\"{keyword}\"")),
        }
    }
}

/// Constraint-only parameters sent to `GET /employers/search-candidates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
}

impl CandidateQuery {
    pub fn is_empty(&self) -> bool {
        self.major.is_none()
            && self.industry.is_none()
            && self.min_gpa.is_none()
            && self.experience.is_none()
            && self.skills.is_none()
    }

    pub fn contains(&self, field: FilterField) -> bool {
        match field {
            FilterField::Major => self.major.is_some(),
            FilterField::Industry => self.industry.is_some(),
            FilterField::MinGpa => self.min_gpa.is_some(),
            FilterField::MinExperienceYears => self.experience.is_some(),
            FilterField::Keyword => self.skills.is_some(),
        }
    }
}

impl fmt::Display for CandidateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(major) = &self.major {
            parts.push(format!("major={major}"));
        }
        if let Some(industry) = &self.industry {
            parts.push(format!("industry={industry}"));
        }
        if let Some(min_gpa) = self.min_gpa {
            parts.push(format!("min_gpa={min_gpa}"));
        }
        if let Some(experience) = self.experience {
            parts.push(format!("experience={experience}"));
        }
        if let Some(skills) = &self.skills {
            parts.push(format!("skills={skills}"));
        }
        if parts.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{{}}}", parts.join(", "))
        }
    }
}

/// UI descriptor of one applied constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub field: FilterField,
    pub label: String,
}

impl FilterChip {
    pub fn new(field: FilterField, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
        }
    }
}
