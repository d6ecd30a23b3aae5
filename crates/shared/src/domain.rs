use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownFilterField;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(AlumniId);

/// One search dimension of the employer candidate filter panel.
///
/// The declaration order is the display order of active-filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Major,
    Industry,
    MinGpa,
    MinExperienceYears,
    Keyword,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Major,
        FilterField::Industry,
        FilterField::MinGpa,
        FilterField::MinExperienceYears,
        FilterField::Keyword,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Major => "major",
            FilterField::Industry => "industry",
            FilterField::MinGpa => "minGpa",
            FilterField::MinExperienceYears => "minExperienceYears",
            FilterField::Keyword => "keyword",
        }
    }

    /// Query-string key the search endpoint expects for this field.
    pub fn wire_name(self) -> &'static str {
        match self {
            FilterField::Major => "major",
            FilterField::Industry => "industry",
            FilterField::MinGpa => "min_gpa",
            FilterField::MinExperienceYears => "experience",
            FilterField::Keyword => "skills",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = UnknownFilterField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "major" => Ok(FilterField::Major),
            "industry" => Ok(FilterField::Industry),
            "mingpa" | "gpa" => Ok(FilterField::MinGpa),
            "minexperienceyears" | "experience" => Ok(FilterField::MinExperienceYears),
            "keyword" | "skills" => Ok(FilterField::Keyword),
            _ => Err(UnknownFilterField(s.to_string())),
        }
    }
}

/// Which secondary option list a deployment serves next to majors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsVariant {
    #[default]
    Industries,
    Skills,
}

impl FromStr for OptionsVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "industries" | "industry" => Ok(OptionsVariant::Industries),
            "skills" | "skill" => Ok(OptionsVariant::Skills),
            other => Err(format!("unknown options variant '{other}'")),
        }
    }
}

/// Read-only option catalogs exposed under `/filters/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCatalog {
    Majors,
    Industries,
    Skills,
}

impl FilterCatalog {
    pub fn path(self) -> &'static str {
        match self {
            FilterCatalog::Majors => "filters/majors",
            FilterCatalog::Industries => "filters/industries",
            FilterCatalog::Skills => "filters/skills",
        }
    }
}

impl From<OptionsVariant> for FilterCatalog {
    fn from(value: OptionsVariant) -> Self {
        match value {
            OptionsVariant::Industries => FilterCatalog::Industries,
            OptionsVariant::Skills => FilterCatalog::Skills,
        }
    }
}
