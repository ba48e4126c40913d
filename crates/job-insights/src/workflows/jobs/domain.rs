use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque listing identifier. The hosted backend hands out integers, older
/// exports use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Numeric(value) => write!(f, "{value}"),
            JobId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for JobId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One job listing as stored in the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    #[serde(default, alias = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "jobType")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(
        default,
        alias = "postedOn",
        deserialize_with = "deserialize_posted_on",
        skip_serializing_if = "Option::is_none"
    )]
    pub posted_on: Option<NaiveDate>,
}

impl JobRecord {
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            job_title: None,
            company_name: None,
            location: None,
            job_type: None,
            experience: None,
            salary: None,
            posted_on: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn with_posted_on(mut self, posted_on: NaiveDate) -> Self {
        self.posted_on = Some(posted_on);
        self
    }

    /// Raw value of `attribute`; empty strings count as absent.
    pub fn attribute(&self, attribute: JobAttribute) -> Option<&str> {
        let value = match attribute {
            JobAttribute::Role => self.job_title.as_deref(),
            JobAttribute::Company => self.company_name.as_deref(),
            JobAttribute::Location => self.location.as_deref(),
            JobAttribute::JobType => self.job_type.as_deref(),
            JobAttribute::Experience => self.experience.as_deref(),
        };
        value.filter(|value| !value.is_empty())
    }

    /// Grouping key for `attribute`, falling back to the attribute's unknown label.
    pub fn group_key(&self, attribute: JobAttribute) -> &str {
        self.attribute(attribute)
            .unwrap_or_else(|| attribute.unknown_label())
    }
}

/// Accepts `YYYY-MM-DD` dates and RFC 3339 timestamps; anything else is absent.
pub(crate) fn parse_posted_on(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn deserialize_posted_on<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_posted_on))
}

/// Attributes a listing can be constrained or grouped by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobAttribute {
    #[default]
    Role,
    Company,
    Location,
    JobType,
    Experience,
}

impl JobAttribute {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Role,
            Self::Company,
            Self::Location,
            Self::JobType,
            Self::Experience,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::Company => "Company",
            Self::Location => "Location",
            Self::JobType => "Job Type",
            Self::Experience => "Experience",
        }
    }

    pub const fn unknown_label(self) -> &'static str {
        match self {
            Self::Role => "Unknown Role",
            Self::Company => "Unknown Company",
            Self::Location => "Unknown Location",
            Self::JobType => "Unknown Job Type",
            Self::Experience => "Unknown Experience",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "role" | "job_title" | "title" => Some(Self::Role),
            "company" | "company_name" => Some(Self::Company),
            "location" | "city" => Some(Self::Location),
            "job_type" | "type" => Some(Self::JobType),
            "experience" | "level" => Some(Self::Experience),
            _ => None,
        }
    }
}

/// Selection value for one attribute drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AttributeConstraint {
    #[default]
    Any,
    Exact(String),
}

impl AttributeConstraint {
    pub const WILDCARD: &'static str = "All";

    /// `"All"` and `""` both mean "no constraint"; anything else is matched verbatim.
    pub fn from_selection(value: &str) -> Self {
        if value.is_empty() || value == Self::WILDCARD {
            Self::Any
        } else {
            Self::Exact(value.to_string())
        }
    }

    pub fn as_selection(&self) -> &str {
        match self {
            Self::Any => Self::WILDCARD,
            Self::Exact(value) => value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => value == Some(expected.as_str()),
        }
    }
}

impl Serialize for AttributeConstraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_selection())
    }
}

impl<'de> Deserialize<'de> for AttributeConstraint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_selection(&raw))
    }
}

/// Inclusive salary bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, salary: f64) -> bool {
        self.min <= salary && salary <= self.max
    }
}

impl Default for SalaryRange {
    /// Bounds of the job portal's salary sliders.
    fn default() -> Self {
        Self::new(0.0, 200_000.0)
    }
}

/// How a listing without a salary fares against an active salary range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSalaryPolicy {
    /// Compare the listing as if its salary were 0.
    #[default]
    TreatAsZero,
    /// Drop the listing whenever a salary range is active.
    Exclude,
    /// Keep the listing whenever a salary range is active.
    Include,
}

impl MissingSalaryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" | "treat_as_zero" => Some(Self::TreatAsZero),
            "exclude" => Some(Self::Exclude),
            "include" => Some(Self::Include),
            _ => None,
        }
    }

    pub(crate) fn admits(self, salary: Option<f64>, range: &SalaryRange) -> bool {
        match (salary, self) {
            (Some(salary), _) => range.contains(salary),
            (None, Self::TreatAsZero) => range.contains(0.0),
            (None, Self::Exclude) => false,
            (None, Self::Include) => true,
        }
    }
}

/// Active user-chosen constraints narrowing a listing collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub attributes: BTreeMap<JobAttribute, AttributeConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: JobAttribute, value: &str) -> Self {
        self.attributes
            .insert(attribute, AttributeConstraint::from_selection(value));
        self
    }

    pub fn with_salary(mut self, range: SalaryRange) -> Self {
        self.salary = Some(range);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn constraint(&self, attribute: JobAttribute) -> &AttributeConstraint {
        static ANY: AttributeConstraint = AttributeConstraint::Any;
        self.attributes.get(&attribute).unwrap_or(&ANY)
    }

    /// Query text in lowercase, or `None` when the search box is empty.
    pub(crate) fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }
}
