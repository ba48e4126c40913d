use super::super::aggregate::GroupShareEntry;
use super::super::domain::JobAttribute;
use chrono::NaiveDate;
use serde::Serialize;

/// Headline numbers shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub total_companies: usize,
    pub companies: Vec<String>,
    pub new_jobs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_since: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeBreakdown {
    pub attribute: JobAttribute,
    pub attribute_label: &'static str,
    pub total: usize,
    pub entries: Vec<GroupShareEntry>,
}

impl AttributeBreakdown {
    pub fn leader(&self) -> Option<&GroupShareEntry> {
        self.entries.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMarketSummary {
    pub stats: DashboardStats,
    pub breakdowns: Vec<AttributeBreakdown>,
}

impl JobMarketSummary {
    pub fn breakdown(&self, attribute: JobAttribute) -> Option<&AttributeBreakdown> {
        self.breakdowns
            .iter()
            .find(|breakdown| breakdown.attribute == attribute)
    }
}
