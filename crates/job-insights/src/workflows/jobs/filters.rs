use super::domain::{AttributeConstraint, FilterSelection, JobAttribute, JobRecord, MissingSalaryPolicy};
use serde::Serialize;
use std::collections::BTreeSet;

/// Drop-down choices for the dashboard filters, each led by the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub job_types: Vec<String>,
}

impl FilterOptions {
    pub fn for_attribute(&self, attribute: JobAttribute) -> Option<&[String]> {
        match attribute {
            JobAttribute::Location => Some(&self.locations),
            JobAttribute::JobType => Some(&self.job_types),
            _ => None,
        }
    }
}

pub(crate) fn derive_filter_options(records: &[JobRecord]) -> FilterOptions {
    FilterOptions {
        locations: distinct_with_wildcard(records, JobAttribute::Location),
        job_types: distinct_with_wildcard(records, JobAttribute::JobType),
    }
}

/// Sorted distinct non-empty values of `attribute`, prefixed with `"All"`.
pub(crate) fn distinct_with_wildcard(records: &[JobRecord], attribute: JobAttribute) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .filter_map(|record| record.attribute(attribute))
        .collect();

    std::iter::once(AttributeConstraint::WILDCARD)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

pub(crate) fn apply_filters(
    records: &[JobRecord],
    selection: &FilterSelection,
    policy: MissingSalaryPolicy,
) -> Vec<JobRecord> {
    let query = selection.normalized_query();

    records
        .iter()
        .filter(|record| passes(record, selection, query.as_deref(), policy))
        .cloned()
        .collect()
}

fn passes(
    record: &JobRecord,
    selection: &FilterSelection,
    query: Option<&str>,
    policy: MissingSalaryPolicy,
) -> bool {
    let attributes_match = selection
        .attributes
        .iter()
        .all(|(attribute, constraint)| constraint.matches(record.attribute(*attribute)));
    if !attributes_match {
        return false;
    }

    if let Some(range) = &selection.salary {
        if !policy.admits(record.salary, range) {
            return false;
        }
    }

    match query {
        Some(query) => contains_ignore_case(record.job_title.as_deref(), query)
            || contains_ignore_case(record.company_name.as_deref(), query),
        None => true,
    }
}

fn contains_ignore_case(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack
        .map(|value| value.to_lowercase().contains(lowered_needle))
        .unwrap_or(false)
}
