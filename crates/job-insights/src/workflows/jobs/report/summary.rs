use super::super::aggregate::GroupCounts;
use super::super::aggregator::JobDataAggregator;
use super::super::domain::{JobAttribute, JobRecord};
use super::views::{AttributeBreakdown, DashboardStats, JobMarketSummary};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Attributes the dashboard charts break the market down by, in panel order.
const BREAKDOWN_ATTRIBUTES: [JobAttribute; 4] = [
    JobAttribute::Role,
    JobAttribute::JobType,
    JobAttribute::Experience,
    JobAttribute::Location,
];

pub fn dashboard_stats(records: &[JobRecord], new_since: Option<NaiveDate>) -> DashboardStats {
    let companies: BTreeSet<&str> = records
        .iter()
        .filter_map(|record| record.attribute(JobAttribute::Company))
        .collect();

    let new_jobs = match new_since {
        Some(cutoff) => records
            .iter()
            .filter(|record| record.posted_on.is_some_and(|posted| posted >= cutoff))
            .count(),
        None => 0,
    };

    DashboardStats {
        total_jobs: records.len(),
        total_companies: companies.len(),
        companies: companies.into_iter().map(str::to_string).collect(),
        new_jobs,
        new_since,
    }
}

#[derive(Debug, Default)]
pub struct JobMarketReport {
    pub stats: Option<DashboardStats>,
    pub breakdowns: HashMap<JobAttribute, GroupCounts>,
}

impl JobMarketReport {
    pub fn build(
        aggregator: &JobDataAggregator,
        records: &[JobRecord],
        new_since: Option<NaiveDate>,
    ) -> Self {
        let breakdowns = BREAKDOWN_ATTRIBUTES
            .into_iter()
            .map(|attribute| (attribute, aggregator.aggregate_by_key(records, attribute)))
            .collect();

        Self {
            stats: Some(dashboard_stats(records, new_since)),
            breakdowns,
        }
    }

    pub fn summary(&self, aggregator: &JobDataAggregator) -> JobMarketSummary {
        let breakdowns = BREAKDOWN_ATTRIBUTES
            .into_iter()
            .filter_map(|attribute| {
                self.breakdowns.get(&attribute).map(|groups| AttributeBreakdown {
                    attribute,
                    attribute_label: attribute.label(),
                    total: groups.total(),
                    entries: aggregator.compute_group_share(groups).ordered(groups),
                })
            })
            .collect();

        JobMarketSummary {
            stats: self
                .stats
                .clone()
                .unwrap_or_else(|| dashboard_stats(&[], None)),
            breakdowns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).expect("valid date")
    }

    fn listings() -> Vec<JobRecord> {
        vec![
            JobRecord::new(1)
                .with_title("Cloud Engineer")
                .with_company("Oracle")
                .with_job_type("Remote")
                .with_posted_on(date(1)),
            JobRecord::new(2)
                .with_title("Cloud Engineer")
                .with_company("Amazon")
                .with_experience("Senior Level")
                .with_posted_on(date(10)),
            JobRecord::new(3)
                .with_title("Cloud Consultant")
                .with_company("Oracle")
                .with_job_type("Remote"),
            JobRecord::new(4).with_title("Cloud Consultant").with_company(""),
        ]
    }

    #[test]
    fn stats_count_distinct_companies_and_new_jobs() {
        let stats = dashboard_stats(&listings(), Some(date(5)));
        assert_eq!(stats.total_jobs, 4);
        assert_eq!(stats.total_companies, 2);
        assert_eq!(stats.companies, vec!["Amazon", "Oracle"]);
        assert_eq!(stats.new_jobs, 1);

        let stats = dashboard_stats(&listings(), None);
        assert_eq!(stats.new_jobs, 0);
    }

    #[test]
    fn summary_orders_panels_and_entries() {
        let aggregator = JobDataAggregator::default();
        let report = JobMarketReport::build(&aggregator, &listings(), None);
        let summary = report.summary(&aggregator);

        let attributes: Vec<_> = summary
            .breakdowns
            .iter()
            .map(|breakdown| breakdown.attribute)
            .collect();
        assert_eq!(attributes, BREAKDOWN_ATTRIBUTES.to_vec());

        let roles = summary.breakdown(JobAttribute::Role).expect("role panel");
        assert_eq!(roles.total, 4);
        assert_eq!(roles.entries[0].key, "Cloud Consultant");
        assert!((roles.entries[0].share - 0.5).abs() < 1e-9);

        let experience = summary
            .breakdown(JobAttribute::Experience)
            .expect("experience panel");
        let leader = experience.leader().expect("leading group");
        assert_eq!(leader.key, "Unknown Experience");
        assert_eq!(leader.count, 3);
    }

    #[test]
    fn empty_snapshot_produces_empty_panels() {
        let aggregator = JobDataAggregator::default();
        let summary = JobMarketReport::build(&aggregator, &[], None).summary(&aggregator);
        assert_eq!(summary.stats.total_jobs, 0);
        assert!(summary
            .breakdowns
            .iter()
            .all(|breakdown| breakdown.entries.is_empty() && breakdown.total == 0));

        let blank = JobMarketReport::default().summary(&aggregator);
        assert!(blank.breakdowns.is_empty());
    }
}
