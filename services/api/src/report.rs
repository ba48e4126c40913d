use chrono::NaiveDate;
use clap::Args;
use job_insights::config::AppConfig;
use job_insights::error::AppError;
use job_insights::workflows::jobs::{
    AggregationResult, FilterOptions, FilterSelection, GroupCounts, GroupExclusions,
    JobAttribute, JobDataAggregator, JobMarketReport, JobMarketSummary, JobRecord, SalaryRange,
};
use job_insights::workflows::sources::{FileJobSource, JobSource};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct JobsReportArgs {
    /// Job dataset (.csv or .json)
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Attribute to group the chart by
    #[arg(long, default_value = "role", value_parser = crate::infra::parse_attribute)]
    pub(crate) group_by: JobAttribute,
    /// Only keep listings in this location ("All" for any)
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Only keep listings of this job type ("All" for any)
    #[arg(long)]
    pub(crate) job_type: Option<String>,
    /// Only keep listings at this experience level ("All" for any)
    #[arg(long)]
    pub(crate) experience: Option<String>,
    /// Case-insensitive search over job title and company
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Lower salary bound (inclusive)
    #[arg(long)]
    pub(crate) min_salary: Option<f64>,
    /// Upper salary bound (inclusive)
    #[arg(long)]
    pub(crate) max_salary: Option<f64>,
    /// Hide a group from the breakdown; repeatable
    #[arg(long)]
    pub(crate) exclude: Vec<String>,
    /// Count listings posted on or after this date (YYYY-MM-DD) as new
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) new_since: Option<NaiveDate>,
    /// Print every listing that passed the filters
    #[arg(long)]
    pub(crate) list_jobs: bool,
}

#[derive(Args, Debug)]
pub(crate) struct JobsOptionsArgs {
    /// Job dataset (.csv or .json)
    #[arg(long)]
    pub(crate) data: PathBuf,
}

pub(crate) fn run_jobs_report(args: JobsReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let records = load_records(&args.data)?;
    let aggregator = JobDataAggregator::new(config.jobs.missing_salary);

    let selection = selection_from_args(&args);
    let exclusions: GroupExclusions = args.exclude.iter().map(String::as_str).collect();
    let result = aggregator.aggregate(
        Some(records.as_slice()),
        &selection,
        args.group_by,
        &exclusions,
    );
    let summary =
        JobMarketReport::build(&aggregator, &records, args.new_since).summary(&aggregator);
    let options = aggregator.derive_filter_options(&records);

    render_jobs_report(
        &args.data,
        &summary,
        &options,
        &selection,
        &result,
        &exclusions,
        args.list_jobs,
    );

    Ok(())
}

pub(crate) fn run_jobs_options(args: JobsOptionsArgs) -> Result<(), AppError> {
    let records = load_records(&args.data)?;
    let options = JobDataAggregator::default().derive_filter_options(&records);

    println!("Job dataset: {}", args.data.display());
    render_filter_options(&options);
    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<JobRecord>, AppError> {
    let source = FileJobSource::for_path(path)?;
    Ok(source.fetch_all()?)
}

pub(crate) fn selection_from_args(args: &JobsReportArgs) -> FilterSelection {
    let mut selection = FilterSelection::new();

    for (attribute, value) in [
        (JobAttribute::Location, &args.location),
        (JobAttribute::JobType, &args.job_type),
        (JobAttribute::Experience, &args.experience),
    ] {
        if let Some(value) = value {
            selection = selection.with_attribute(attribute, value);
        }
    }

    // An omitted bound leaves that side of the range open.
    if args.min_salary.is_some() || args.max_salary.is_some() {
        selection = selection.with_salary(SalaryRange::new(
            args.min_salary.unwrap_or(0.0),
            args.max_salary.unwrap_or(f64::INFINITY),
        ));
    }

    if let Some(query) = &args.query {
        selection = selection.with_query(query.clone());
    }

    selection
}

fn render_jobs_report(
    data: &Path,
    summary: &JobMarketSummary,
    options: &FilterOptions,
    selection: &FilterSelection,
    result: &AggregationResult,
    exclusions: &GroupExclusions,
    list_jobs: bool,
) {
    println!("Job market report");
    println!("Job dataset: {}", data.display());

    let stats = &summary.stats;
    println!(
        "- {} listings across {} companies",
        stats.total_jobs, stats.total_companies
    );
    if let Some(cutoff) = stats.new_since {
        println!("- {} new listings since {}", stats.new_jobs, cutoff);
    }

    println!();
    render_filter_options(options);

    println!("\nActive filters");
    for attribute in [
        JobAttribute::Location,
        JobAttribute::JobType,
        JobAttribute::Experience,
    ] {
        println!(
            "- {}: {}",
            attribute.label(),
            selection.constraint(attribute).as_selection()
        );
    }
    if let Some(range) = selection.salary {
        if range.max.is_finite() {
            println!("- Salary: {:.0} to {:.0}", range.min, range.max);
        } else {
            println!("- Salary: {:.0} and up", range.min);
        }
        if range.min > range.max {
            println!("  minimum exceeds maximum; no listing can match");
        }
    }
    if let Some(query) = selection.query.as_deref().filter(|query| !query.is_empty()) {
        println!("- Search: \"{}\"", query);
    }

    println!(
        "\n{} breakdown ({} of {} listings)",
        result.group_by.label(),
        result.filtered.len(),
        stats.total_jobs
    );
    if result.shares.is_empty() {
        println!("- no listings match the current filters");
    }
    for entry in &result.shares {
        let hidden = if exclusions.is_excluded(&entry.key) {
            " [hidden]"
        } else {
            ""
        };
        println!(
            "- {}: {} ({:.1}%){}",
            entry.key,
            entry.count,
            entry.share * 100.0,
            hidden
        );
    }
    let unmatched = unmatched_exclusions(exclusions, &result.groups);
    if !unmatched.is_empty() {
        println!("- excluded but not present: {}", unmatched.join(", "));
    }

    for breakdown in &summary.breakdowns {
        if breakdown.attribute == result.group_by {
            continue;
        }
        match breakdown.leader() {
            Some(leader) => println!(
                "Top {}: {} ({:.1}% of {})",
                breakdown.attribute_label.to_lowercase(),
                leader.key,
                leader.share * 100.0,
                breakdown.total
            ),
            None => println!("Top {}: none", breakdown.attribute_label.to_lowercase()),
        }
    }

    if list_jobs {
        println!("\nMatching listings");
        for record in &result.filtered {
            let salary = record
                .salary
                .map(|salary| format!("{salary:.0}"))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "- [{}] {} at {} | {} | {} | {} | salary {}",
                record.id,
                record.group_key(JobAttribute::Role),
                record.group_key(JobAttribute::Company),
                record.group_key(JobAttribute::Location),
                record.group_key(JobAttribute::JobType),
                record.group_key(JobAttribute::Experience),
                salary
            );
        }
    }
}

/// Excluded keys that name no group, usually a typo in `--exclude`.
pub(crate) fn unmatched_exclusions<'a>(
    exclusions: &'a GroupExclusions,
    groups: &GroupCounts,
) -> Vec<&'a str> {
    exclusions
        .iter()
        .filter(|key| groups.get(key).is_none())
        .collect()
}

fn render_filter_options(options: &FilterOptions) {
    println!("Filter options");
    for attribute in [JobAttribute::Location, JobAttribute::JobType] {
        if let Some(values) = options.for_attribute(attribute) {
            println!("- {}: {}", attribute.label(), values.join(", "));
        }
    }
}
