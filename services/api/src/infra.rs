use chrono::NaiveDate;
use job_insights::config::{ConfigError, JobsConfig};
use job_insights::workflows::jobs::JobAttribute;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_attribute(raw: &str) -> Result<JobAttribute, String> {
    JobAttribute::parse(raw).ok_or_else(|| {
        let expected: Vec<String> = JobAttribute::ordered()
            .iter()
            .map(|attribute| attribute.label().to_lowercase().replace(' ', "-"))
            .collect();
        format!("unknown attribute '{raw}'; expected one of {}", expected.join(", "))
    })
}

/// Command-line path first, then `JOBS_DATA_PATH`.
pub(crate) fn resolve_data_path(
    flag: Option<PathBuf>,
    config: &JobsConfig,
) -> Result<PathBuf, ConfigError> {
    flag.or_else(|| config.data_path.clone())
        .ok_or(ConfigError::MissingDataPath)
}
