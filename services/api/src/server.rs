use crate::cli::ServeArgs;
use crate::infra::{resolve_data_path, AppState};
use crate::routes::with_job_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_insights::config::AppConfig;
use job_insights::error::AppError;
use job_insights::telemetry;
use job_insights::workflows::jobs::{JobDataAggregator, JobInsightsService};
use job_insights::workflows::sources::{FileJobSource, JobSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const INITIAL_LOAD_RETRY: Duration = Duration::from_secs(15);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let data_path = resolve_data_path(args.data.take(), &config.jobs)?;
    let source = FileJobSource::for_path(&data_path)?;
    info!(source = %source.describe(), policy = ?config.jobs.missing_salary, "job source configured");

    let job_service = Arc::new(JobInsightsService::new(
        source,
        JobDataAggregator::new(config.jobs.missing_salary),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_job_routes(job_service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if load_snapshot(&job_service).await {
        readiness_flag.store(true, Ordering::Release);
    } else {
        tokio::spawn(retry_initial_load(job_service, readiness_flag));
    }

    info!(?config.environment, %addr, "job insights service listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Runs a refresh on the blocking pool; file sources read synchronously.
async fn load_snapshot<S>(service: &Arc<JobInsightsService<S>>) -> bool
where
    S: JobSource + 'static,
{
    let service = Arc::clone(service);
    matches!(
        tokio::task::spawn_blocking(move || service.refresh()).await,
        Ok(Ok(_))
    )
}

/// Keeps `/ready` failing until a snapshot exists, either from this loop or a
/// manual `POST /api/v1/jobs/refresh`.
async fn retry_initial_load<S: JobSource + 'static>(
    service: Arc<JobInsightsService<S>>,
    readiness: Arc<AtomicBool>,
) {
    loop {
        tokio::time::sleep(INITIAL_LOAD_RETRY).await;
        if service.is_loaded() || load_snapshot(&service).await {
            readiness.store(true, Ordering::Release);
            info!("job data loaded; service ready");
            return;
        }
    }
}
