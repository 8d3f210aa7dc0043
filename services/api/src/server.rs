use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use jobportal::applications::{ApplicationRepository, ApplyService, ConfirmationSender, ResumeStore};
use jobportal::auth::{IdentityGateway, SessionStore};
use jobportal::backend::{
    BackendApplicationRepository, BackendClient, BackendConfirmationSender,
    BackendInterviewRepository, BackendResumeStore,
};
use jobportal::catalog::JobSource;
use jobportal::config::{AppConfig, CatalogSource};
use jobportal::error::AppError;
use jobportal::interview::{FeedbackGenerator, InterviewRepository, ScheduleService};
use jobportal::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    AppContext, InMemoryApplicationRepository, InMemoryInterviewRepository, InMemoryResumeStore,
    PreviewConfirmationSender,
};
use crate::routes::portal_router;
use crate::sessions::SessionRegistry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let backend = config
        .backend
        .as_ref()
        .map(|settings| Arc::new(BackendClient::new(settings)));

    let catalog = match (config.catalog_source, &backend) {
        (CatalogSource::Remote, Some(client)) => JobSource::Remote(client.clone()),
        _ => JobSource::Sample,
    };

    // The hosted backend carries every collection when configured; otherwise
    // the in-memory stand-ins keep local runs and demos self-contained.
    type Collaborators = (
        Arc<dyn ApplicationRepository>,
        Arc<dyn InterviewRepository>,
        Arc<dyn ResumeStore>,
        Arc<dyn ConfirmationSender>,
        IdentityGateway,
    );
    let (applications, interviews, resumes, confirmations, identity): Collaborators =
        match &backend {
            Some(client) => (
                Arc::new(BackendApplicationRepository::new(client.clone())),
                Arc::new(BackendInterviewRepository::new(client.clone())),
                Arc::new(BackendResumeStore::new(client.clone())),
                Arc::new(BackendConfirmationSender::new(client.clone())),
                IdentityGateway::Remote(client.clone()),
            ),
            None => (
                Arc::new(InMemoryApplicationRepository::default()),
                Arc::new(InMemoryInterviewRepository::default()),
                Arc::new(InMemoryResumeStore::default()),
                Arc::new(PreviewConfirmationSender::default()),
                IdentityGateway::Stub,
            ),
        };

    let ctx = Arc::new(AppContext {
        catalog,
        identity,
        sessions: SessionStore::default(),
        apply: ApplyService::new(resumes, applications.clone(), confirmations),
        schedule: ScheduleService::new(applications, interviews.clone()),
        interviews,
        live_sessions: SessionRegistry::new(),
        feedback: FeedbackGenerator::new(),
        capture_denials: 0,
        readiness: readiness_flag.clone(),
        metrics: Some(Arc::new(prometheus_handle)),
    });

    let app = portal_router(ctx).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job portal service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
