use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use personnel_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::auth::{require_bearer_auth, require_hr_or_admin},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    if config.sweep_on_startup {
        match app_state.leave_service.run_expiry_sweep().await {
            Ok(n) => info!(reverted = n, "startup expiry sweep finished"),
            Err(e) => tracing::error!(error = %e, "startup expiry sweep failed"),
        }
    }

    // Daily at 00:01, same code path as the manual trigger.
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow::anyhow!("scheduler init failed: {}", e))?;
    {
        let state = app_state.clone();
        let job = Job::new_async("0 1 0 * * *", move |_id, _lock| {
            let state = state.clone();
            Box::pin(async move {
                match state.leave_service.run_expiry_sweep().await {
                    Ok(n) if n > 0 => info!(reverted = n, "expiry sweep finished"),
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "expiry sweep failed"),
                }
            })
        })
        .map_err(|e| anyhow::anyhow!("scheduler job failed: {}", e))?;
        scheduler
            .add(job)
            .await
            .map_err(|e| anyhow::anyhow!("scheduler add failed: {}", e))?;
        scheduler
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("scheduler start failed: {}", e))?;
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    let hr_api = Router::new()
        .route("/api/trabajador", post(routes::worker::create_worker))
        .route("/api/trabajador/:id", put(routes::worker::update_worker))
        .route(
            "/api/ficha-empresa/:id",
            put(routes::employment::update_record),
        )
        .route(
            "/api/ficha-empresa/trabajador/:worker_id/cambio",
            post(routes::employment::apply_labor_change),
        )
        .route(
            "/api/licencia-permiso/:id/review",
            post(routes::leave::review_leave),
        )
        .route(
            "/api/licencia-permiso/expirar",
            post(routes::leave::run_expiry_sweep),
        )
        .route("/api/bono", post(routes::bonus::create_bonus))
        .route("/api/bono/:id", put(routes::bonus::update_bonus))
        .route("/api/bono/asignar", post(routes::bonus::assign_bonus))
        .route(
            "/api/bono/asignaciones/:id",
            put(routes::bonus::update_assignment),
        )
        .layer(axum::middleware::from_fn(require_hr_or_admin));

    let authed_api = Router::new()
        .route("/api/trabajador", get(routes::worker::list_workers))
        .route("/api/trabajador/:id", get(routes::worker::get_worker))
        .route(
            "/api/ficha-empresa/trabajador/:worker_id",
            get(routes::employment::get_record),
        )
        .route(
            "/api/historial-laboral/trabajador/:worker_id",
            get(routes::history::list_history),
        )
        .route(
            "/api/historial-laboral/trabajador/:worker_id/unificado",
            get(routes::history::list_unified_history),
        )
        .route(
            "/api/licencia-permiso",
            post(routes::leave::create_leave).get(routes::leave::list_leaves),
        )
        .route("/api/licencia-permiso/:id", get(routes::leave::get_leave))
        .route("/api/bono", get(routes::bonus::list_bonuses))
        .route("/api/bono/:id", get(routes::bonus::get_bonus))
        .route(
            "/api/bono/asignaciones/ficha/:record_id",
            get(routes::bonus::list_assignments),
        )
        .route("/api/documentos", post(routes::documents::upload_document))
        .route(
            "/api/documentos/:filename",
            get(routes::documents::download_document),
        )
        .layer(axum::middleware::from_fn(require_bearer_auth));

    let app = base_routes
        .merge(public_api)
        .merge(hr_api)
        .merge(authed_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
