use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use unfurl_server::config::Config;
use unfurl_server::extractor::HtmlExtractor;
use unfurl_server::router::create_router;
use unfurl_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing: JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("unfurl_server=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Unfurl Server starting...");

    let config = Config::from_env();
    info!(
        is_dev = config.is_dev,
        fetch_timeout = ?config.extractor.fetch_timeout,
        request_timeout = ?config.request_timeout,
        allow_private_hosts = config.extractor.allow_private_hosts,
        "📝 Configuration loaded"
    );
    if config.extractor.allow_private_hosts {
        tracing::warn!("🔓 Private host check disabled (ALLOW_PRIVATE_HOSTS=true)");
    }

    let extractor =
        HtmlExtractor::new(&config.extractor).expect("Failed to build page extractor");
    let app_state = AppState::new(extractor);

    // Prometheus metrics layer
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = create_router(app_state, config.request_timeout)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer);

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
