use axum::routing::{get, post};
use axum::Router;
use checkout_engine::clients::orders::HttpOrdersClient;
use checkout_engine::clients::profile::HttpProfileClient;
use checkout_engine::config::AppConfig;
use checkout_engine::pricing::PricingConfig;
use checkout_engine::session::checkout_service::CheckoutService;
use checkout_engine::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let http = reqwest::Client::new();

    let orders_api: Arc<dyn checkout_engine::clients::orders::OrdersApi> =
        Arc::new(HttpOrdersClient {
            base_url: cfg.api_base_url.clone(),
            timeout_ms: 2500,
            client: http.clone(),
        });
    let profile_api = Arc::new(HttpProfileClient {
        base_url: cfg.api_base_url.clone(),
        timeout_ms: 2500,
        client: http,
    });

    let checkout_service = CheckoutService::new(
        Arc::new(PricingConfig::default()),
        orders_api.clone(),
        profile_api,
        Duration::from_millis(cfg.gateway_delay_ms),
        cfg.no_delivery_weekday(),
    );

    let state = AppState {
        checkout_service,
        orders_api,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route(
            "/checkout",
            post(checkout_engine::http::handlers::checkout::open_checkout)
                .get(checkout_engine::http::handlers::checkout::get_checkout)
                .patch(checkout_engine::http::handlers::checkout::update_checkout)
                .delete(checkout_engine::http::handlers::checkout::cancel_checkout),
        )
        .route("/checkout/quote", get(checkout_engine::http::handlers::checkout::quote))
        .route(
            "/checkout/submit",
            post(checkout_engine::http::handlers::checkout::submit_checkout),
        )
        .route(
            "/checkout/verify-otp",
            post(checkout_engine::http::handlers::checkout::verify_otp),
        )
        .route(
            "/checkout/payment-proof",
            post(checkout_engine::http::handlers::checkout::submit_payment_proof),
        )
        .route(
            "/checkout/invoice",
            get(checkout_engine::http::handlers::checkout::download_invoice),
        )
        .route("/delivery/districts", get(checkout_engine::http::handlers::delivery::districts))
        .route("/delivery/times", get(checkout_engine::http::handlers::delivery::times))
        .route("/ops/readiness", get(checkout_engine::http::handlers::ops::readiness))
        .route("/ops/liveness", get(checkout_engine::http::handlers::ops::liveness))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}
