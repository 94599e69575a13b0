use crate::http::error::err;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn districts(State(state): State<AppState>) -> impl IntoResponse {
    match state.orders_api.delivery_districts().await {
        Ok(list) => (StatusCode::OK, Json(serde_json::json!({ "success": true, "data": list })))
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "district lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(err("DELIVERY_LOOKUP_FAILED", "could not load delivery districts")),
            )
                .into_response()
        }
    }
}

pub async fn times(State(state): State<AppState>) -> impl IntoResponse {
    match state.orders_api.delivery_times().await {
        Ok(list) => (StatusCode::OK, Json(serde_json::json!({ "success": true, "data": list })))
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "delivery time lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(err("DELIVERY_LOOKUP_FAILED", "could not load delivery times")),
            )
                .into_response()
        }
    }
}
