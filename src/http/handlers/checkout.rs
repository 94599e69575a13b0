use crate::domain::checkout::ProductRef;
use crate::domain::order::{
    OpenCheckoutRequest, PaymentProofRequest, UpdateCheckoutRequest, VerifyOtpRequest,
};
use crate::http::error::envelope;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub async fn open_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OpenCheckoutRequest>,
) -> impl IntoResponse {
    let product = ProductRef {
        product_id: req.product_id,
        name: req.product_name,
        unit_price: req.unit_price,
    };
    let token = bearer_token(&headers);
    match state.checkout_service.open(product, token.as_deref()).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn get_checkout(State(state): State<AppState>) -> impl IntoResponse {
    match state.checkout_service.view().await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn update_checkout(
    State(state): State<AppState>,
    Json(req): Json<UpdateCheckoutRequest>,
) -> impl IntoResponse {
    match state.checkout_service.update(&req).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn quote(State(state): State<AppState>) -> impl IntoResponse {
    match state.checkout_service.quote().await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn submit_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = bearer_token(&headers);
    match state.checkout_service.submit(token.as_deref()).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn verify_otp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VerifyOtpRequest>,
) -> impl IntoResponse {
    let token = bearer_token(&headers);
    match state.checkout_service.verify_otp(&req.otp, token.as_deref()).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn submit_payment_proof(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PaymentProofRequest>,
) -> impl IntoResponse {
    let token = bearer_token(&headers);
    match state
        .checkout_service
        .submit_payment_proof(&req.payment_proof, token.as_deref())
        .await
    {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn download_invoice(State(state): State<AppState>) -> impl IntoResponse {
    match state.checkout_service.invoice().await {
        Ok(doc) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, doc.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", doc.file_name),
                ),
            ],
            doc.body,
        )
            .into_response(),
        Err(e) => {
            let (status, body) = envelope(&e);
            (status, Json(body)).into_response()
        }
    }
}

pub async fn cancel_checkout(State(state): State<AppState>) -> impl IntoResponse {
    let existed = state.checkout_service.cancel().await;
    (StatusCode::OK, Json(serde_json::json!({ "cancelled": existed }))).into_response()
}
