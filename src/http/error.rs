use crate::session::checkout_service::CheckoutError;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

pub fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

pub fn envelope(e: &CheckoutError) -> (StatusCode, ErrorEnvelope) {
    match e {
        CheckoutError::NoActiveCheckout => {
            (StatusCode::NOT_FOUND, err("NO_ACTIVE_CHECKOUT", "no checkout session is open"))
        }
        CheckoutError::AlreadyInFlight => (
            StatusCode::CONFLICT,
            err("PAYMENT_IN_FLIGHT", "a payment attempt is already in progress"),
        ),
        CheckoutError::AlreadyCompleted => (
            StatusCode::CONFLICT,
            err("CHECKOUT_ALREADY_COMPLETED", "this checkout has already completed"),
        ),
        CheckoutError::Validation(field) => {
            let mut envelope = err("VALIDATION_FAILED", &field.message);
            envelope.error.details = Some(field.field.to_string());
            (StatusCode::BAD_REQUEST, envelope)
        }
        CheckoutError::GatewayDeclined { outcome, message } => {
            let mut envelope = err("GATEWAY_DECLINED", message);
            envelope.error.details = Some(outcome.code().to_string());
            (StatusCode::PAYMENT_REQUIRED, envelope)
        }
        CheckoutError::InvalidOtp => (
            StatusCode::BAD_REQUEST,
            err("INVALID_OTP", "the verification code is incorrect"),
        ),
        CheckoutError::NoChallengeOpen => (
            StatusCode::CONFLICT,
            err("NO_CHALLENGE_OPEN", "no verification challenge is pending"),
        ),
        CheckoutError::LoginRequired => (
            StatusCode::UNAUTHORIZED,
            err("LOGIN_REQUIRED", "sign in to submit payment proof"),
        ),
        CheckoutError::ProofNotExpected => (
            StatusCode::CONFLICT,
            err("PROOF_NOT_EXPECTED", "no bank transfer order is awaiting proof"),
        ),
        CheckoutError::Persistence(message) => {
            let mut envelope = err("ORDER_PERSISTENCE_FAILED", "order could not be saved");
            envelope.error.details = Some(message.clone());
            (StatusCode::BAD_GATEWAY, envelope)
        }
        CheckoutError::Cancelled => (
            StatusCode::CONFLICT,
            err("CHECKOUT_CANCELLED", "the checkout was closed before the attempt finished"),
        ),
        CheckoutError::Internal(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err("INTERNAL_ERROR", &e.to_string()))
        }
    }
}
