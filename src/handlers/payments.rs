// Payment handlers
// Checkout creation, provider dispatch, and the confirmation webhook

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    models::{Payment, ProviderTag},
    utils::ServiceError,
};

#[derive(Debug, Serialize)]
pub struct PaymentInfo {
    pub payment_id: i32,
    pub user_id: i32,
    pub provider: String,
    pub amount: i32,
    pub status: String,
    pub external_id: Option<String>,
}

impl From<Payment> for PaymentInfo {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.id,
            user_id: payment.user_id,
            provider: payment.provider,
            amount: payment.amount,
            status: payment.status,
            external_id: payment.external_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub payment: PaymentInfo,
    /// Providers the payer can dispatch this payment to
    pub providers: Vec<&'static str>,
}

/// POST /v1/payments/checkout/{user_id} - Open a pending registration-fee
/// payment and list the available providers
pub async fn open_checkout(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state.payment_flow_service.open_checkout(user_id).await?;

    let response = ApiResponse {
        success: true,
        data: Some(CheckoutResponse {
            payment: PaymentInfo::from(payment),
            providers: vec![ProviderTag::Orange.as_str(), ProviderTag::Mchain.as_str()],
        }),
        message: "Checkout opened".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn dispatch(
    state: AppState,
    payment_id: i32,
    tag: ProviderTag,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state
        .payment_flow_service
        .dispatch_to_provider(payment_id, tag)
        .await?;

    let response = ApiResponse {
        success: true,
        data: Some(PaymentInfo::from(payment)),
        message: format!(
            "Payment initiated via {} (simulation); confirmation arrives by webhook",
            tag.as_str()
        ),
    };

    Ok(Json(response))
}

/// POST /v1/payments/pay/orange/{payment_id}
pub async fn pay_orange(
    State(state): State<AppState>,
    Path(payment_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    dispatch(state, payment_id, ProviderTag::Orange).await
}

/// POST /v1/payments/pay/mchain/{payment_id}
pub async fn pay_mchain(
    State(state): State<AppState>,
    Path(payment_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    dispatch(state, payment_id, ProviderTag::Mchain).await
}

/// POST /v1/webhooks/payment/{payment_id} - Provider confirmation
/// callback. Requires the shared webhook secret; repeated confirmations
/// are no-ops. Wire format matches the provider contract:
/// 200 {"status":"ok","payment_id":N} or 404 {"error":"not found"}.
pub async fn confirm_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_id): Path<i32>,
) -> axum::response::Response {
    let presented = headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    // Constant-time comparison against the shared secret
    let authorized: bool = presented
        .as_bytes()
        .ct_eq(crate::app_config::config().webhook_secret.as_bytes())
        .into();

    if !authorized {
        tracing::warn!(payment_id, "Webhook rejected: bad or missing secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        )
            .into_response();
    }

    match state.payment_flow_service.confirm_payment(payment_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "payment_id": outcome.payment_id})),
        )
            .into_response(),
        Err(ServiceError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
        },
        Err(e) => e.into_response(),
    }
}
