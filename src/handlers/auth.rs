// Authentication handlers
// Registration, login, logout, current-user lookup

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    handlers::ApiResponse,
    middleware::auth::AuthenticatedUser,
    services::RegistrationInput,
    utils::ServiceError,
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 3, max = 32, message = "Phone must be between 3 and 32 characters"))]
    pub phone: String,

    /// Referral code of the inviter, if any
    #[serde(default)]
    pub referral: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i32,
    pub email: String,
    pub referral_code: String,
    /// Amount due at checkout before the account activates
    pub registration_fee: i32,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user_id: i32,
    pub email: String,
    pub phone: String,
    pub balance: i32,
    pub is_active: bool,
    pub referral_code: String,
}

fn validation_error(errors: validator::ValidationErrors) -> ServiceError {
    let detail = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {}", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");
    ServiceError::Validation(detail)
}

// =============================================================================
// AUTHENTICATION HANDLERS
// =============================================================================

/// POST /v1/auth/register - Create an inactive user and point the client
/// at checkout for the registration fee
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate().map_err(validation_error)?;

    let user = state
        .identity_service
        .register(RegistrationInput {
            email: req.email,
            password: req.password,
            phone: req.phone,
            referred_by: req.referral,
        })
        .await?;

    let registration_fee = crate::app_config::config().rewards.registration_fee;

    let response = ApiResponse {
        success: true,
        data: Some(RegisterResponse {
            user_id: user.id,
            email: user.email,
            referral_code: user.referral_code,
            registration_fee,
        }),
        message: "Registration successful, checkout required to activate the account".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /v1/auth/login - Verify credentials and return an access token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state
        .identity_service
        .authenticate(&req.email, &req.password)
        .await?;

    let access_token = state
        .jwt_service
        .generate_access_token(&user)
        .map_err(|e| ServiceError::Token(e.to_string()))?;

    let response = ApiResponse {
        success: true,
        data: Some(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_service.access_expiry(),
            user: UserInfo {
                user_id: user.id,
                email: user.email,
                phone: user.phone,
                balance: user.balance,
                is_active: user.is_active,
                referral_code: user.referral_code,
            },
        }),
        message: "Login successful".to_string(),
    };

    Ok(Json(response))
}

/// POST /v1/auth/logout - Access tokens are stateless, so logout simply
/// acknowledges; the client discards its token
pub async fn logout(auth_user: AuthenticatedUser) -> impl IntoResponse {
    tracing::info!(user_id = auth_user.user_id, "User logged out");

    Json(ApiResponse::<()> {
        success: true,
        data: None,
        message: "Logged out".to_string(),
    })
}

/// GET /v1/auth/me - Current user profile
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.identity_service.find_by_id(auth_user.user_id).await?;

    let response = ApiResponse {
        success: true,
        data: Some(UserInfo {
            user_id: user.id,
            email: user.email,
            phone: user.phone,
            balance: user.balance,
            is_active: user.is_active,
            referral_code: user.referral_code,
        }),
        message: "OK".to_string(),
    };

    Ok(Json(response))
}
