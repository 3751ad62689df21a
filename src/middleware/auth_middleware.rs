// Authentication middleware for protected routes
// Validates JWT access tokens and injects AuthenticatedUser into request
// extensions

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{app::AppState, middleware::auth::AuthenticatedUser, utils::ServiceError};

/// Middleware function that validates bearer tokens and adds
/// AuthenticatedUser to extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return ServiceError::Unauthenticated.into_response(),
    };

    match app_state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            let user_id = match claims.sub.parse::<i32>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!("JWT subject is not a valid user id");
                    return ServiceError::Unauthenticated.into_response();
                },
            };

            let auth_user = AuthenticatedUser {
                user_id,
                token_id: claims.jti,
                email: claims.email,
                exp: claims.exp,
            };

            request.extensions_mut().insert(auth_user);

            next.run(request).await
        },
        Err(e) => {
            tracing::warn!("JWT validation failed: {}", e);
            ServiceError::Unauthenticated.into_response()
        },
    }
}

/// Extractor for AuthenticatedUser from request extensions
/// This allows handlers to take AuthenticatedUser directly as a parameter
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthenticated.into_response())
    }
}
