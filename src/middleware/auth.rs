// Request-scoped identity
// Populated from validated JWT claims; handlers receive this instead of
// any ambient session state

use serde::{Deserialize, Serialize};

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub token_id: String,
    pub email: String,
    pub exp: u64,
}
