// Utility modules for the Wari backend

pub mod password;
pub mod referral_code;
pub mod service_error;

pub use password::{hash_password, verify_password, PasswordError};
pub use referral_code::generate_referral_code;
pub use service_error::{ErrorDetail, ErrorResponse, ServiceError, ServiceResult};
