// Services module for the Wari backend
// Business logic layer for the application

pub mod identity;
pub mod jwt;
pub mod payment_flow;
pub mod providers;
pub mod rewards;

// Re-export commonly used services
pub use identity::{IdentityService, RegistrationInput};
pub use jwt::{AccessTokenClaims, JwtError, JwtService};
pub use payment_flow::{ConfirmationOutcome, PaymentFlowService};
pub use providers::{MChainProvider, OrangeProvider, PaymentProvider};
pub use rewards::RewardService;
