// Application state and configuration
use std::sync::Arc;

use crate::{
    db::DieselPool,
    services::{IdentityService, JwtService, PaymentFlowService, RewardService},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub diesel_pool: DieselPool,
    pub jwt_service: Arc<JwtService>,
    pub identity_service: Arc<IdentityService>,
    pub payment_flow_service: Arc<PaymentFlowService>,
    pub reward_service: Arc<RewardService>,
    pub max_connections: u32,
}
