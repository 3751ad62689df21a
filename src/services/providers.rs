// Payment provider integrations
// Each provider implements `initiate` and returns its transaction id.
// Both integrations are simulations: they mint a provider-prefixed id
// instead of calling out. A live integration replaces the body of
// `initiate` only; the payment state machine never changes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::app_config::{MChainConfig, OrangeConfig};
use crate::models::{Payment, ProviderTag, User};
use crate::utils::ServiceResult;

/// A payment-initiation capability for one external provider
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn tag(&self) -> ProviderTag;

    /// Start a transaction with the provider, returning its external id
    async fn initiate(&self, payment: &Payment, user: &User) -> ServiceResult<String>;
}

fn simulated_transaction_id(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .as_simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("{}{}", prefix, suffix)
}

/// Orange Money. Credentials are loaded from the environment but unused
/// until the real payment-initiation call lands here.
pub struct OrangeProvider {
    #[allow(dead_code)]
    config: OrangeConfig,
}

impl OrangeProvider {
    pub fn from_env() -> Self {
        Self {
            config: crate::app_config::config().orange.clone(),
        }
    }
}

#[async_trait]
impl PaymentProvider for OrangeProvider {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Orange
    }

    async fn initiate(&self, payment: &Payment, user: &User) -> ServiceResult<String> {
        let external_id = simulated_transaction_id("ORANGE_SIM_");
        tracing::info!(
            payment_id = payment.id,
            user_id = user.id,
            external_id = %external_id,
            "Simulated Orange payment initiation"
        );
        Ok(external_id)
    }
}

/// M-Chain. Same simulation shape as Orange.
pub struct MChainProvider {
    #[allow(dead_code)]
    config: MChainConfig,
}

impl MChainProvider {
    pub fn from_env() -> Self {
        Self {
            config: crate::app_config::config().mchain.clone(),
        }
    }
}

#[async_trait]
impl PaymentProvider for MChainProvider {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Mchain
    }

    async fn initiate(&self, payment: &Payment, user: &User) -> ServiceResult<String> {
        let external_id = simulated_transaction_id("MCHAIN_SIM_");
        tracing::info!(
            payment_id = payment.id,
            user_id = user.id,
            external_id = %external_id,
            "Simulated M-Chain payment initiation"
        );
        Ok(external_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;
    use chrono::Utc;

    fn sample_payment() -> Payment {
        Payment {
            id: 1,
            user_id: 7,
            provider: ProviderTag::Pending.as_str().to_string(),
            amount: 3000,
            status: PaymentStatus::Pending.as_str().to_string(),
            external_id: None,
            created_at: Utc::now(),
        }
    }

    fn sample_user() -> User {
        User {
            id: 7,
            email: "payer@x.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "000".to_string(),
            balance: 0,
            is_active: false,
            referral_code: "cafef00d".to_string(),
            referred_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_orange_external_id_shape() {
        let provider = OrangeProvider {
            config: OrangeConfig {
                client_id: String::new(),
                client_secret: String::new(),
                api_base: "https://api.orange.com".to_string(),
                merchant_id: String::new(),
            },
        };

        let external_id = provider
            .initiate(&sample_payment(), &sample_user())
            .await
            .expect("initiate failed");

        assert!(external_id.starts_with("ORANGE_SIM_"));
        assert_eq!(external_id.len(), "ORANGE_SIM_".len() + 12);
        assert_eq!(provider.tag(), ProviderTag::Orange);
    }

    #[tokio::test]
    async fn test_mchain_external_id_shape() {
        let provider = MChainProvider {
            config: MChainConfig {
                api_key: String::new(),
                api_base: "https://api.maschain.com".to_string(),
            },
        };

        let external_id = provider
            .initiate(&sample_payment(), &sample_user())
            .await
            .expect("initiate failed");

        assert!(external_id.starts_with("MCHAIN_SIM_"));
        assert_eq!(provider.tag(), ProviderTag::Mchain);
    }

    #[test]
    fn test_simulated_ids_are_unique() {
        let a = simulated_transaction_id("ORANGE_SIM_");
        let b = simulated_transaction_id("ORANGE_SIM_");
        assert_ne!(a, b);
    }
}
