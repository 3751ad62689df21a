// Payment flow controller
// Drives a Payment through pending -> dispatched -> paid. Dispatch is the
// only step that talks to a provider; confirmation is a conditional,
// idempotent transition that also activates the user and settles the
// referral bonus.

use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::{DieselPool, PooledConn};
use crate::models::{Payment, ProviderTag, User};
use crate::services::providers::PaymentProvider;
use crate::services::rewards::RewardService;
use crate::utils::{ServiceError, ServiceResult};

pub struct PaymentFlowService {
    pool: DieselPool,
    providers: Vec<Box<dyn PaymentProvider>>,
}

/// Result of a confirmation callback
#[derive(Debug, Serialize)]
pub struct ConfirmationOutcome {
    pub payment_id: i32,
    /// True when this call performed the pending -> paid transition;
    /// false for a repeated callback, which changes nothing
    pub newly_confirmed: bool,
    pub referrer_credited: Option<i32>,
}

impl PaymentFlowService {
    pub fn new(pool: DieselPool, providers: Vec<Box<dyn PaymentProvider>>) -> Self {
        Self { pool, providers }
    }

    async fn conn(&self) -> ServiceResult<PooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| ServiceError::Pool(e.to_string()))
    }

    fn provider(&self, tag: ProviderTag) -> ServiceResult<&dyn PaymentProvider> {
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.tag() == tag)
            .ok_or(ServiceError::NotFound("payment provider"))
    }

    /// Create a pending registration-fee payment for an existing user.
    /// Deliberately allows multiple open payments per user.
    pub async fn open_checkout(&self, user_id: i32) -> ServiceResult<Payment> {
        let fee = crate::app_config::config().rewards.registration_fee;

        let mut conn = self.conn().await?;

        // NotFound before creating any row
        User::find_by_id(&mut conn, user_id).await?;

        let payment = Payment::create_pending(&mut conn, user_id, fee).await?;

        info!(
            payment_id = payment.id,
            user_id,
            amount = fee,
            "Checkout opened"
        );

        Ok(payment)
    }

    /// Hand a pending payment to a provider and store its transaction id.
    /// Status stays pending; the provider column marks the dispatch.
    pub async fn dispatch_to_provider(
        &self,
        payment_id: i32,
        tag: ProviderTag,
    ) -> ServiceResult<Payment> {
        let mut conn = self.conn().await?;

        let payment = Payment::find_by_id(&mut conn, payment_id).await?;
        let user = User::find_by_id(&mut conn, payment.user_id).await?;

        let provider = self.provider(tag)?;
        let external_id = provider.initiate(&payment, &user).await?;

        let payment = Payment::set_provider(&mut conn, payment_id, tag, &external_id).await?;

        info!(
            payment_id,
            provider = tag.as_str(),
            external_id = %external_id,
            "Payment dispatched to provider"
        );

        Ok(payment)
    }

    /// Apply an inbound provider confirmation. The first call flips the
    /// payment to paid, activates the payer, and settles the referral
    /// bonus; any repeat is a no-op reporting `newly_confirmed: false`.
    pub async fn confirm_payment(&self, payment_id: i32) -> ServiceResult<ConfirmationOutcome> {
        let mut conn = self.conn().await?;

        let payment = Payment::find_by_id(&mut conn, payment_id).await?;

        let outcome = conn
            .transaction::<_, ServiceError, _>(|conn| {
                async move {
                    if !Payment::mark_paid_if_pending(conn, payment.id).await? {
                        warn!(
                            payment_id = payment.id,
                            "Repeated confirmation for already-paid payment, ignoring"
                        );
                        return Ok(ConfirmationOutcome {
                            payment_id: payment.id,
                            newly_confirmed: false,
                            referrer_credited: None,
                        });
                    }

                    User::activate(conn, payment.user_id).await?;

                    let payer = User::find_by_id(conn, payment.user_id).await?;
                    let referrer_credited = match payer.referred_by.as_deref() {
                        Some(code) if !code.is_empty() => {
                            RewardService::grant_referral_bonus(conn, code).await?
                        },
                        _ => None,
                    };

                    Ok(ConfirmationOutcome {
                        payment_id: payment.id,
                        newly_confirmed: true,
                        referrer_credited,
                    })
                }
                .scope_boxed()
            })
            .await?;

        if outcome.newly_confirmed {
            info!(
                payment_id = outcome.payment_id,
                referrer_credited = ?outcome.referrer_credited,
                "Payment confirmed and user activated"
            );
        }

        Ok(outcome)
    }
}
