// Payment database model
// A ledger entry for the registration fee. Status only ever moves
// pending -> paid; the provider column distinguishes dispatched rows.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::schema::payments;
use crate::utils::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// Payment provider tag. A freshly opened checkout carries Pending until
/// the payer picks a provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProviderTag {
    Pending,
    Orange,
    Mchain,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::Pending => "pending",
            ProviderTag::Orange => "orange",
            ProviderTag::Mchain => "mchain",
        }
    }
}

impl FromStr for ProviderTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProviderTag::Pending),
            "orange" => Ok(ProviderTag::Orange),
            "mchain" => Ok(ProviderTag::Mchain),
            _ => Err(format!("Invalid payment provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
    pub id: i32,
    pub user_id: i32,
    pub provider: String,
    pub amount: i32,
    pub status: String,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub user_id: i32,
    pub provider: String,
    pub amount: i32,
    pub status: String,
}

impl Payment {
    pub async fn find_by_id(conn: &mut AsyncPgConnection, payment_id: i32) -> ServiceResult<Self> {
        use crate::schema::payments::dsl::*;

        payments
            .filter(id.eq(payment_id))
            .first::<Payment>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("payment"),
                _ => ServiceError::Database(e),
            })
    }

    /// Open a fresh pending payment for the registration fee
    pub async fn create_pending(
        conn: &mut AsyncPgConnection,
        for_user_id: i32,
        fee: i32,
    ) -> ServiceResult<Self> {
        use crate::schema::payments::dsl::*;

        diesel::insert_into(payments)
            .values(&NewPayment {
                user_id: for_user_id,
                provider: ProviderTag::Pending.as_str().to_string(),
                amount: fee,
                status: PaymentStatus::Pending.as_str().to_string(),
            })
            .get_result::<Payment>(conn)
            .await
            .map_err(ServiceError::Database)
    }

    /// Record the chosen provider and its transaction id; status unchanged
    pub async fn set_provider(
        conn: &mut AsyncPgConnection,
        payment_id: i32,
        tag: ProviderTag,
        external: &str,
    ) -> ServiceResult<Self> {
        use crate::schema::payments::dsl::*;

        diesel::update(payments.filter(id.eq(payment_id)))
            .set((provider.eq(tag.as_str()), external_id.eq(external)))
            .get_result::<Payment>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("payment"),
                _ => ServiceError::Database(e),
            })
    }

    /// Conditional pending -> paid transition. Returns false when the row
    /// was already paid, which makes confirmation idempotent.
    pub async fn mark_paid_if_pending(
        conn: &mut AsyncPgConnection,
        payment_id: i32,
    ) -> ServiceResult<bool> {
        use crate::schema::payments::dsl::*;

        let updated = diesel::update(
            payments
                .filter(id.eq(payment_id))
                .filter(status.eq(PaymentStatus::Pending.as_str())),
        )
        .set(status.eq(PaymentStatus::Paid.as_str()))
        .execute(conn)
        .await
        .map_err(ServiceError::Database)?;

        Ok(updated == 1)
    }
}
