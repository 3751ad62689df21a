// User database model
// Identity plus ledger balance; the balance only ever increases through
// reward credits

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use crate::schema::users;
use crate::utils::{ServiceError, ServiceResult};

/// User database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub balance: i32,
    pub is_active: bool,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New user for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(conn: &mut AsyncPgConnection, user_id: i32) -> ServiceResult<Self> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("user"),
                _ => ServiceError::Database(e),
            })
    }

    /// Find user by email; callers lower-case before lookup since emails
    /// are stored lower-cased
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> ServiceResult<Option<Self>> {
        use crate::schema::users::dsl::*;

        users
            .filter(email.eq(email_str))
            .first::<User>(conn)
            .await
            .optional()
            .map_err(ServiceError::Database)
    }

    /// Find the user owning a referral code
    pub async fn find_by_referral_code(
        conn: &mut AsyncPgConnection,
        code: &str,
    ) -> ServiceResult<Self> {
        use crate::schema::users::dsl::*;

        users
            .filter(referral_code.eq(code))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("user"),
                _ => ServiceError::Database(e),
            })
    }

    /// Create a new user; a racing duplicate insert surfaces as
    /// DuplicateEmail through the unique constraint
    pub async fn create(conn: &mut AsyncPgConnection, new_user: NewUser) -> ServiceResult<Self> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(&new_user)
            .get_result::<User>(conn)
            .await
            .map_err(|e| match &e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    info,
                ) if info.constraint_name() == Some("users_email_key") => {
                    ServiceError::DuplicateEmail
                },
                _ => ServiceError::Database(e),
            })
    }

    /// Mark a user active (payment confirmed)
    pub async fn activate(conn: &mut AsyncPgConnection, user_id: i32) -> ServiceResult<()> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(is_active.eq(true))
            .execute(conn)
            .await
            .map_err(ServiceError::Database)?;

        Ok(())
    }

    /// Atomically credit a user's balance, returning the new balance
    pub async fn credit_balance(
        conn: &mut AsyncPgConnection,
        user_id: i32,
        amount: i32,
    ) -> ServiceResult<i32> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(balance.eq(balance + amount))
            .returning(balance)
            .get_result::<i32>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("user"),
                _ => ServiceError::Database(e),
            })
    }

    /// Number of users registered with this user's referral code
    pub async fn count_referrals(conn: &mut AsyncPgConnection, code: &str) -> ServiceResult<i64> {
        use crate::schema::users::dsl::*;

        users
            .filter(referred_by.eq(code))
            .count()
            .get_result::<i64>(conn)
            .await
            .map_err(ServiceError::Database)
    }
}
