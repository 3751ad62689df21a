// Identity service
// Registration, credential verification, and referral-code lookups

use tracing::info;

use crate::db::{DieselPool, PooledConn};
use crate::models::{NewUser, User};
use crate::utils::{
    generate_referral_code, hash_password, verify_password, ServiceError, ServiceResult,
};

pub struct IdentityService {
    pool: DieselPool,
}

/// Registration input after HTTP-level validation
#[derive(Debug)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub phone: String,
    /// Referral code as given by the registrant. Stored verbatim and only
    /// resolved against real users when the bonus is paid out.
    pub referred_by: Option<String>,
}

impl IdentityService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> ServiceResult<PooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| ServiceError::Pool(e.to_string()))
    }

    /// Register a new user. The account starts inactive with balance 0;
    /// activation happens only through payment confirmation.
    pub async fn register(&self, input: RegistrationInput) -> ServiceResult<User> {
        let email = input.email.trim().to_lowercase();
        let referred_by = input
            .referred_by
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let mut conn = self.conn().await?;

        if User::find_by_email(&mut conn, &email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = hash_password(&input.password)?;
        let referral_code = generate_referral_code();

        let user = User::create(
            &mut conn,
            NewUser {
                email,
                password_hash,
                phone: input.phone.trim().to_string(),
                referral_code,
                referred_by,
            },
        )
        .await?;

        info!(
            user_id = user.id,
            referral_code = %user.referral_code,
            "User registered"
        );

        Ok(user)
    }

    /// Verify credentials and return the matching user
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = email.trim().to_lowercase();

        let mut conn = self.conn().await?;

        let user = User::find_by_email(&mut conn, &email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: i32) -> ServiceResult<User> {
        let mut conn = self.conn().await?;
        User::find_by_id(&mut conn, user_id).await
    }

    /// How many registrations carry this user's referral code
    pub async fn referral_count(&self, user: &User) -> ServiceResult<i64> {
        let mut conn = self.conn().await?;
        User::count_referrals(&mut conn, &user.referral_code).await
    }
}
