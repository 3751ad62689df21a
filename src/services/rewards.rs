// Reward engine
// One-time video-view rewards and referral bonus payouts. All credits are
// conditional database writes so concurrent duplicate requests cannot
// double-pay.

use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::info;

use crate::db::{DieselPool, PooledConn};
use crate::models::{User, Video, View};
use crate::utils::{ServiceError, ServiceResult};

pub struct RewardService {
    pool: DieselPool,
}

impl RewardService {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> ServiceResult<PooledConn<'_>> {
        self.pool
            .get()
            .await
            .map_err(|e| ServiceError::Pool(e.to_string()))
    }

    /// Grant the one-time reward for watching a video. Fails with
    /// AlreadyRewarded on a repeat claim and returns the new balance on
    /// success. Insert and credit run in one transaction; the unique index
    /// on (user_id, video_id) makes the insert the arbiter under
    /// concurrency.
    pub async fn claim_video_reward(&self, user_id: i32, video_id: i32) -> ServiceResult<i32> {
        let reward = crate::app_config::config().rewards.video_reward;

        let mut conn = self.conn().await?;

        // NotFound before any write
        Video::find_by_id(&mut conn, video_id).await?;

        let new_balance = conn
            .transaction::<_, ServiceError, _>(|conn| {
                async move {
                    if !View::try_record_reward(conn, user_id, video_id).await? {
                        return Err(ServiceError::AlreadyRewarded);
                    }

                    User::credit_balance(conn, user_id, reward).await
                }
                .scope_boxed()
            })
            .await?;

        info!(
            user_id,
            video_id, reward, new_balance, "Video reward granted"
        );

        Ok(new_balance)
    }

    /// Pay the referral bonus to whoever owns `referrer_code`, if anyone.
    /// Runs on the caller's connection so payment confirmation can include
    /// it in its transaction. Unresolvable codes are silently skipped.
    pub async fn grant_referral_bonus(
        conn: &mut AsyncPgConnection,
        referrer_code: &str,
    ) -> ServiceResult<Option<i32>> {
        let bonus = crate::app_config::config().rewards.referral_bonus;

        let referrer = match User::find_by_referral_code(conn, referrer_code).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                info!(
                    referrer_code,
                    "Referral code does not resolve to a user, no bonus paid"
                );
                return Ok(None);
            },
            Err(e) => return Err(e),
        };

        let new_balance = User::credit_balance(conn, referrer.id, bonus).await?;

        info!(
            referrer_id = referrer.id,
            bonus, new_balance, "Referral bonus paid"
        );

        Ok(Some(referrer.id))
    }
}
