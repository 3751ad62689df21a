// View database model
// One row per rewarded (user, video) pair; the unique index plus
// ON CONFLICT DO NOTHING makes duplicate claims a no-op at the database

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use crate::schema::views;
use crate::utils::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct View {
    pub id: i32,
    pub user_id: i32,
    pub video_id: i32,
    pub rewarded: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = views)]
pub struct NewView {
    pub user_id: i32,
    pub video_id: i32,
    pub rewarded: bool,
}

impl View {
    /// Conditionally record a rewarded view. Returns false when a row for
    /// this (user, video) already exists, without touching it.
    pub async fn try_record_reward(
        conn: &mut AsyncPgConnection,
        for_user_id: i32,
        for_video_id: i32,
    ) -> ServiceResult<bool> {
        use crate::schema::views::dsl::*;

        let inserted = diesel::insert_into(views)
            .values(&NewView {
                user_id: for_user_id,
                video_id: for_video_id,
                rewarded: true,
            })
            .on_conflict((user_id, video_id))
            .do_nothing()
            .execute(conn)
            .await
            .map_err(ServiceError::Database)?;

        Ok(inserted == 1)
    }

    /// Whether this user has already been rewarded for this video
    pub async fn is_rewarded(
        conn: &mut AsyncPgConnection,
        for_user_id: i32,
        for_video_id: i32,
    ) -> ServiceResult<bool> {
        use crate::schema::views::dsl::*;

        let row: Option<View> = views
            .filter(user_id.eq(for_user_id))
            .filter(video_id.eq(for_video_id))
            .first::<View>(conn)
            .await
            .optional()
            .map_err(ServiceError::Database)?;

        Ok(row.map(|v| v.rewarded).unwrap_or(false))
    }
}
