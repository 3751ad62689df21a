// Video database model
// Reward-eligible content; rows are created by an admin action and never
// change afterwards

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::schema::videos;
use crate::utils::{ServiceError, ServiceResult};

/// Hosting platform a video embeds from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VideoProvider {
    Youtube,
    Tiktok,
}

impl VideoProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::Youtube => "youtube",
            VideoProvider::Tiktok => "tiktok",
        }
    }
}

impl FromStr for VideoProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(VideoProvider::Youtube),
            "tiktok" => Ok(VideoProvider::Tiktok),
            _ => Err(format!("Invalid video provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub provider: String,
    pub embed_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = videos)]
pub struct NewVideo {
    pub title: String,
    pub provider: String,
    pub embed_url: String,
}

impl Video {
    pub async fn find_by_id(conn: &mut AsyncPgConnection, video_id: i32) -> ServiceResult<Self> {
        use crate::schema::videos::dsl::*;

        videos
            .filter(id.eq(video_id))
            .first::<Video>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ServiceError::NotFound("video"),
                _ => ServiceError::Database(e),
            })
    }

    /// All videos, most recent first
    pub async fn list_recent(conn: &mut AsyncPgConnection) -> ServiceResult<Vec<Self>> {
        use crate::schema::videos::dsl::*;

        videos
            .order(id.desc())
            .load::<Video>(conn)
            .await
            .map_err(ServiceError::Database)
    }

    pub async fn create(conn: &mut AsyncPgConnection, new_video: NewVideo) -> ServiceResult<Self> {
        use crate::schema::videos::dsl::*;

        diesel::insert_into(videos)
            .values(&new_video)
            .get_result::<Video>(conn)
            .await
            .map_err(ServiceError::Database)
    }
}
