//! PostgreSQL-backed dashboard aggregations.
//!
//! Leaderboards and the feed join departments with `LEFT JOIN` so users
//! without one are still reported. Months are bucketed in UTC.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{KudoReportRepository, KudoReportRepositoryError};
use crate::domain::{
    ActivityFeedEntry, FeedParty, KudoId, LeaderboardEntry, MonthlyKudoCount, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ActivityRow, LeaderboardRow, MonthlyCountRow};
use super::pool::{DbPool, PoolError};

const MONTHLY_COUNTS_SQL: &str = r#"
SELECT to_char(date_trunc('month', k.created_at AT TIME ZONE 'UTC'), 'YYYY-MM') AS month,
       COUNT(*) AS count
FROM kudos k
WHERE k.created_at >= $1
GROUP BY 1
ORDER BY 1
"#;

const TOP_RECEIVERS_SQL: &str = r#"
SELECT u.id AS user_id, u.first_name, u.last_name, d.name AS department_name,
       COUNT(k.id) AS kudo_count
FROM kudos k
JOIN users u ON u.id = k.receiver_id
LEFT JOIN departments d ON d.id = u.department_id
WHERE k.created_at >= $1
GROUP BY u.id, u.first_name, u.last_name, d.name
ORDER BY kudo_count DESC, u.id ASC
LIMIT $2
"#;

const TOP_CREATORS_SQL: &str = r#"
SELECT u.id AS user_id, u.first_name, u.last_name, d.name AS department_name,
       COUNT(k.id) AS kudo_count
FROM kudos k
JOIN users u ON u.id = k.sender_id
LEFT JOIN departments d ON d.id = u.department_id
WHERE k.created_at >= $1
GROUP BY u.id, u.first_name, u.last_name, d.name
ORDER BY kudo_count DESC, u.id ASC
LIMIT $2
"#;

const RECENT_ACTIVITY_SQL: &str = r#"
SELECT k.id AS kudo_id, k.created_at, k.message,
       s.id AS sender_id, s.first_name AS sender_first_name,
       s.last_name AS sender_last_name, sd.name AS sender_department,
       r.id AS receiver_id, r.first_name AS receiver_first_name,
       r.last_name AS receiver_last_name, rd.name AS receiver_department,
       m.image_url AS meme_image_url
FROM kudos k
JOIN users s ON s.id = k.sender_id
LEFT JOIN departments sd ON sd.id = s.department_id
JOIN users r ON r.id = k.receiver_id
LEFT JOIN departments rd ON rd.id = r.department_id
LEFT JOIN memes m ON m.kudo_id = k.id
ORDER BY k.created_at DESC, k.id DESC
LIMIT $1
"#;

#[derive(Clone)]
pub struct DieselKudoReportRepository {
    pool: DbPool,
}

impl DieselKudoReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn leaderboard(
        &self,
        sql: &'static str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LeaderboardRow> = sql_query(sql)
            .bind::<Timestamptz, _>(since)
            .bind::<BigInt, _>(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(leaderboard_entry).collect())
    }
}

fn map_pool_error(error: PoolError) -> KudoReportRepositoryError {
    map_basic_pool_error(error, KudoReportRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> KudoReportRepositoryError {
    map_basic_diesel_error(
        error,
        KudoReportRepositoryError::query,
        KudoReportRepositoryError::connection,
    )
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn display_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

fn leaderboard_entry(row: LeaderboardRow) -> LeaderboardEntry {
    LeaderboardEntry {
        user_id: UserId::from_uuid(row.user_id),
        display_name: display_name(&row.first_name, &row.last_name),
        department_name: row.department_name,
        kudo_count: to_count(row.kudo_count),
    }
}

fn feed_entry(row: ActivityRow) -> ActivityFeedEntry {
    ActivityFeedEntry {
        kudo_id: KudoId::from_uuid(row.kudo_id),
        created_at: row.created_at,
        message: row.message,
        sender: FeedParty {
            user_id: UserId::from_uuid(row.sender_id),
            display_name: display_name(&row.sender_first_name, &row.sender_last_name),
            department_name: row.sender_department,
        },
        receiver: FeedParty {
            user_id: UserId::from_uuid(row.receiver_id),
            display_name: display_name(&row.receiver_first_name, &row.receiver_last_name),
            department_name: row.receiver_department,
        },
        meme_image_url: row.meme_image_url,
    }
}

#[async_trait]
impl KudoReportRepository for DieselKudoReportRepository {
    async fn monthly_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyKudoCount>, KudoReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MonthlyCountRow> = sql_query(MONTHLY_COUNTS_SQL)
            .bind::<Timestamptz, _>(since)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| MonthlyKudoCount {
                month: row.month,
                count: to_count(row.count),
            })
            .collect())
    }

    async fn top_receivers(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError> {
        self.leaderboard(TOP_RECEIVERS_SQL, since, limit).await
    }

    async fn top_creators(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, KudoReportRepositoryError> {
        self.leaderboard(TOP_CREATORS_SQL, since, limit).await
    }

    async fn recent_activity(
        &self,
        limit: u32,
    ) -> Result<Vec<ActivityFeedEntry>, KudoReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ActivityRow> = sql_query(RECENT_ACTIVITY_SQL)
            .bind::<BigInt, _>(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(feed_entry).collect())
    }
}
