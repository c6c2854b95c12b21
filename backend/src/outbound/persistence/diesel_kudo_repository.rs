//! PostgreSQL-backed `KudoRepository`: kudo and meme rows in one transaction.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::Kudo;
use crate::domain::ports::{KudoRepository, KudoRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewKudoRow, NewMemeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{kudos, memes};

#[derive(Clone)]
pub struct DieselKudoRepository {
    pool: DbPool,
}

impl DieselKudoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> KudoRepositoryError {
    map_basic_pool_error(error, KudoRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> KudoRepositoryError {
    map_basic_diesel_error(
        error,
        KudoRepositoryError::query,
        KudoRepositoryError::connection,
    )
}

fn kudo_row(kudo: &Kudo) -> NewKudoRow<'_> {
    NewKudoRow {
        id: *kudo.id.as_uuid(),
        sender_id: *kudo.sender_id.as_uuid(),
        receiver_id: *kudo.receiver_id.as_uuid(),
        message: kudo.message.as_str(),
        created_at: kudo.audit.created_at,
        updated_at: kudo.audit.updated_at,
        created_by: kudo.audit.created_by.map(Uuid::from),
        updated_by: kudo.audit.updated_by.map(Uuid::from),
    }
}

fn meme_row(kudo: &Kudo) -> Option<NewMemeRow<'_>> {
    kudo.meme.as_ref().map(|meme| NewMemeRow {
        id: *meme.id.as_uuid(),
        kudo_id: *kudo.id.as_uuid(),
        template_id: meme.spec.template_id(),
        top_text: meme.spec.top_text(),
        bottom_text: meme.spec.bottom_text(),
        image_url: meme.image_url.as_str(),
        created_at: kudo.audit.created_at,
        updated_at: kudo.audit.updated_at,
        created_by: kudo.audit.created_by.map(Uuid::from),
        updated_by: kudo.audit.updated_by.map(Uuid::from),
    })
}

#[async_trait]
impl KudoRepository for DieselKudoRepository {
    async fn insert(&self, kudo: &Kudo) -> Result<(), KudoRepositoryError> {
        let kudo_row = kudo_row(kudo);
        let meme_row = meme_row(kudo);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(kudos::table)
                    .values(&kudo_row)
                    .execute(conn)
                    .await?;
                if let Some(meme_row) = meme_row {
                    diesel::insert_into(memes::table)
                        .values(&meme_row)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
