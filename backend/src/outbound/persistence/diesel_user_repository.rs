//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserId, UserListing, UserProfile, UserStatus};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{departments, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`] but reports the unique email index by name.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserRepositoryError {
    if is_unique_violation(&error) {
        UserRepositoryError::duplicate_email(email)
    } else {
        map_diesel_error(error)
    }
}

fn to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_user().map_err(UserRepositoryError::query)
}

fn to_profile(row: UserRow) -> Result<UserProfile, UserRepositoryError> {
    row.into_profile().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_user)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_user)
            .transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user.email.as_str()))
    }

    async fn insert_batch(&self, batch: &[User]) -> Result<(), UserRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewUserRow<'_>> = batch.iter().map(NewUserRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&rows)
                    .execute(conn)
                    .await
                    .map(|_| ())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                UserRepositoryError::duplicate_email("one of the imported addresses")
            } else {
                map_diesel_error(err)
            }
        })
    }

    async fn list_with_departments(&self) -> Result<Vec<UserListing>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(UserRow, Option<String>)> = users::table
            .left_join(departments::table)
            .order((users::last_name.asc(), users::first_name.asc(), users::id.asc()))
            .select((UserRow::as_select(), departments::name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, department_name)| {
                Ok(UserListing {
                    profile: to_profile(row)?,
                    department_name,
                })
            })
            .collect()
    }

    async fn list_active_except(
        &self,
        excluded: &UserId,
    ) -> Result<Vec<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(
                users::status
                    .eq(UserStatus::Active.as_str())
                    .and(users::id.ne(excluded.as_uuid())),
            )
            .order((users::last_name.asc(), users::first_name.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(to_profile).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, UserRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn ordinary_write_failures_are_query_errors() {
        let mapped = map_write_error(diesel::result::Error::NotFound, "ada@example.com");
        assert!(matches!(mapped, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn corrupt_rows_surface_as_query_errors() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            department_id: None,
            email: "not-an-email".to_owned(),
            password_hash: "x".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            role: "user".to_owned(),
            status: "active".to_owned(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            created_by: None,
            updated_by: None,
        };
        assert!(matches!(
            to_user(row),
            Err(UserRepositoryError::Query { .. })
        ));
    }
}
