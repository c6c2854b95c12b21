//! PostgreSQL-backed `DepartmentRepository` implementation using Diesel ORM.
//!
//! The `departments_name_lower_key` index enforces case-insensitive name
//! uniqueness; violations surface as `DuplicateName`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};
use crate::domain::{Department, DepartmentId, DepartmentSummary, UserProfile};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DepartmentRow, DepartmentUpdate, NewDepartmentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{departments, users};

#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DepartmentRepositoryError {
    map_basic_pool_error(error, DepartmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DepartmentRepositoryError {
    map_basic_diesel_error(
        error,
        DepartmentRepositoryError::query,
        DepartmentRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, name: &str) -> DepartmentRepositoryError {
    if is_unique_violation(&error) {
        DepartmentRepositoryError::duplicate_name(name)
    } else {
        map_diesel_error(error)
    }
}

fn to_department(row: DepartmentRow) -> Result<Department, DepartmentRepositoryError> {
    row.into_department()
        .map_err(DepartmentRepositoryError::query)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .order((departments::name.asc(), departments::id.asc()))
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_department).collect()
    }

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        departments::table
            .filter(departments::id.eq(id.as_uuid()))
            .select(DepartmentRow::as_select())
            .first::<DepartmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_department)
            .transpose()
    }

    async fn find_by_exact_name(
        &self,
        name: &str,
    ) -> Result<Option<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        departments::table
            .filter(departments::name.eq(name))
            .select(DepartmentRow::as_select())
            .first::<DepartmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_department)
            .transpose()
    }

    async fn insert(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(departments::table)
            .values(NewDepartmentRow::from(department))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, department.name.as_str()))
    }

    async fn update(&self, department: &Department) -> Result<(), DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DepartmentUpdate {
            name: department.name.as_str(),
            updated_at: department.audit.updated_at,
            updated_by: department.audit.updated_by.map(Uuid::from),
        };
        let affected = diesel::update(departments::table.find(department.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, department.name.as_str()))?;
        if affected == 0 {
            return Err(DepartmentRepositoryError::not_found(
                department.id.to_string(),
            ));
        }
        Ok(())
    }

    async fn list_with_user_counts(
        &self,
    ) -> Result<Vec<DepartmentSummary>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .order((departments::name.asc(), departments::id.asc()))
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let counts: HashMap<Uuid, i64> = users::table
            .filter(users::department_id.is_not_null())
            .group_by(users::department_id)
            .select((users::department_id, count_star()))
            .load::<(Option<Uuid>, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect();

        rows.into_iter()
            .map(|row| {
                let user_count = counts.get(&row.id).copied().map_or(0, to_count);
                Ok(DepartmentSummary {
                    department: to_department(row)?,
                    user_count,
                })
            })
            .collect()
    }

    async fn members(
        &self,
        id: &DepartmentId,
    ) -> Result<Vec<UserProfile>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::department_id.eq(id.as_uuid()))
            .order((users::last_name.asc(), users::first_name.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_profile().map_err(DepartmentRepositoryError::query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(mapped, DepartmentRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case(-3, 0)]
    #[case(0, 0)]
    #[case(7, 7)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(to_count(raw), expected);
    }
}
