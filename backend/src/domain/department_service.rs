//! Department administration service.
//!
//! Department names are unique ignoring case. The check runs here against
//! the full list so that it holds whatever collation the store uses; the
//! store's own unique index backs it up under concurrent writes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{DepartmentAdministration, DepartmentRepository};
use crate::domain::service_support::{
    duplicate_name_error, map_department_repository_error, validation_error,
};
use crate::domain::{
    Actor, AuditStamp, Department, DepartmentDetails, DepartmentId, DepartmentName,
    DepartmentSummary, Error, require_admin,
};

#[derive(Clone)]
pub struct DepartmentService<D> {
    departments: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<D> DepartmentService<D> {
    pub fn new(departments: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            departments,
            clock,
        }
    }
}

impl<D> DepartmentService<D>
where
    D: DepartmentRepository,
{
    fn parse_name(raw: &str) -> Result<DepartmentName, Error> {
        DepartmentName::new(raw)
            .map_err(|err| validation_error("name", "invalid_name", err.to_string()))
    }

    /// Reject `name` if another department (not `except`) already uses it.
    async fn ensure_unique(
        &self,
        name: &DepartmentName,
        except: Option<&DepartmentId>,
    ) -> Result<(), Error> {
        let existing = self
            .departments
            .list()
            .await
            .map_err(map_department_repository_error)?;
        let clash = existing
            .iter()
            .filter(|department| Some(&department.id) != except)
            .any(|department| department.name.same_name_as(name));
        if clash {
            return Err(duplicate_name_error(name.as_str()));
        }
        Ok(())
    }

    async fn load(&self, id: &DepartmentId) -> Result<Department, Error> {
        self.departments
            .find_by_id(id)
            .await
            .map_err(map_department_repository_error)?
            .ok_or_else(|| Error::not_found(format!("department {id} not found")))
    }
}

#[async_trait]
impl<D> DepartmentAdministration for DepartmentService<D>
where
    D: DepartmentRepository,
{
    async fn add_department(&self, actor: &Actor, name: &str) -> Result<Department, Error> {
        require_admin(actor)?;
        let name = Self::parse_name(name)?;
        self.ensure_unique(&name, None).await?;

        let department = Department {
            id: DepartmentId::random(),
            name,
            audit: AuditStamp::created(self.clock.utc(), Some(actor.user_id)),
        };
        self.departments
            .insert(&department)
            .await
            .map_err(map_department_repository_error)?;
        info!(department_id = %department.id, name = %department.name, "department created");
        Ok(department)
    }

    async fn edit_department(
        &self,
        actor: &Actor,
        id: &DepartmentId,
        name: &str,
    ) -> Result<Department, Error> {
        require_admin(actor)?;
        let name = Self::parse_name(name)?;
        let current = self.load(id).await?;
        self.ensure_unique(&name, Some(id)).await?;

        let updated = Department {
            id: current.id,
            name,
            audit: current.audit.touched(self.clock.utc(), Some(actor.user_id)),
        };
        self.departments
            .update(&updated)
            .await
            .map_err(map_department_repository_error)?;
        info!(department_id = %updated.id, name = %updated.name, "department renamed");
        Ok(updated)
    }

    async fn list_departments(&self, actor: &Actor) -> Result<Vec<DepartmentSummary>, Error> {
        require_admin(actor)?;
        self.departments
            .list_with_user_counts()
            .await
            .map_err(map_department_repository_error)
    }

    async fn department_details(
        &self,
        actor: &Actor,
        id: &DepartmentId,
    ) -> Result<DepartmentDetails, Error> {
        require_admin(actor)?;
        let department = self.load(id).await?;
        let members = self
            .departments
            .members(id)
            .await
            .map_err(map_department_repository_error)?;
        Ok(DepartmentDetails {
            department,
            user_count: u64::try_from(members.len()).unwrap_or(u64::MAX),
            members,
        })
    }
}

#[cfg(test)]
#[path = "department_service_tests.rs"]
mod tests;
