// Client & Technician Registries
// Plain CRUD over one record set: no references to resolve, just existence
// checks and store-constraint translation.

use std::sync::Arc;

use tracing::{error, info};

use crate::entities::{Client, Technician};
use crate::error::{Result, SupportError};
use crate::store::{Record, Repository, StoreError};

pub type ClientRegistry = Registry<Client>;
pub type TechnicianRegistry = Registry<Technician>;

pub struct Registry<T: Record> {
    repo: Arc<dyn Repository<T>>,
}

impl<T: Record> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<T: Record> Registry<T> {
    pub fn new(repo: Arc<dyn Repository<T>>) -> Self {
        Self { repo }
    }

    pub fn create(&self, data: &T::Data) -> Result<T> {
        let created = self
            .repo
            .save(None, data)
            .map_err(|e| self.classify("create", None, e))?;

        info!(kind = T::KIND.label(), id = created.id(), "record created");
        Ok(created)
    }

    pub fn list(&self) -> Result<Vec<T>> {
        self.repo
            .list_all()
            .map_err(|e| self.classify("list", None, e))
    }

    pub fn get_by_id(&self, id: i64) -> Result<T> {
        self.repo
            .get(id)
            .map_err(|e| self.classify("read", Some(id), e))?
            .ok_or_else(|| SupportError::NotFound(T::KIND.not_found(id)))
    }

    /// Full replacement; the path id wins
    pub fn update(&self, id: i64, data: &T::Data) -> Result<T> {
        self.ensure_exists(id)?;

        self.repo
            .save(Some(id), data)
            .map_err(|e| self.classify("update", Some(id), e))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.ensure_exists(id)?;

        self.repo
            .delete_by_id(id)
            .map_err(|e| self.classify("delete", Some(id), e))?;

        info!(kind = T::KIND.label(), id, "record deleted");
        Ok(())
    }

    fn ensure_exists(&self, id: i64) -> Result<()> {
        let exists = self
            .repo
            .exists(id)
            .map_err(|e| self.classify("read", Some(id), e))?;

        if !exists {
            return Err(SupportError::NotFound(T::KIND.not_found(id)));
        }
        Ok(())
    }

    /// Maps typed store conditions to domain errors, wraps the rest
    fn classify(&self, operation: &str, id: Option<i64>, err: anyhow::Error) -> SupportError {
        let label = T::KIND.label();

        match StoreError::find(&err) {
            Some(StoreError::Duplicate(value)) => {
                SupportError::Conflict(format!("another {} already uses {}", label, value))
            }
            Some(StoreError::StillReferenced(_)) => SupportError::Conflict(format!(
                "{} {} is still referenced by a request",
                label,
                id.unwrap_or_default()
            )),
            Some(StoreError::Missing { kind, id }) => SupportError::NotFound(kind.not_found(*id)),
            None => {
                error!(kind = label, operation, error = ?err, "store failure");
                SupportError::internal(format!("failed to {} {}", operation, label), err)
            }
        }
    }
}
