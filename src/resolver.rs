// Reference Resolver
// Turns a bare client/technician id into the full stored record, or NotFound

use std::sync::Arc;

use crate::entities::{Client, Technician};
use crate::error::{Result, SupportError};
use crate::store::{Record, Repository};

/// Lookup capability used by the request workflow.
///
/// Never returns a partially populated record and never substitutes a default.
pub trait ReferenceResolver: Send + Sync {
    fn resolve_client(&self, id: i64) -> Result<Client>;

    fn resolve_technician(&self, id: i64) -> Result<Technician>;
}

/// Loads one record or reports `NotFound("<kind> not found for id <id>")`
pub fn resolve<T: Record>(repo: &dyn Repository<T>, id: i64) -> Result<T> {
    match repo.get(id) {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(SupportError::NotFound(T::KIND.not_found(id))),
        Err(cause) => Err(SupportError::internal(
            format!("failed to load {} {}", T::KIND.label(), id),
            cause,
        )),
    }
}

/// Resolver backed directly by the Entity Store
pub struct StoreResolver<S> {
    store: Arc<S>,
}

impl<S> StoreResolver<S>
where
    S: Repository<Client> + Repository<Technician>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> ReferenceResolver for StoreResolver<S>
where
    S: Repository<Client> + Repository<Technician>,
{
    fn resolve_client(&self, id: i64) -> Result<Client> {
        resolve::<Client>(&*self.store, id)
    }

    fn resolve_technician(&self, id: i64) -> Result<Technician> {
        resolve::<Technician>(&*self.store, id)
    }
}
