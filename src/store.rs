// Entity Store contract
// One typed repository per record kind; the SQLite implementation lives in db.rs

use anyhow::Result;
use thiserror::Error;

/// The three record sets the store keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Client,
    Technician,
    Request,
}

impl EntityKind {
    /// Lower-case label used in messages ("client not found for id 3")
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Technician => "technician",
            EntityKind::Request => "request",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Client => "clientes",
            EntityKind::Technician => "tecnicos",
            EntityKind::Request => "solicitudes",
        }
    }

    pub fn not_found(&self, id: i64) -> String {
        format!("{} not found for id {}", self.label(), id)
    }
}

/// A persisted record with a store-assigned identifier.
///
/// `Data` is everything except the identifier: what a caller hands to
/// [`Repository::save`].
pub trait Record: Clone + Send + Sync + 'static {
    type Data: Send + Sync;

    const KIND: EntityKind;

    fn id(&self) -> i64;
}

/// Typed access to one record set.
///
/// Identifiers are opaque to callers and assigned on the first save.
pub trait Repository<T: Record>: Send + Sync {
    fn get(&self, id: i64) -> Result<Option<T>>;

    fn exists(&self, id: i64) -> Result<bool>;

    /// Insert when `id` is `None`, full replacement of the stored row otherwise.
    fn save(&self, id: Option<i64>, data: &T::Data) -> Result<T>;

    fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Every record in store order (ascending id)
    fn list_all(&self) -> Result<Vec<T>>;
}

/// Store conditions callers may want to recover from an `anyhow::Error`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique column already holds this value
    #[error("duplicate value: {0}")]
    Duplicate(String),

    /// The row is still referenced from another table
    #[error("record still referenced: {0}")]
    StillReferenced(String),

    /// A replacement targeted a row that does not exist
    #[error("{} {} does not exist", .kind.label(), .id)]
    Missing { kind: EntityKind, id: i64 },
}

impl StoreError {
    /// Finds a typed store condition anywhere in an error chain
    pub fn find(err: &anyhow::Error) -> Option<&StoreError> {
        err.chain().find_map(|cause| cause.downcast_ref::<StoreError>())
    }
}
