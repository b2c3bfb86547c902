// Soporte Técnico - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod validation;
pub mod workflow;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use db::{setup_database, SqliteStore};
pub use entities::{
    Client, ClientData,
    Technician, TechnicianData,
    ProposedRequest, ResolvedRequest, SupportRequest, DEFAULT_STATUS,
};
pub use error::{FieldError, SupportError};
pub use registry::{ClientRegistry, Registry, TechnicianRegistry};
pub use resolver::{ReferenceResolver, StoreResolver};
pub use store::{EntityKind, Record, Repository, StoreError};
pub use workflow::RequestWorkflow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
