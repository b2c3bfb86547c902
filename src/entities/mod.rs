// Entity Models
//
// Each entity has:
// - A store-assigned integer identity that never changes
// - A `*Data` value carrying everything the caller may replace
//
// Requests reference clients and technicians by id on the way in and hold
// the fully loaded records on the way out.

pub mod client;
pub mod technician;
pub mod request;

pub use client::{Client, ClientData};
pub use technician::{Technician, TechnicianData};
pub use request::{ProposedRequest, ResolvedRequest, SupportRequest, DEFAULT_STATUS};
