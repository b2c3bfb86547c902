// 🎫 Support Request Entity (solicitud)
//
// Three shapes of the same ticket:
// - ProposedRequest: what a caller sends, references are bare ids
// - ResolvedRequest: references loaded from the store, ready to persist
// - SupportRequest: the stored record with its assigned id

use super::client::Client;
use super::technician::Technician;
use crate::store::{EntityKind, Record};

/// Status stored when the caller sends none (or an empty string)
pub const DEFAULT_STATUS: &str = "Pendiente";

/// A request as proposed by a caller, before any reference is resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposedRequest {
    pub description: String,
    pub client_id: Option<i64>,
    pub technician_id: Option<i64>,
    pub status: Option<String>,
}

impl ProposedRequest {
    pub fn new(description: impl Into<String>, client_id: Option<i64>) -> Self {
        Self {
            description: description.into(),
            client_id,
            ..Default::default()
        }
    }

    pub fn with_technician(mut self, technician_id: i64) -> Self {
        self.technician_id = Some(technician_id);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Status to persist: the default exactly when missing or empty,
    /// any other value verbatim (no whitelist).
    pub fn effective_status(&self) -> String {
        match self.status.as_deref() {
            None | Some("") => DEFAULT_STATUS.to_string(),
            Some(status) => status.to_string(),
        }
    }
}

/// A request whose references have been loaded from the store.
///
/// `client` is optional only because the update path does not require one;
/// the store rejects a row without a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub description: String,
    pub client: Option<Client>,
    pub technician: Option<Technician>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportRequest {
    pub id: i64,
    pub description: String,
    pub client: Client,
    pub technician: Option<Technician>,
    pub status: String,
}

impl Record for SupportRequest {
    type Data = ResolvedRequest;

    const KIND: EntityKind = EntityKind::Request;

    fn id(&self) -> i64 {
        self.id
    }
}
