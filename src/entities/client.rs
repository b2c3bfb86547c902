// 👤 Client Entity
// A customer who files support requests. Email is unique across all clients.

use crate::store::{EntityKind, Record};

/// Replaceable values of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientData {
    /// Full name
    pub name: String,

    /// Email address (unique within the client set)
    pub email: String,
}

impl ClientData {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Client {
    pub fn from_data(id: i64, data: ClientData) -> Self {
        Client {
            id,
            name: data.name,
            email: data.email,
        }
    }
}

impl Record for Client {
    type Data = ClientData;

    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> i64 {
        self.id
    }
}
