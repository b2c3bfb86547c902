// 🎫 Request Workflow
//
// Validates and materializes support requests before they reach the store:
// - client reference is mandatory on create and always reloaded by id
// - technician reference is optional, resolved when given
// - status falls back to "Pendiente" when missing or empty
//
// Domain errors (InvalidInput, NotFound) pass through untouched. Anything
// else is reported as Internal with the operation that failed.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::entities::{ProposedRequest, ResolvedRequest, SupportRequest};
use crate::error::{internal, Result, SupportError};
use crate::resolver::ReferenceResolver;
use crate::store::{EntityKind, Repository, StoreError};

/// Stateless request service; every call works only on its inputs and the store.
#[derive(Clone)]
pub struct RequestWorkflow {
    requests: Arc<dyn Repository<SupportRequest>>,
    resolver: Arc<dyn ReferenceResolver>,
}

impl RequestWorkflow {
    pub fn new(
        requests: Arc<dyn Repository<SupportRequest>>,
        resolver: Arc<dyn ReferenceResolver>,
    ) -> Self {
        Self { requests, resolver }
    }

    // ========================================================================
    // CREATE
    // ========================================================================

    pub fn create(&self, proposed: ProposedRequest) -> Result<SupportRequest> {
        debug!(
            description = %proposed.description,
            client_id = ?proposed.client_id,
            technician_id = ?proposed.technician_id,
            status = ?proposed.status,
            "create request received"
        );

        let created = self
            .try_create(proposed)
            .map_err(at_boundary("failed to create request"))?;

        info!(request_id = created.id, client_id = created.client.id, "request created");
        Ok(created)
    }

    fn try_create(&self, proposed: ProposedRequest) -> Result<SupportRequest> {
        // Checked before any store access
        let Some(client_id) = proposed.client_id else {
            warn!("create request rejected: no client id");
            return Err(SupportError::InvalidInput("a client must be specified".to_string()));
        };

        let client = self.resolver.resolve_client(client_id)?;

        // No technician id means unassigned, whatever else the caller sent
        let technician = match proposed.technician_id {
            Some(technician_id) => Some(self.resolver.resolve_technician(technician_id)?),
            None => None,
        };

        let resolved = ResolvedRequest {
            status: proposed.effective_status(),
            description: proposed.description,
            client: Some(client),
            technician,
        };

        if resolved.client.is_none() {
            return Err(SupportError::InvalidInput(
                "a valid client must be associated".to_string(),
            ));
        }

        self.requests
            .save(None, &resolved)
            .map_err(internal("saving request"))
    }

    // ========================================================================
    // READ
    // ========================================================================

    pub fn get_by_id(&self, id: i64) -> Result<SupportRequest> {
        self.requests
            .get(id)
            .map_err(internal("loading request"))
            .map_err(at_boundary("failed to read request"))?
            .ok_or_else(|| SupportError::NotFound(EntityKind::Request.not_found(id)))
    }

    pub fn list_all(&self) -> Result<Vec<SupportRequest>> {
        self.requests
            .list_all()
            .map_err(internal("listing requests"))
            .map_err(at_boundary("failed to list requests"))
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// Full replacement of request `id`.
    ///
    /// Unlike create, a missing client id is not rejected here; the store
    /// refuses a request without a client. A missing technician id leaves
    /// the request unassigned.
    pub fn update(&self, id: i64, proposed: ProposedRequest) -> Result<SupportRequest> {
        debug!(
            request_id = id,
            client_id = ?proposed.client_id,
            technician_id = ?proposed.technician_id,
            "update request received"
        );

        let updated = self
            .try_update(id, proposed)
            .map_err(at_boundary("failed to update request"))?;

        info!(request_id = updated.id, status = %updated.status, "request updated");
        Ok(updated)
    }

    fn try_update(&self, id: i64, proposed: ProposedRequest) -> Result<SupportRequest> {
        self.ensure_exists(id)?;

        let client = match proposed.client_id {
            Some(client_id) => Some(self.resolver.resolve_client(client_id)?),
            None => None,
        };

        let technician = match proposed.technician_id {
            Some(technician_id) => Some(self.resolver.resolve_technician(technician_id)?),
            None => None,
        };

        let resolved = ResolvedRequest {
            status: proposed.effective_status(),
            description: proposed.description,
            client,
            technician,
        };

        // The path id always wins over anything the caller sent
        self.requests
            .save(Some(id), &resolved)
            .map_err(vanished_or_internal("saving request"))
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    pub fn delete(&self, id: i64) -> Result<()> {
        self.ensure_exists(id)
            .and_then(|_| {
                self.requests
                    .delete_by_id(id)
                    .map_err(vanished_or_internal("deleting request"))
            })
            .map_err(at_boundary("failed to delete request"))?;

        info!(request_id = id, "request deleted");
        Ok(())
    }

    fn ensure_exists(&self, id: i64) -> Result<()> {
        let exists = self
            .requests
            .exists(id)
            .map_err(internal("checking request"))?;

        if !exists {
            return Err(SupportError::NotFound(EntityKind::Request.not_found(id)));
        }
        Ok(())
    }
}

/// Like [`internal`], except a row removed after the existence check
/// is still reported as NotFound.
fn vanished_or_internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> SupportError {
    move |cause| match StoreError::find(&cause) {
        Some(StoreError::Missing { kind, id }) => SupportError::NotFound(kind.not_found(*id)),
        _ => SupportError::internal(message, cause),
    }
}

/// Reclassifies internal failures under the operation that was running.
/// Domain errors are returned unchanged.
fn at_boundary(operation: &'static str) -> impl FnOnce(SupportError) -> SupportError {
    move |err| match err {
        SupportError::Internal { message, cause } => {
            let cause = cause.context(message);
            error!(error = ?cause, "{}", operation);
            SupportError::internal(operation, cause)
        }
        domain => domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::entities::{Client, ClientData, Technician, TechnicianData};
    use crate::resolver::StoreResolver;
    use anyhow::anyhow;

    struct Fixture {
        store: Arc<SqliteStore>,
        workflow: RequestWorkflow,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(SqliteStore::open_in_memory().unwrap());
            let workflow = RequestWorkflow::new(
                store.clone(),
                Arc::new(StoreResolver::new(store.clone())),
            );
            Fixture { store, workflow }
        }

        fn client(&self, name: &str, email: &str) -> Client {
            Repository::<Client>::save(&*self.store, None, &ClientData::new(name, email))
                .unwrap()
        }

        fn technician(&self, name: &str) -> Technician {
            Repository::<Technician>::save(
                &*self.store,
                None,
                &TechnicianData::new(name, Some("Redes")),
            )
            .unwrap()
        }

        fn stored_requests(&self) -> Vec<SupportRequest> {
            Repository::<SupportRequest>::list_all(&*self.store).unwrap()
        }
    }

    /// Store double whose every call fails like an unavailable database
    struct UnavailableStore;

    impl Repository<SupportRequest> for UnavailableStore {
        fn get(&self, _id: i64) -> anyhow::Result<Option<SupportRequest>> {
            Err(anyhow!("database is locked"))
        }

        fn exists(&self, _id: i64) -> anyhow::Result<bool> {
            Err(anyhow!("database is locked"))
        }

        fn save(&self, _id: Option<i64>, _data: &ResolvedRequest) -> anyhow::Result<SupportRequest> {
            Err(anyhow!("database is locked"))
        }

        fn delete_by_id(&self, _id: i64) -> anyhow::Result<()> {
            Err(anyhow!("database is locked"))
        }

        fn list_all(&self) -> anyhow::Result<Vec<SupportRequest>> {
            Err(anyhow!("database is locked"))
        }
    }

    /// Store double where the row is seen by the existence check but is gone
    /// by the time it is written or deleted
    struct VanishingStore;

    impl Repository<SupportRequest> for VanishingStore {
        fn get(&self, _id: i64) -> anyhow::Result<Option<SupportRequest>> {
            Ok(None)
        }

        fn exists(&self, _id: i64) -> anyhow::Result<bool> {
            Ok(true)
        }

        fn save(&self, id: Option<i64>, _data: &ResolvedRequest) -> anyhow::Result<SupportRequest> {
            Err(StoreError::Missing {
                kind: EntityKind::Request,
                id: id.unwrap_or_default(),
            }
            .into())
        }

        fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
            Err(StoreError::Missing { kind: EntityKind::Request, id }.into())
        }

        fn list_all(&self) -> anyhow::Result<Vec<SupportRequest>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_create_without_client_is_invalid_input() {
        let fx = Fixture::new();
        fx.client("Juan Pérez", "juan@acme.com");

        let err = fx
            .workflow
            .create(ProposedRequest::new("No enciende", None))
            .unwrap_err();

        assert!(matches!(err, SupportError::InvalidInput(ref msg) if msg == "a client must be specified"));
        assert!(fx.stored_requests().is_empty());
    }

    #[test]
    fn test_create_with_unknown_client_is_not_found() {
        let fx = Fixture::new();

        let err = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(999)))
            .unwrap_err();

        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "client not found for id 999"));
        assert!(fx.stored_requests().is_empty());
    }

    #[test]
    fn test_create_with_unknown_technician_is_not_found() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");

        let err = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)).with_technician(42))
            .unwrap_err();

        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "technician not found for id 42"));
        assert!(fx.stored_requests().is_empty());
    }

    #[test]
    fn test_create_resolves_client_and_defaults_status() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");

        let created = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap();

        assert_eq!(created.status, "Pendiente");
        assert_eq!(created.client, client);
        assert!(created.technician.is_none());
    }

    #[test]
    fn test_create_status_defaulting() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");

        let empty = fx
            .workflow
            .create(ProposedRequest::new("a", Some(client.id)).with_status(""))
            .unwrap();
        assert_eq!(empty.status, "Pendiente");

        for status in ["En progreso", "Resuelta", "cualquier cosa"] {
            let created = fx
                .workflow
                .create(ProposedRequest::new("b", Some(client.id)).with_status(status))
                .unwrap();
            assert_eq!(created.status, status);
        }
    }

    #[test]
    fn test_create_assigns_resolved_technician() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let tech = fx.technician("Carlos López");

        let created = fx
            .workflow
            .create(ProposedRequest::new("Sin red", Some(client.id)).with_technician(tech.id))
            .unwrap();

        assert_eq!(created.technician, Some(tech));
    }

    #[test]
    fn test_get_after_create_returns_same_record() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let tech = fx.technician("Carlos López");

        let created = fx
            .workflow
            .create(
                ProposedRequest::new("Pantalla azul", Some(client.id))
                    .with_technician(tech.id)
                    .with_status("Asignada"),
            )
            .unwrap();

        assert_eq!(fx.workflow.get_by_id(created.id).unwrap(), created);
        assert_eq!(fx.workflow.list_all().unwrap(), vec![created]);
    }

    #[test]
    fn test_get_unknown_request_is_not_found() {
        let fx = Fixture::new();

        let err = fx.workflow.get_by_id(7).unwrap_err();

        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "request not found for id 7"));
        assert!(fx.workflow.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_unknown_request_is_not_found() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap();

        let err = fx
            .workflow
            .update(existing.id + 1, ProposedRequest::new("Otra", Some(client.id)))
            .unwrap_err();

        assert!(matches!(err, SupportError::NotFound(_)));
        assert_eq!(fx.stored_requests(), vec![existing]);
    }

    #[test]
    fn test_update_with_unknown_technician_leaves_record_intact() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap();

        let err = fx
            .workflow
            .update(
                existing.id,
                ProposedRequest::new("Cambiada", Some(client.id)).with_technician(42),
            )
            .unwrap_err();

        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "technician not found for id 42"));
        assert_eq!(fx.workflow.get_by_id(existing.id).unwrap(), existing);
    }

    #[test]
    fn test_update_assigns_technician_on_path_id() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        for n in 0..5 {
            fx.workflow
                .create(ProposedRequest::new(format!("Solicitud {}", n), Some(client.id)))
                .unwrap();
        }
        let mut tech = fx.technician("Técnico 1");
        for n in 2..=42 {
            tech = fx.technician(&format!("Técnico {}", n));
        }
        assert_eq!(tech.id, 42);

        let updated = fx
            .workflow
            .update(
                5,
                ProposedRequest::new("Asignada a redes", Some(client.id))
                    .with_technician(42)
                    .with_status("En progreso"),
            )
            .unwrap();

        assert_eq!(updated.id, 5);
        assert_eq!(updated.technician.map(|t| t.id), Some(42));
        assert_eq!(updated.status, "En progreso");
        assert_eq!(fx.stored_requests().len(), 5);
    }

    #[test]
    fn test_update_can_move_request_to_other_client() {
        let fx = Fixture::new();
        let juan = fx.client("Juan Pérez", "juan@acme.com");
        let ana = fx.client("Ana Díaz", "ana@acme.com");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(juan.id)))
            .unwrap();

        let updated = fx
            .workflow
            .update(existing.id, ProposedRequest::new("No enciende", Some(ana.id)))
            .unwrap();

        assert_eq!(updated.client, ana);
    }

    #[test]
    fn test_update_without_technician_unassigns() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let tech = fx.technician("Carlos López");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("Sin red", Some(client.id)).with_technician(tech.id))
            .unwrap();

        let updated = fx
            .workflow
            .update(existing.id, ProposedRequest::new("Sin red", Some(client.id)))
            .unwrap();

        assert!(updated.technician.is_none());
        assert_eq!(updated.status, "Pendiente");
    }

    #[test]
    fn test_update_without_client_is_refused_by_store() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap();

        let err = fx
            .workflow
            .update(existing.id, ProposedRequest::new("Sin cliente", None))
            .unwrap_err();

        assert!(matches!(err, SupportError::Internal { ref message, .. } if message == "failed to update request"));
        assert_eq!(fx.workflow.get_by_id(existing.id).unwrap(), existing);
    }

    #[test]
    fn test_delete() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let existing = fx
            .workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap();

        fx.workflow.delete(existing.id).unwrap();
        assert!(fx.stored_requests().is_empty());

        let err = fx.workflow.delete(existing.id).unwrap_err();
        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "request not found for id 1"));
    }

    #[test]
    fn test_store_failure_is_internal_with_cause() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let workflow = RequestWorkflow::new(
            Arc::new(UnavailableStore),
            Arc::new(StoreResolver::new(fx.store.clone())),
        );

        let err = workflow
            .create(ProposedRequest::new("No enciende", Some(client.id)))
            .unwrap_err();

        match err {
            SupportError::Internal { message, cause } => {
                assert_eq!(message, "failed to create request");
                assert!(format!("{:#}", cause).contains("database is locked"));
            }
            other => panic!("expected Internal, got {:?}", other),
        }

        assert!(matches!(workflow.list_all(), Err(SupportError::Internal { .. })));
        assert!(matches!(workflow.delete(1), Err(SupportError::Internal { .. })));
    }

    #[test]
    fn test_domain_errors_win_over_store_failure() {
        // Client check happens before the (broken) store is touched
        let fx = Fixture::new();
        let workflow = RequestWorkflow::new(
            Arc::new(UnavailableStore),
            Arc::new(StoreResolver::new(fx.store.clone())),
        );

        assert!(matches!(
            workflow.create(ProposedRequest::new("x", None)),
            Err(SupportError::InvalidInput(_))
        ));
        assert!(matches!(
            workflow.create(ProposedRequest::new("x", Some(3))),
            Err(SupportError::NotFound(_))
        ));
    }

    #[test]
    fn test_request_removed_mid_operation_is_not_found() {
        let fx = Fixture::new();
        let client = fx.client("Juan Pérez", "juan@acme.com");
        let workflow = RequestWorkflow::new(
            Arc::new(VanishingStore),
            Arc::new(StoreResolver::new(fx.store.clone())),
        );

        let err = workflow
            .update(5, ProposedRequest::new("Sin conexión", Some(client.id)))
            .unwrap_err();
        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "request not found for id 5"));

        let err = workflow.delete(5).unwrap_err();
        assert!(matches!(err, SupportError::NotFound(ref msg) if msg == "request not found for id 5"));
    }
}
