use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::entities::{
    Client, ClientData, ResolvedRequest, SupportRequest, Technician, TechnicianData,
};
use crate::store::{EntityKind, Repository, StoreError};

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // SQLite leaves foreign keys off unless asked, per connection
    conn.pragma_update(None, "foreign_keys", true)?;

    // ==========================================================================
    // Clients
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS clientes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            correo TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    // ==========================================================================
    // Technicians
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tecnicos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            especialidad TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Requests (mandatory client, optional technician)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS solicitudes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            descripcion TEXT NOT NULL,
            cliente_id INTEGER NOT NULL REFERENCES clientes(id),
            tecnico_id INTEGER REFERENCES tecnicos(id),
            estado TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_solicitudes_cliente ON solicitudes(cliente_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_solicitudes_tecnico ON solicitudes(tecnico_id)",
        [],
    )?;

    Ok(())
}

/// Turns constraint failures into typed [`StoreError`]s, leaves the rest alone
fn classify(err: rusqlite::Error, what: &str) -> anyhow::Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::Duplicate(what.to_string()).into()
        }
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            StoreError::StillReferenced(what.to_string()).into()
        }
        _ => err.into(),
    }
}

fn exists_in(conn: &Connection, kind: EntityKind, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", kind.table());
    let found: bool = conn.query_row(&sql, [id], |row| row.get(0))?;
    Ok(found)
}

fn delete_from(conn: &Connection, kind: EntityKind, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    let changed = conn
        .execute(&sql, [id])
        .map_err(|e| classify(e, &format!("{} {}", kind.label(), id)))?;
    ensure_changed(changed, kind, id)
}

fn ensure_changed(changed: usize, kind: EntityKind, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(StoreError::Missing { kind, id }.into());
    }
    Ok(())
}

// ============================================================================
// CLIENTS
// ============================================================================

fn client_from_row(row: &Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

pub fn get_client(conn: &Connection, id: i64) -> Result<Option<Client>> {
    let client = conn
        .query_row(
            "SELECT id, nombre, correo FROM clientes WHERE id = ?1",
            [id],
            client_from_row,
        )
        .optional()?;

    Ok(client)
}

pub fn get_all_clients(conn: &Connection) -> Result<Vec<Client>> {
    let mut stmt = conn.prepare("SELECT id, nombre, correo FROM clientes ORDER BY id")?;

    let clients = stmt
        .query_map([], client_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(clients)
}

pub fn insert_client(conn: &Connection, data: &ClientData) -> Result<Client> {
    conn.execute(
        "INSERT INTO clientes (nombre, correo) VALUES (?1, ?2)",
        params![data.name, data.email],
    )
    .map_err(|e| classify(e, &data.email))
    .context("Failed to insert client")?;

    Ok(Client::from_data(conn.last_insert_rowid(), data.clone()))
}

pub fn replace_client(conn: &Connection, id: i64, data: &ClientData) -> Result<Client> {
    let changed = conn
        .execute(
            "UPDATE clientes SET nombre = ?1, correo = ?2 WHERE id = ?3",
            params![data.name, data.email, id],
        )
        .map_err(|e| classify(e, &data.email))
        .context("Failed to update client")?;
    ensure_changed(changed, EntityKind::Client, id)?;

    Ok(Client::from_data(id, data.clone()))
}

// ============================================================================
// TECHNICIANS
// ============================================================================

fn technician_from_row(row: &Row) -> rusqlite::Result<Technician> {
    Ok(Technician {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
    })
}

pub fn get_technician(conn: &Connection, id: i64) -> Result<Option<Technician>> {
    let technician = conn
        .query_row(
            "SELECT id, nombre, especialidad FROM tecnicos WHERE id = ?1",
            [id],
            technician_from_row,
        )
        .optional()?;

    Ok(technician)
}

pub fn get_all_technicians(conn: &Connection) -> Result<Vec<Technician>> {
    let mut stmt = conn.prepare("SELECT id, nombre, especialidad FROM tecnicos ORDER BY id")?;

    let technicians = stmt
        .query_map([], technician_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(technicians)
}

pub fn insert_technician(conn: &Connection, data: &TechnicianData) -> Result<Technician> {
    conn.execute(
        "INSERT INTO tecnicos (nombre, especialidad) VALUES (?1, ?2)",
        params![data.name, data.specialty],
    )
    .context("Failed to insert technician")?;

    Ok(Technician::from_data(conn.last_insert_rowid(), data.clone()))
}

pub fn replace_technician(conn: &Connection, id: i64, data: &TechnicianData) -> Result<Technician> {
    let changed = conn
        .execute(
            "UPDATE tecnicos SET nombre = ?1, especialidad = ?2 WHERE id = ?3",
            params![data.name, data.specialty, id],
        )
        .context("Failed to update technician")?;
    ensure_changed(changed, EntityKind::Technician, id)?;

    Ok(Technician::from_data(id, data.clone()))
}

// ============================================================================
// REQUESTS
// ============================================================================

const REQUEST_SELECT: &str = "SELECT s.id, s.descripcion, s.estado,
        c.id, c.nombre, c.correo,
        t.id, t.nombre, t.especialidad
     FROM solicitudes s
     JOIN clientes c ON c.id = s.cliente_id
     LEFT JOIN tecnicos t ON t.id = s.tecnico_id";

fn request_from_row(row: &Row) -> rusqlite::Result<SupportRequest> {
    let technician_id: Option<i64> = row.get(6)?;
    let technician = match technician_id {
        Some(id) => Some(Technician {
            id,
            name: row.get(7)?,
            specialty: row.get(8)?,
        }),
        None => None,
    };

    Ok(SupportRequest {
        id: row.get(0)?,
        description: row.get(1)?,
        status: row.get(2)?,
        client: Client {
            id: row.get(3)?,
            name: row.get(4)?,
            email: row.get(5)?,
        },
        technician,
    })
}

pub fn get_request(conn: &Connection, id: i64) -> Result<Option<SupportRequest>> {
    let sql = format!("{} WHERE s.id = ?1", REQUEST_SELECT);
    let request = conn.query_row(&sql, [id], request_from_row).optional()?;

    Ok(request)
}

pub fn get_all_requests(conn: &Connection) -> Result<Vec<SupportRequest>> {
    let sql = format!("{} ORDER BY s.id", REQUEST_SELECT);
    let mut stmt = conn.prepare(&sql)?;

    let requests = stmt
        .query_map([], request_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(requests)
}

/// Writes a resolved request and reads it back with its references joined.
///
/// A request without a client is handed to SQLite as-is; the NOT NULL
/// constraint on `cliente_id` rejects it.
pub fn save_request(conn: &Connection, id: Option<i64>, data: &ResolvedRequest) -> Result<SupportRequest> {
    let client_id = data.client.as_ref().map(|c| c.id);
    let technician_id = data.technician.as_ref().map(|t| t.id);

    let id = match id {
        None => {
            conn.execute(
                "INSERT INTO solicitudes (descripcion, cliente_id, tecnico_id, estado)
                 VALUES (?1, ?2, ?3, ?4)",
                params![data.description, client_id, technician_id, data.status],
            )
            .context("Failed to insert request")?;
            conn.last_insert_rowid()
        }
        Some(id) => {
            let changed = conn
                .execute(
                    "UPDATE solicitudes
                     SET descripcion = ?1, cliente_id = ?2, tecnico_id = ?3, estado = ?4
                     WHERE id = ?5",
                    params![data.description, client_id, technician_id, data.status, id],
                )
                .context("Failed to update request")?;
            ensure_changed(changed, EntityKind::Request, id)?;
            id
        }
    };

    get_request(conn, id)?.ok_or_else(|| anyhow!("request {} vanished after save", id))
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Entity Store over a single SQLite connection.
///
/// Calls are serialized through the mutex; each repository call is one short
/// critical section.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        debug!(path = %path.display(), "database opened");
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }

    /// Row counts for (clients, technicians, requests)
    pub fn counts(&self) -> Result<(i64, i64, i64)> {
        let conn = self.conn()?;
        let count = |kind: EntityKind| -> Result<i64> {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        };

        Ok((
            count(EntityKind::Client)?,
            count(EntityKind::Technician)?,
            count(EntityKind::Request)?,
        ))
    }
}

impl Repository<Client> for SqliteStore {
    fn get(&self, id: i64) -> Result<Option<Client>> {
        get_client(&*self.conn()?, id)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        exists_in(&*self.conn()?, EntityKind::Client, id)
    }

    fn save(&self, id: Option<i64>, data: &ClientData) -> Result<Client> {
        let conn = self.conn()?;
        match id {
            None => insert_client(&conn, data),
            Some(id) => replace_client(&conn, id, data),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        delete_from(&*self.conn()?, EntityKind::Client, id)
    }

    fn list_all(&self) -> Result<Vec<Client>> {
        get_all_clients(&*self.conn()?)
    }
}

impl Repository<Technician> for SqliteStore {
    fn get(&self, id: i64) -> Result<Option<Technician>> {
        get_technician(&*self.conn()?, id)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        exists_in(&*self.conn()?, EntityKind::Technician, id)
    }

    fn save(&self, id: Option<i64>, data: &TechnicianData) -> Result<Technician> {
        let conn = self.conn()?;
        match id {
            None => insert_technician(&conn, data),
            Some(id) => replace_technician(&conn, id, data),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        delete_from(&*self.conn()?, EntityKind::Technician, id)
    }

    fn list_all(&self) -> Result<Vec<Technician>> {
        get_all_technicians(&*self.conn()?)
    }
}

impl Repository<SupportRequest> for SqliteStore {
    fn get(&self, id: i64) -> Result<Option<SupportRequest>> {
        get_request(&*self.conn()?, id)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        exists_in(&*self.conn()?, EntityKind::Request, id)
    }

    fn save(&self, id: Option<i64>, data: &ResolvedRequest) -> Result<SupportRequest> {
        save_request(&*self.conn()?, id, data)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        delete_from(&*self.conn()?, EntityKind::Request, id)
    }

    fn list_all(&self) -> Result<Vec<SupportRequest>> {
        get_all_requests(&*self.conn()?)
    }
}
