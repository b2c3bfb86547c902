// Request/response bodies of the HTTP API
//
// Incoming `cliente` / `tecnicoAsignado` objects only contribute their `id`;
// any other attribute a caller embeds is ignored. Incoming `id` fields are
// ignored too: the store or the path decides identity.

use serde::{Deserialize, Serialize};

use crate::entities::{Client, ClientData, ProposedRequest, SupportRequest, Technician, TechnicianData};
use crate::error::SupportError;
use crate::validation::{validate_client, validate_request, validate_technician};

// ============================================================================
// CLIENTS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ClienteBody {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub correo: String,
}

impl ClienteBody {
    pub fn into_data(self) -> Result<ClientData, SupportError> {
        let data = ClientData::new(self.nombre, self.correo);
        validate_client(&data)?;
        Ok(data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClienteDto {
    pub id: i64,
    pub nombre: String,
    pub correo: String,
}

impl From<Client> for ClienteDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            nombre: client.name,
            correo: client.email,
        }
    }
}

// ============================================================================
// TECHNICIANS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TecnicoBody {
    #[serde(default)]
    pub nombre: String,
    pub especialidad: Option<String>,
}

impl TecnicoBody {
    pub fn into_data(self) -> Result<TechnicianData, SupportError> {
        let data = TechnicianData {
            name: self.nombre,
            specialty: self.especialidad,
        };
        validate_technician(&data)?;
        Ok(data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TecnicoDto {
    pub id: i64,
    pub nombre: String,
    pub especialidad: Option<String>,
}

impl From<Technician> for TecnicoDto {
    fn from(tech: Technician) -> Self {
        Self {
            id: tech.id,
            nombre: tech.name,
            especialidad: tech.specialty,
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// `{"id": 1}`, possibly with more fields that are never trusted
#[derive(Debug, Default, Deserialize)]
pub struct Referencia {
    pub id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SolicitudBody {
    #[serde(default)]
    pub descripcion: String,
    pub cliente: Option<Referencia>,
    #[serde(rename = "tecnicoAsignado")]
    pub tecnico_asignado: Option<Referencia>,
    pub estado: Option<String>,
}

impl SolicitudBody {
    pub fn into_proposed(self) -> Result<ProposedRequest, SupportError> {
        let proposed = ProposedRequest {
            description: self.descripcion,
            client_id: self.cliente.and_then(|c| c.id),
            technician_id: self.tecnico_asignado.and_then(|t| t.id),
            status: self.estado,
        };
        validate_request(&proposed)?;
        Ok(proposed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudDto {
    pub id: i64,
    pub descripcion: String,
    pub cliente: ClienteDto,
    #[serde(rename = "tecnicoAsignado")]
    pub tecnico_asignado: Option<TecnicoDto>,
    pub estado: String,
}

impl From<SupportRequest> for SolicitudDto {
    fn from(request: SupportRequest) -> Self {
        Self {
            id: request.id,
            descripcion: request.description,
            cliente: request.client.into(),
            tecnico_asignado: request.technician.map(TecnicoDto::from),
            estado: request.status,
        }
    }
}
