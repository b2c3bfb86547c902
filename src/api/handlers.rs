// ============================================================================
// API Handlers
// ============================================================================
//
// Store calls are short local SQLite operations and run inline, the same way
// the connection mutex is used everywhere else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use super::dto::{ClienteBody, ClienteDto, SolicitudBody, SolicitudDto, TecnicoBody, TecnicoDto};
use super::AppState;
use crate::error::Result;

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ----------------------------------------------------------------------------
// /clientes
// ----------------------------------------------------------------------------

pub async fn create_client(
    State(state): State<AppState>,
    Json(body): Json<ClienteBody>,
) -> Result<Json<ClienteDto>> {
    let client = state.clients.create(&body.into_data()?)?;
    Ok(Json(client.into()))
}

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<ClienteDto>>> {
    let clients = state.clients.list()?;
    Ok(Json(clients.into_iter().map(ClienteDto::from).collect()))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClienteDto>> {
    Ok(Json(state.clients.get_by_id(id)?.into()))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ClienteBody>,
) -> Result<Json<ClienteDto>> {
    let client = state.clients.update(id, &body.into_data()?)?;
    Ok(Json(client.into()))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.clients.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// /tecnicos
// ----------------------------------------------------------------------------

pub async fn create_technician(
    State(state): State<AppState>,
    Json(body): Json<TecnicoBody>,
) -> Result<Json<TecnicoDto>> {
    let tech = state.technicians.create(&body.into_data()?)?;
    Ok(Json(tech.into()))
}

pub async fn list_technicians(State(state): State<AppState>) -> Result<Json<Vec<TecnicoDto>>> {
    let techs = state.technicians.list()?;
    Ok(Json(techs.into_iter().map(TecnicoDto::from).collect()))
}

pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TecnicoDto>> {
    Ok(Json(state.technicians.get_by_id(id)?.into()))
}

pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TecnicoBody>,
) -> Result<Json<TecnicoDto>> {
    let tech = state.technicians.update(id, &body.into_data()?)?;
    Ok(Json(tech.into()))
}

pub async fn delete_technician(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.technicians.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// /solicitudes
// ----------------------------------------------------------------------------

pub async fn create_request(
    State(state): State<AppState>,
    Json(body): Json<SolicitudBody>,
) -> Result<Json<SolicitudDto>> {
    let created = state.requests.create(body.into_proposed()?)?;
    Ok(Json(created.into()))
}

pub async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<SolicitudDto>>> {
    let requests = state.requests.list_all()?;
    Ok(Json(requests.into_iter().map(SolicitudDto::from).collect()))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SolicitudDto>> {
    Ok(Json(state.requests.get_by_id(id)?.into()))
}

/// PUT /solicitudes/:id - the path id wins over any id in the body
pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SolicitudBody>,
) -> Result<Json<SolicitudDto>> {
    let updated = state.requests.update(id, body.into_proposed()?)?;
    Ok(Json(updated.into()))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.requests.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
