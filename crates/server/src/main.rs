// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod hub;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use matricula_api::{
    ApiError, AssignSolicitudRequest, CreateSolicitudRequest, CreateSolicitudResponse,
    DisablePersonaResponse, EmpleadoListFilter, ListEmpleadoLoadsResponse,
    ProcessSolicitudRequest, RegisterPersonaRequest, RegisterPersonaResponse, SolicitudView,
    assign_to_employee, create_solicitud, disable_persona, get_solicitud, list_by_employee,
    list_by_owner, list_empleado_loads, process_solicitud, register_account_persona,
};
use matricula_domain::{SolicitudEstado, WorkflowLimits};
use matricula_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::hub::NotificationHub;
use crate::session::SessionActor;

/// Matricula Server - HTTP server for the vehicle registration workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Pending applications at which a caseworker stops receiving new work
    #[arg(long, default_value_t = 5)]
    max_pending: i64,

    /// Active, plated vehicles a single owner may hold
    #[arg(long, default_value_t = 2)]
    max_vehicles: i64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer. Handlers hold the lock for one whole operation.
    persistence: Arc<Mutex<Persistence>>,
    /// Workflow limits in force.
    limits: WorkflowLimits,
    /// Receives notifications after each commit.
    hub: Arc<NotificationHub>,
}

/// Query parameters for listing an owner's applications.
#[derive(Debug, Default, Deserialize)]
struct OwnerListQuery {
    estado: Option<SolicitudEstado>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// The violated business rule, for rule violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
    /// The offending field, for invalid input.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    body: ErrorResponse,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        let (status, rule, field) = match err {
            ApiError::AuthenticationFailed { .. } => (StatusCode::UNAUTHORIZED, None, None),
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, None, None),
            ApiError::DomainRuleViolation { rule, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Some(rule), None)
            }
            ApiError::InvalidInput { field, .. } => (StatusCode::BAD_REQUEST, None, Some(field)),
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, None, None),
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
        };

        Self {
            status,
            body: ErrorResponse {
                error: true,
                message,
                rule,
                field,
            },
        }
    }
}

/// Handler for POST `/api/solicitudes`.
async fn handle_create_solicitud(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateSolicitudRequest>,
) -> Result<(StatusCode, Json<CreateSolicitudResponse>), HttpError> {
    info!(cuenta_id = actor.cuenta_id, "Handling create_solicitud request");

    let mut persistence = app_state.persistence.lock().await;
    let response = create_solicitud(
        &mut persistence,
        req,
        &actor,
        &app_state.limits,
        app_state.hub.as_ref(),
    )?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/api/solicitudes/{solicitud_id}`.
async fn handle_get_solicitud(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(solicitud_id): Path<i64>,
) -> Result<Json<SolicitudView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let view = get_solicitud(&mut persistence, solicitud_id, &actor)?;
    Ok(Json(view))
}

/// Handler for POST `/api/solicitudes/{solicitud_id}/asignacion`.
async fn handle_assign_solicitud(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(solicitud_id): Path<i64>,
    Json(req): Json<AssignSolicitudRequest>,
) -> Result<Json<SolicitudView>, HttpError> {
    info!(
        cuenta_id = actor.cuenta_id,
        solicitud_id,
        empleado_id = req.empleado_id,
        "Handling assign_to_employee request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let view = assign_to_employee(
        &mut persistence,
        solicitud_id,
        req,
        &actor,
        &app_state.limits,
        app_state.hub.as_ref(),
    )?;
    Ok(Json(view))
}

/// Handler for POST `/api/solicitudes/{solicitud_id}/procesar`.
async fn handle_process_solicitud(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(solicitud_id): Path<i64>,
    Json(req): Json<ProcessSolicitudRequest>,
) -> Result<Json<SolicitudView>, HttpError> {
    info!(
        cuenta_id = actor.cuenta_id,
        solicitud_id,
        "Handling process_solicitud request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let view = process_solicitud(
        &mut persistence,
        solicitud_id,
        req,
        &actor,
        &app_state.limits,
        app_state.hub.as_ref(),
    )?;
    Ok(Json(view))
}

/// Handler for GET `/api/propietarios/{persona_id}/solicitudes`.
async fn handle_list_by_owner(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(persona_id): Path<i64>,
    Query(query): Query<OwnerListQuery>,
) -> Result<Json<Vec<SolicitudView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let views = list_by_owner(&mut persistence, persona_id, query.estado, &actor)?;
    Ok(Json(views))
}

/// Handler for GET `/api/empleados/{persona_id}/solicitudes`.
async fn handle_list_by_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(persona_id): Path<i64>,
    Query(filter): Query<EmpleadoListFilter>,
) -> Result<Json<Vec<SolicitudView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let views = list_by_employee(&mut persistence, persona_id, filter, &actor)?;
    Ok(Json(views))
}

/// Handler for GET `/api/empleados/carga`.
async fn handle_list_empleado_loads(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListEmpleadoLoadsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = list_empleado_loads(&mut persistence, &actor, &app_state.limits)?;
    Ok(Json(response))
}

/// Handler for POST `/api/personas/registro`.
async fn handle_register_persona(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<RegisterPersonaRequest>,
) -> Result<Json<RegisterPersonaResponse>, HttpError> {
    info!(
        cuenta_id = actor.cuenta_id,
        usuario = %req.usuario,
        "Handling register_account_persona request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = register_account_persona(&mut persistence, req, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/api/personas/{persona_id}/deshabilitar`.
async fn handle_disable_persona(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(persona_id): Path<i64>,
) -> Result<Json<DisablePersonaResponse>, HttpError> {
    info!(
        cuenta_id = actor.cuenta_id,
        persona_id,
        "Handling disable_persona request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = disable_persona(&mut persistence, persona_id, &actor)?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/solicitudes", post(handle_create_solicitud))
        .route("/api/solicitudes/{solicitud_id}", get(handle_get_solicitud))
        .route(
            "/api/solicitudes/{solicitud_id}/asignacion",
            post(handle_assign_solicitud),
        )
        .route(
            "/api/solicitudes/{solicitud_id}/procesar",
            post(handle_process_solicitud),
        )
        .route(
            "/api/propietarios/{persona_id}/solicitudes",
            get(handle_list_by_owner),
        )
        .route(
            "/api/empleados/{persona_id}/solicitudes",
            get(handle_list_by_employee),
        )
        .route("/api/empleados/carga", get(handle_list_empleado_loads))
        .route("/api/personas/registro", post(handle_register_persona))
        .route(
            "/api/personas/{persona_id}/deshabilitar",
            post(handle_disable_persona),
        )
        .route("/api/notificaciones", get(hub::notifications_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Matricula Server");

    let limits: WorkflowLimits = WorkflowLimits::new(
        args.max_pending,
        args.max_vehicles,
        WorkflowLimits::default().plate_draw_attempts,
    )?;
    info!(
        max_pending = limits.max_pending_per_empleado,
        max_vehicles = limits.max_active_vehicles,
        "Workflow limits configured"
    );

    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        limits,
        hub: Arc::new(NotificationHub::new()),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
