// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod router_tests;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use matricula_api::{CreateSolicitudRequest, IdentityInput, VehicleInput};
use matricula_domain::{
    Cedula, DocumentRefs, InsuranceData, PersonaEstado, PersonaRol, WorkflowLimits,
};
use matricula_persistence::{NewPersona, Persistence};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::hub::NotificationHub;
use crate::session::{CUENTA_HEADER, ROL_HEADER};
use crate::{AppState, build_router};

pub const ADMIN: (i64, &str) = (1, "administrador");
pub const CIUDADANO: (i64, &str) = (100, "ciudadano");
pub const EMPLEADO: (i64, &str) = (200, "empleado");

/// Creates app state over a fresh in-memory database.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        limits: WorkflowLimits::default(),
        hub: Arc::new(NotificationHub::new()),
    }
}

/// Inserts an active caseworker linked to `cuenta_id`.
pub async fn seed_empleado(app_state: &AppState, cedula: &str, cuenta_id: i64) -> i64 {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .insert_persona(&NewPersona {
            nombres: String::from("Carlos"),
            apellidos: String::from("Gómez"),
            cedula: Some(Cedula::parse(cedula).unwrap()),
            fecha_nacimiento: None,
            telefono: None,
            email: None,
            direccion: None,
            rol: PersonaRol::Empleado,
            cuenta_id: Some(cuenta_id),
            estado: PersonaEstado::Activo,
        })
        .unwrap()
}

pub fn create_test_request(cedula: &str, chasis: &str) -> CreateSolicitudRequest {
    CreateSolicitudRequest {
        propietario: IdentityInput {
            nombres: String::from("Ana"),
            apellidos: String::from("Pérez"),
            cedula: cedula.to_string(),
            fecha_nacimiento: None,
            telefono: None,
            email: Some(String::from("ana@example.com")),
            direccion: None,
        },
        vehiculo: VehicleInput {
            chasis: chasis.to_string(),
            uso: String::from("privado"),
            modelo_id: 7,
            tipo_vehiculo_id: 2,
            anio: Some(2022),
            color: None,
        },
        seguro: Some(InsuranceData {
            aseguradora_id: 3,
            numero_poliza: format!("POL-{chasis}"),
        }),
        documentos: DocumentRefs {
            cedula: String::from("docs/cedula.pdf"),
            licencia: String::from("docs/licencia.pdf"),
            seguro: Some(String::from("docs/seguro.pdf")),
            factura: String::from("docs/factura.pdf"),
        },
    }
}

/// Sends a request as `actor` and returns the raw response.
pub async fn send<T: Serialize>(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<(i64, &str)>,
    body: Option<&T>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((cuenta_id, rol)) = actor {
        builder = builder
            .header(CUENTA_HEADER, cuenta_id.to_string())
            .header(ROL_HEADER, rol);
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

pub fn test_router() -> (AppState, Router) {
    let app_state = create_test_app_state();
    let app = build_router(app_state.clone());
    (app_state, app)
}
