// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use matricula_api::{
    AssignSolicitudRequest, CreateSolicitudResponse, ListEmpleadoLoadsResponse, NotificationKind,
    ProcessSolicitudRequest, SolicitudView,
};
use matricula_domain::{Decision, SolicitudEstado};

use super::{
    ADMIN, CIUDADANO, EMPLEADO, create_test_request, read_json, seed_empleado, send, test_router,
};
use crate::ErrorResponse;

const NO_BODY: Option<&()> = None;

#[tokio::test]
async fn test_citizen_creates_and_reads_application() {
    let (app_state, app) = test_router();
    seed_empleado(&app_state, "40200000001", EMPLEADO.0).await;
    let mut notifications = app_state.hub.subscribe();

    let response = send(
        &app,
        "POST",
        "/api/solicitudes",
        Some(CIUDADANO),
        Some(&create_test_request("001-1234567-8", "JH4KA7650MC000001")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreateSolicitudResponse = read_json(response).await;
    assert_eq!(created.solicitud.estado, SolicitudEstado::Pendiente);

    let first = notifications.try_recv().unwrap();
    let second = notifications.try_recv().unwrap();
    assert_eq!(
        (first.kind, first.cuenta_id),
        (NotificationKind::Created, CIUDADANO.0)
    );
    assert_eq!(
        (second.kind, second.cuenta_id),
        (NotificationKind::Assigned, EMPLEADO.0)
    );

    let uri = format!("/api/solicitudes/{}", created.solicitud_id);
    let response = send(&app, "GET", &uri, Some(CIUDADANO), NO_BODY).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: SolicitudView = read_json(response).await;
    assert_eq!(view.solicitud_id, created.solicitud_id);
}

#[tokio::test]
async fn test_missing_actor_headers_are_rejected() {
    let (_app_state, app) = test_router();

    let response = send(&app, "GET", "/api/solicitudes/1", None, NO_BODY).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let (_app_state, app) = test_router();

    let response = send(&app, "GET", "/api/solicitudes/1", Some((5, "operador")), NO_BODY).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_input_maps_to_bad_request() {
    let (app_state, app) = test_router();
    seed_empleado(&app_state, "40200000001", EMPLEADO.0).await;

    let response = send(
        &app,
        "POST",
        "/api/solicitudes",
        Some(CIUDADANO),
        Some(&create_test_request("12", "JH4KA7650MC000001")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.error);
    assert_eq!(error.field.as_deref(), Some("cedula"));
}

#[tokio::test]
async fn test_rule_violation_maps_to_unprocessable_entity() {
    let (_app_state, app) = test_router();

    let response = send(
        &app,
        "POST",
        "/api/solicitudes",
        Some(CIUDADANO),
        Some(&create_test_request("00112345678", "JH4KA7650MC000001")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.rule.as_deref(), Some("caseworker_available"));
}

#[tokio::test]
async fn test_unknown_application_maps_to_not_found() {
    let (_app_state, app) = test_router();

    let response = send(&app, "GET", "/api/solicitudes/77", Some(ADMIN), NO_BODY).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_process_flow_over_http() {
    let (app_state, app) = test_router();
    seed_empleado(&app_state, "40200000001", EMPLEADO.0).await;

    let response = send(
        &app,
        "POST",
        "/api/solicitudes",
        Some(CIUDADANO),
        Some(&create_test_request("00112345678", "JH4KA7650MC000001")),
    )
    .await;
    let created: CreateSolicitudResponse = read_json(response).await;
    let uri = format!("/api/solicitudes/{}/procesar", created.solicitud_id);
    let approval = ProcessSolicitudRequest {
        decision: Decision::Aprobar {
            nota_revision: String::from("Documentos completos"),
        },
    };

    let forbidden = send(&app, "POST", &uri, Some(CIUDADANO), Some(&approval)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "POST", &uri, Some(EMPLEADO), Some(&approval)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: SolicitudView = read_json(response).await;
    assert_eq!(view.estado, SolicitudEstado::Aprobada);
    assert_eq!(view.matricula.estado, "generada");

    let again = send(&app, "POST", &uri, Some(EMPLEADO), Some(&approval)).await;
    assert_eq!(again.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_reassigns_and_lists_loads() {
    let (app_state, app) = test_router();
    seed_empleado(&app_state, "40200000001", EMPLEADO.0).await;
    let other = seed_empleado(&app_state, "40200000002", 201).await;

    let response = send(
        &app,
        "POST",
        "/api/solicitudes",
        Some(CIUDADANO),
        Some(&create_test_request("00112345678", "JH4KA7650MC000001")),
    )
    .await;
    let created: CreateSolicitudResponse = read_json(response).await;

    let uri = format!("/api/solicitudes/{}/asignacion", created.solicitud_id);
    let request = AssignSolicitudRequest { empleado_id: other };
    let response = send(&app, "POST", &uri, Some(ADMIN), Some(&request)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: SolicitudView = read_json(response).await;
    assert_eq!(view.empleado.persona_id, other);

    let response = send(&app, "GET", "/api/empleados/carga", Some(ADMIN), NO_BODY).await;
    assert_eq!(response.status(), StatusCode::OK);
    let loads: ListEmpleadoLoadsResponse = read_json(response).await;
    let moved = loads
        .empleados
        .iter()
        .find(|e| e.empleado_id == other)
        .unwrap();
    assert_eq!(moved.pendientes, 1);

    let denied = send(&app, "GET", "/api/empleados/carga", Some(EMPLEADO), NO_BODY).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_caseworker_queue_filter_from_query_string() {
    let (app_state, app) = test_router();
    let empleado_id = seed_empleado(&app_state, "40200000001", EMPLEADO.0).await;

    for i in 0..6 {
        let response = send(
            &app,
            "POST",
            "/api/solicitudes",
            Some(CIUDADANO),
            Some(&create_test_request("00112345678", &format!("QUEUE{i:04}"))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let uri = format!("/api/empleados/{empleado_id}/solicitudes?estado=pendiente&solo_en_cola=true");
    let response = send(&app, "GET", &uri, Some(EMPLEADO), NO_BODY).await;
    assert_eq!(response.status(), StatusCode::OK);
    let queued: Vec<SolicitudView> = read_json(response).await;
    assert_eq!(queued.len(), 1);
    assert!(queued[0].en_cola);
}
