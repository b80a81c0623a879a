// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::{DomainError, SolicitudEstado};

use crate::tests::helpers::{
    CIUDADANO_CUENTA, approve, create_test_admin, create_test_ciudadano,
    create_test_empleado_actor, new_db, seed_empleado, submit,
};
use crate::{
    ApiError, AuthError, EmpleadoListFilter, Role, authenticate_stub, get_solicitud,
    list_by_employee, list_by_owner, translate_domain_error,
};

#[test]
fn test_view_permissions() {
    let mut db = new_db();
    seed_empleado(&mut db, "40200000001", 200);
    seed_empleado(&mut db, "40200000002", 201);
    let created = submit(&mut db, CIUDADANO_CUENTA, "00112345678", "VIEW00001");
    submit(&mut db, 101, "00198765432", "VIEW00002");
    let id = created.solicitud_id;

    assert!(get_solicitud(&mut db, id, &create_test_ciudadano(CIUDADANO_CUENTA)).is_ok());
    assert!(get_solicitud(&mut db, id, &create_test_empleado_actor(200)).is_ok());
    assert!(get_solicitud(&mut db, id, &create_test_admin()).is_ok());

    assert!(matches!(
        get_solicitud(&mut db, id, &create_test_ciudadano(101)),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        get_solicitud(&mut db, id, &create_test_empleado_actor(201)),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_view_unknown_application() {
    let mut db = new_db();

    let result = get_solicitud(&mut db, 42, &create_test_admin());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_account_without_persona_sees_nothing() {
    let mut db = new_db();
    seed_empleado(&mut db, "40200000001", 200);
    let created = submit(&mut db, CIUDADANO_CUENTA, "00112345678", "VIEW00001");

    let result = get_solicitud(&mut db, created.solicitud_id, &create_test_ciudadano(555));

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_owner_list_newest_first_with_filter() {
    let mut db = new_db();
    seed_empleado(&mut db, "40200000001", 200);
    let first = submit(&mut db, CIUDADANO_CUENTA, "00112345678", "LIST00001");
    let second = submit(&mut db, CIUDADANO_CUENTA, "00112345678", "LIST00002");
    approve(&mut db, first.solicitud_id, "ok");
    let owner = first.solicitud.propietario.persona_id;

    let all = list_by_owner(&mut db, owner, None, &create_test_ciudadano(CIUDADANO_CUENTA))
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|v| v.solicitud_id).collect();
    assert_eq!(ids, vec![second.solicitud_id, first.solicitud_id]);

    let approved = list_by_owner(
        &mut db,
        owner,
        Some(SolicitudEstado::Aprobada),
        &create_test_empleado_actor(200),
    )
    .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].solicitud_id, first.solicitud_id);
}

#[test]
fn test_citizen_cannot_list_another_owner() {
    let mut db = new_db();
    seed_empleado(&mut db, "40200000001", 200);
    let created = submit(&mut db, CIUDADANO_CUENTA, "00112345678", "LIST00001");
    submit(&mut db, 101, "00198765432", "LIST00002");

    let result = list_by_owner(
        &mut db,
        created.solicitud.propietario.persona_id,
        None,
        &create_test_ciudadano(101),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_caseworker_list_oldest_first_and_queue_filter() {
    let mut db = new_db();
    let empleado_id = seed_empleado(&mut db, "40200000001", 200);
    let mut ids = Vec::new();
    for i in 0..6 {
        let created = submit(&mut db, CIUDADANO_CUENTA, "00112345678", &format!("QUEUE{i:04}"));
        ids.push(created.solicitud_id);
    }

    let all = list_by_employee(
        &mut db,
        empleado_id,
        EmpleadoListFilter::default(),
        &create_test_empleado_actor(200),
    )
    .unwrap();
    let listed: Vec<i64> = all.iter().map(|v| v.solicitud_id).collect();
    assert_eq!(listed, ids);

    let queued = list_by_employee(
        &mut db,
        empleado_id,
        EmpleadoListFilter {
            estado: Some(SolicitudEstado::Pendiente),
            solo_en_cola: true,
        },
        &create_test_admin(),
    )
    .unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].solicitud_id, ids[5]);
}

#[test]
fn test_only_the_caseworker_or_admin_lists_their_queue() {
    let mut db = new_db();
    let empleado_id = seed_empleado(&mut db, "40200000001", 200);
    seed_empleado(&mut db, "40200000002", 201);

    let other = list_by_employee(
        &mut db,
        empleado_id,
        EmpleadoListFilter::default(),
        &create_test_empleado_actor(201),
    );
    let citizen = list_by_employee(
        &mut db,
        empleado_id,
        EmpleadoListFilter::default(),
        &create_test_ciudadano(CIUDADANO_CUENTA),
    );

    assert!(matches!(other, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(citizen, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_authenticate_stub_rejects_non_positive_accounts() {
    assert!(matches!(
        authenticate_stub(0, Role::Ciudadano),
        Err(AuthError::AuthenticationFailed { .. })
    ));

    let actor = authenticate_stub(7, Role::Empleado).unwrap();
    assert_eq!(actor.cuenta_id, 7);
    assert!(!actor.is_admin());
}

#[test]
fn test_domain_errors_map_to_rules() {
    let cases = [
        (
            DomainError::VehicleLimitExceeded { count: 2, max: 2 },
            "vehicle_limit",
        ),
        (
            DomainError::DuplicateChasis(String::from("ABC12")),
            "unique_chasis",
        ),
        (DomainError::NoCaseworkerAvailable, "caseworker_available"),
        (DomainError::PersonaDisabled(3), "persona_enabled"),
        (
            DomainError::SolicitudNotPending {
                solicitud_id: 1,
                estado: SolicitudEstado::Rechazada,
            },
            "solicitud_pending",
        ),
    ];

    for (err, rule) in cases {
        assert_eq!(translate_domain_error(err).rule(), Some(rule));
    }

    let invalid = translate_domain_error(DomainError::MissingDocument(String::from("licencia")));
    assert!(matches!(
        invalid,
        ApiError::InvalidInput { ref field, .. } if field == "documentos.licencia"
    ));
    assert_eq!(invalid.rule(), None);
}
