// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::{
    InsuranceData, MatriculaEstado, PersonaRol, SolicitudEstado, SolicitudStatus, VehiculoEstado,
    placeholder_code,
};

use super::{assert_not_found, insert_test_persona, insert_test_solicitud, new_db};
use crate::{Persistence, PersistenceError};

fn seed_owner_and_empleado(db: &mut Persistence) -> (i64, i64) {
    let owner = insert_test_persona(db, "00112345678", PersonaRol::Ciudadano, Some(10));
    let empleado = insert_test_persona(db, "00212345678", PersonaRol::Empleado, Some(20));
    (owner, empleado)
}

fn approve(db: &mut Persistence, solicitud_id: i64, codigo: &str) {
    let record = db.get_solicitud_record(solicitud_id).unwrap();
    db.issue_matricula(record.matricula.matricula_id, codigo, "2026-03-05T12:00:00Z")
        .unwrap();
    db.activate_vehiculo(record.vehiculo.vehiculo_id, record.propietario.persona_id)
        .unwrap();
    let mut solicitud = record.solicitud;
    solicitud.status = SolicitudStatus::Aprobada {
        nota_revision: String::from("ok"),
        procesada_en: String::from("2026-03-05T12:00:00Z"),
    };
    db.update_solicitud_status(&solicitud).unwrap();
}

#[test]
fn test_reserved_plate_uses_vehicle_placeholder() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);

    let (_, vehiculo_id, matricula_id) = insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    let matricula = db.get_matricula(matricula_id).unwrap().unwrap();
    assert_eq!(matricula.codigo, placeholder_code(vehiculo_id));
    assert_eq!(matricula.estado, MatriculaEstado::Pendiente);
    assert!(matricula.fecha_emision.is_none());

    let vehiculo = db.get_vehiculo(vehiculo_id).unwrap().unwrap();
    assert_eq!(vehiculo.matricula_id, Some(matricula_id));
    assert_eq!(vehiculo.estado, VehiculoEstado::Inactivo);
    assert_eq!(vehiculo.propietario_id, None);
}

#[test]
fn test_solicitud_record_joins_everything() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (solicitud_id, vehiculo_id, matricula_id) =
        insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    let record = db.get_solicitud_record(solicitud_id).unwrap();

    assert_eq!(record.solicitud.solicitud_id, solicitud_id);
    assert_eq!(record.solicitud.status, SolicitudStatus::Pendiente);
    assert!(!record.solicitud.en_cola);
    assert_eq!(record.propietario.persona_id, owner);
    assert_eq!(record.empleado.persona_id, empleado);
    assert_eq!(record.vehiculo.vehiculo_id, vehiculo_id);
    assert_eq!(record.matricula.matricula_id, matricula_id);
    assert_eq!(
        record.seguro.map(|s| s.numero_poliza),
        Some(String::from("POL-CHS10001"))
    );
    assert_eq!(record.solicitud.documentos.factura, "docs/factura.pdf");
}

#[test]
fn test_missing_solicitud_record_is_not_found() {
    let mut db = new_db();
    assert_not_found(db.get_solicitud_record(999));
    assert!(db.get_solicitud(999).unwrap().is_none());
}

#[test]
fn test_approval_round_trip_through_storage() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (solicitud_id, vehiculo_id, matricula_id) =
        insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    approve(&mut db, solicitud_id, "K000123");

    let solicitud = db.get_solicitud(solicitud_id).unwrap().unwrap();
    assert_eq!(solicitud.status.estado(), SolicitudEstado::Aprobada);
    assert_eq!(solicitud.status.procesada_en(), Some("2026-03-05T12:00:00Z"));

    let matricula = db.get_matricula(matricula_id).unwrap().unwrap();
    assert_eq!(matricula.codigo, "K000123");
    assert_eq!(matricula.estado, MatriculaEstado::Generada);

    let vehiculo = db.get_vehiculo(vehiculo_id).unwrap().unwrap();
    assert_eq!(vehiculo.estado, VehiculoEstado::Activo);
    assert_eq!(vehiculo.propietario_id, Some(owner));

    assert_eq!(db.count_active_vehicles(owner).unwrap(), 1);
    assert_eq!(db.list_issued_codes().unwrap(), vec![String::from("K000123")]);
}

#[test]
fn test_rejection_keeps_placeholder_and_cancels_plate() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (solicitud_id, vehiculo_id, matricula_id) =
        insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    db.cancel_matricula(matricula_id).unwrap();
    let mut solicitud = db.get_solicitud(solicitud_id).unwrap().unwrap();
    solicitud.status = SolicitudStatus::Rechazada {
        motivo: String::from("documentos"),
        detalle: String::from("seguro vencido"),
        procesada_en: String::from("2026-03-05T12:00:00Z"),
    };
    db.update_solicitud_status(&solicitud).unwrap();

    let stored = db.get_solicitud(solicitud_id).unwrap().unwrap();
    assert_eq!(stored.status, solicitud.status);

    let matricula = db.get_matricula(matricula_id).unwrap().unwrap();
    assert_eq!(matricula.estado, MatriculaEstado::Cancelada);
    assert_eq!(matricula.codigo, placeholder_code(vehiculo_id));
    assert_eq!(db.count_active_vehicles(owner).unwrap(), 0);
}

#[test]
fn test_issued_code_is_unique() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (first, _, _) = insert_test_solicitud(&mut db, owner, empleado, "CHS10001");
    let (_, _, second_plate) = insert_test_solicitud(&mut db, owner, empleado, "CHS10002");

    approve(&mut db, first, "K000777");

    assert!(db.plate_code_taken("K000777").unwrap());
    assert!(!db.plate_code_taken("K000778").unwrap());

    let result = db.issue_matricula(second_plate, "K000777", "2026-03-06T08:00:00Z");
    assert!(
        matches!(result, Err(PersistenceError::UniqueViolation(_))),
        "expected UniqueViolation, got {result:?}"
    );
}

#[test]
fn test_pending_placeholders_do_not_count_as_taken() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (_, vehiculo_id, _) = insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    assert!(!db.plate_code_taken(&placeholder_code(vehiculo_id)).unwrap());
}

#[test]
fn test_chasis_and_policy_usage() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    insert_test_solicitud(&mut db, owner, empleado, "CHS10001");

    assert!(db.chasis_in_use("CHS10001").unwrap());
    assert!(!db.chasis_in_use("CHS10002").unwrap());
    assert!(db.policy_in_use("POL-CHS10001").unwrap());
    assert!(!db.policy_in_use("POL-OTHER").unwrap());
}

#[test]
fn test_insurance_insert_is_active() {
    let mut db = new_db();
    db.insert_seguro(&InsuranceData {
        aseguradora_id: 4,
        numero_poliza: String::from("P-1"),
    })
    .unwrap();

    assert!(db.policy_in_use("P-1").unwrap());
}

#[test]
fn test_listing_by_owner_and_employee() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let other = insert_test_persona(&mut db, "00312345678", PersonaRol::Empleado, None);

    let (s1, _, _) = insert_test_solicitud(&mut db, owner, empleado, "CHS10001");
    let (s2, _, _) = insert_test_solicitud(&mut db, owner, other, "CHS10002");
    let (s3, _, _) = insert_test_solicitud(&mut db, owner, empleado, "CHS10003");
    approve(&mut db, s3, "K000001");
    db.update_assignment(s2, other, true).unwrap();

    let all: Vec<i64> = db
        .list_solicitudes_by_propietario(owner, None)
        .unwrap()
        .into_iter()
        .map(|s| s.solicitud_id)
        .collect();
    assert_eq!(all, vec![s3, s2, s1]);

    let pending: Vec<i64> = db
        .list_solicitudes_by_propietario(owner, Some(SolicitudEstado::Pendiente))
        .unwrap()
        .into_iter()
        .map(|s| s.solicitud_id)
        .collect();
    assert_eq!(pending, vec![s2, s1]);

    let assigned: Vec<i64> = db
        .list_solicitudes_by_empleado(empleado, None, false)
        .unwrap()
        .into_iter()
        .map(|s| s.solicitud_id)
        .collect();
    assert_eq!(assigned, vec![s1, s3]);

    let queued = db.list_solicitudes_by_empleado(other, None, true).unwrap();
    assert_eq!(queued.len(), 1);
    assert!(queued[0].en_cola);

    assert!(db.list_solicitudes_by_empleado(empleado, None, true).unwrap().is_empty());
}

#[test]
fn test_update_missing_solicitud_is_not_found() {
    let mut db = new_db();
    let (owner, empleado) = seed_owner_and_empleado(&mut db);
    let (solicitud_id, _, _) = insert_test_solicitud(&mut db, owner, empleado, "CHS10001");
    let mut solicitud = db.get_solicitud(solicitud_id).unwrap().unwrap();
    solicitud.solicitud_id = 999;

    assert_not_found(db.update_solicitud_status(&solicitud));
    assert_not_found(db.update_assignment(999, empleado, false));
}

#[test]
fn test_solicitud_rejects_unknown_persona() {
    let mut db = new_db();
    let (owner, _) = seed_owner_and_empleado(&mut db);

    let vehiculo_id = db
        .insert_vehiculo(&super::create_test_vehicle("CHS10001"), None)
        .unwrap();
    let matricula_id = db.reserve_matricula(vehiculo_id).unwrap();
    let result = db.insert_solicitud(&crate::NewSolicitud {
        propietario_id: owner,
        empleado_id: 4242,
        vehiculo_id,
        matricula_id,
        documentos: super::create_test_documents(),
        en_cola: false,
        registrada_en: String::from("2026-03-01T10:00:00Z"),
    });

    assert!(result.is_err(), "foreign key must reject unknown caseworker");
}
