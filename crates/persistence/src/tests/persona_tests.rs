// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::{Cedula, PersonaEstado, PersonaRol, PersonaUpdate};

use super::{insert_test_persona, insert_test_solicitud, new_db};

#[test]
fn test_insert_and_get_persona() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "001-1234567-8", PersonaRol::Ciudadano, Some(12));

    let persona = db.get_persona(id).unwrap().unwrap();
    assert_eq!(persona.persona_id, id);
    assert_eq!(persona.nombres, "Ana");
    assert_eq!(persona.cedula.as_ref().map(Cedula::value), Some("00112345678"));
    assert_eq!(persona.rol, PersonaRol::Ciudadano);
    assert_eq!(persona.estado, PersonaEstado::Activo);
    assert_eq!(persona.cuenta_id, Some(12));
}

#[test]
fn test_find_by_cedula_and_cuenta() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, Some(12));

    let by_cedula = db.find_persona_by_cedula("00112345678").unwrap().unwrap();
    assert_eq!(by_cedula.persona_id, id);

    let by_cuenta = db.find_persona_by_cuenta(12).unwrap().unwrap();
    assert_eq!(by_cuenta.persona_id, id);

    assert!(db.find_persona_by_cedula("99999999999").unwrap().is_none());
    assert!(db.find_persona_by_cuenta(13).unwrap().is_none());
}

#[test]
fn test_disabled_personas_are_invisible_to_lookups() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, Some(12));

    db.set_persona_estado(id, PersonaEstado::Deshabilitado).unwrap();

    assert!(db.find_persona_by_cedula("00112345678").unwrap().is_none());
    assert!(db.find_persona_by_cuenta(12).unwrap().is_none());
    // Direct lookups still see the row.
    let persona = db.get_persona(id).unwrap().unwrap();
    assert_eq!(persona.estado, PersonaEstado::Deshabilitado);
}

#[test]
fn test_update_persona_only_touches_supplied_fields() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, None);

    let update = PersonaUpdate {
        telefono: Some(String::from("809-555-0101")),
        ..PersonaUpdate::default()
    };
    db.update_persona(id, &update).unwrap();

    let persona = db.get_persona(id).unwrap().unwrap();
    assert_eq!(persona.telefono.as_deref(), Some("809-555-0101"));
    assert_eq!(persona.nombres, "Ana");
    assert_eq!(persona.email.as_deref(), Some("ana@example.com"));
}

#[test]
fn test_empty_update_is_a_no_op() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, None);

    db.update_persona(id, &PersonaUpdate::default()).unwrap();

    assert_eq!(db.get_persona(id).unwrap().unwrap().nombres, "Ana");
}

#[test]
fn test_cuenta_link_can_be_moved() {
    let mut db = new_db();
    let first = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, Some(12));
    let second = insert_test_persona(&mut db, "00212345678", PersonaRol::Ciudadano, None);

    db.set_cuenta_link(first, None).unwrap();
    db.set_cuenta_link(second, Some(12)).unwrap();

    assert_eq!(db.find_persona_by_cuenta(12).unwrap().unwrap().persona_id, second);
    assert_eq!(db.get_persona(first).unwrap().unwrap().cuenta_id, None);
}

#[test]
fn test_upsert_cuenta_creates_then_refreshes() {
    let mut db = new_db();

    db.upsert_cuenta(50, "empleado1", PersonaRol::Empleado).unwrap();
    let cuenta = db.get_cuenta(50).unwrap().unwrap();
    assert_eq!(cuenta.usuario, "empleado1");
    assert_eq!(cuenta.estado, PersonaEstado::Activo);

    db.upsert_cuenta(50, "empleado1b", PersonaRol::Administrador).unwrap();
    let cuenta = db.get_cuenta(50).unwrap().unwrap();
    assert_eq!(cuenta.usuario, "empleado1b");
    assert_eq!(cuenta.rol, PersonaRol::Administrador);
}

#[test]
fn test_persona_state_is_mirrored_to_cuenta() {
    let mut db = new_db();
    db.upsert_cuenta(50, "empleado1", PersonaRol::Empleado).unwrap();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Empleado, Some(50));

    db.set_persona_estado(id, PersonaEstado::Inactivo).unwrap();

    assert_eq!(db.get_cuenta(50).unwrap().unwrap().estado, PersonaEstado::Inactivo);
}

#[test]
fn test_duplicate_usuario_is_a_unique_violation() {
    let mut db = new_db();
    db.upsert_cuenta(50, "empleado1", PersonaRol::Empleado).unwrap();

    let result = db.upsert_cuenta(51, "empleado1", PersonaRol::Empleado);

    assert!(matches!(
        result,
        Err(crate::PersistenceError::UniqueViolation(_))
    ));
}

#[test]
fn test_empleado_loads_count_pending_only() {
    let mut db = new_db();
    let owner = insert_test_persona(&mut db, "00112345678", PersonaRol::Ciudadano, None);
    let e1 = insert_test_persona(&mut db, "00212345678", PersonaRol::Empleado, None);
    let e2 = insert_test_persona(&mut db, "00312345678", PersonaRol::Empleado, None);
    let disabled = insert_test_persona(&mut db, "00412345678", PersonaRol::Empleado, None);
    db.set_persona_estado(disabled, PersonaEstado::Deshabilitado)
        .unwrap();

    insert_test_solicitud(&mut db, owner, e1, "CHS10001");
    insert_test_solicitud(&mut db, owner, e1, "CHS10002");
    let (done, _, _) = insert_test_solicitud(&mut db, owner, e2, "CHS10003");
    let mut solicitud = db.get_solicitud(done).unwrap().unwrap();
    solicitud.status = matricula_domain::SolicitudStatus::Rechazada {
        motivo: String::from("documentos"),
        detalle: String::from("factura ilegible"),
        procesada_en: String::from("2026-03-02T09:00:00Z"),
    };
    db.update_solicitud_status(&solicitud).unwrap();

    let loads = db.list_empleado_loads().unwrap();

    assert_eq!(loads.len(), 2);
    assert_eq!(loads[0].empleado_id, e1);
    assert_eq!(loads[0].pendientes, 2);
    assert_eq!(loads[1].empleado_id, e2);
    assert_eq!(loads[1].pendientes, 0);
    assert_eq!(db.count_pending_for_empleado(e1).unwrap(), 2);
    assert_eq!(db.count_pending_for_empleado(e2).unwrap(), 0);
}
