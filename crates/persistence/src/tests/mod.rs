// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod persona_tests;
mod registro_tests;
mod transaction_tests;

use matricula_domain::{
    Cedula, Chasis, DocumentRefs, IdentityFields, InsuranceData, PersonaRol, VehicleData,
};

use crate::{NewPersona, NewSolicitud, Persistence, PersistenceError};

pub fn create_test_fields(cedula: &str) -> IdentityFields {
    IdentityFields {
        nombres: String::from("Ana"),
        apellidos: String::from("Pérez"),
        cedula: Cedula::parse(cedula).expect("valid test cedula"),
        fecha_nacimiento: Some(String::from("1990-05-17")),
        telefono: None,
        email: Some(String::from("ana@example.com")),
        direccion: None,
    }
}

pub fn create_test_vehicle(chasis: &str) -> VehicleData {
    VehicleData {
        chasis: Chasis::parse(chasis).expect("valid test chassis"),
        uso: String::from("privado"),
        modelo_id: 7,
        tipo_vehiculo_id: 2,
        anio: Some(2021),
        color: Some(String::from("azul")),
    }
}

pub fn create_test_documents() -> DocumentRefs {
    DocumentRefs {
        cedula: String::from("docs/cedula.pdf"),
        licencia: String::from("docs/licencia.pdf"),
        seguro: Some(String::from("docs/seguro.pdf")),
        factura: String::from("docs/factura.pdf"),
    }
}

pub fn insert_test_persona(
    db: &mut Persistence,
    cedula: &str,
    rol: PersonaRol,
    cuenta_id: Option<i64>,
) -> i64 {
    let persona = NewPersona::from_identity(&create_test_fields(cedula), rol, cuenta_id);
    db.insert_persona(&persona).expect("insert persona")
}

/// Stores a vehicle, its insurance, its reserved plate, and a pending
/// application. Returns `(solicitud_id, vehiculo_id, matricula_id)`.
pub fn insert_test_solicitud(
    db: &mut Persistence,
    propietario_id: i64,
    empleado_id: i64,
    chasis: &str,
) -> (i64, i64, i64) {
    let seguro_id = db
        .insert_seguro(&InsuranceData {
            aseguradora_id: 3,
            numero_poliza: format!("POL-{chasis}"),
        })
        .expect("insert seguro");
    let vehiculo_id = db
        .insert_vehiculo(&create_test_vehicle(chasis), Some(seguro_id))
        .expect("insert vehiculo");
    let matricula_id = db.reserve_matricula(vehiculo_id).expect("reserve matricula");
    let solicitud_id = db
        .insert_solicitud(&NewSolicitud {
            propietario_id,
            empleado_id,
            vehiculo_id,
            matricula_id,
            documentos: create_test_documents(),
            en_cola: false,
            registrada_en: String::from("2026-03-01T10:00:00Z"),
        })
        .expect("insert solicitud");
    (solicitud_id, vehiculo_id, matricula_id)
}

pub fn new_db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, PersistenceError>) {
    assert!(
        matches!(result, Err(PersistenceError::NotFound(_))),
        "expected NotFound, got {result:?}"
    );
}
