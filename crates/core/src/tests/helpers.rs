// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::{
    Cedula, DocumentRefs, IdentityFields, Persona, PersonaEstado, PersonaRol, Solicitud,
    SolicitudStatus,
};

pub fn create_test_solicitud() -> Solicitud {
    Solicitud {
        solicitud_id: 10,
        propietario_id: 1,
        empleado_id: 2,
        vehiculo_id: 3,
        matricula_id: 4,
        documentos: DocumentRefs {
            cedula: String::from("docs/cedula.pdf"),
            licencia: String::from("docs/licencia.pdf"),
            seguro: None,
            factura: String::from("docs/factura.pdf"),
        },
        en_cola: false,
        registrada_en: String::from("2026-03-01T09:00:00Z"),
        status: SolicitudStatus::Pendiente,
    }
}

pub fn create_test_persona(persona_id: i64, cedula: &str, cuenta_id: Option<i64>) -> Persona {
    Persona {
        persona_id,
        nombres: String::from("Ana"),
        apellidos: String::from("Pérez"),
        cedula: Some(Cedula::parse(cedula).unwrap()),
        fecha_nacimiento: None,
        telefono: Some(String::from("809-555-0101")),
        email: None,
        direccion: None,
        rol: PersonaRol::Ciudadano,
        cuenta_id,
        estado: PersonaEstado::Activo,
    }
}

pub fn create_test_fields(cedula: &str) -> IdentityFields {
    IdentityFields {
        nombres: String::from("Ana"),
        apellidos: String::from("Pérez"),
        cedula: Cedula::parse(cedula).unwrap(),
        fecha_nacimiento: None,
        telefono: None,
        email: None,
        direccion: None,
    }
}
