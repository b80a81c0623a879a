// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use matricula::NotificationKind;
use matricula_domain::{
    Cedula, Decision, DocumentRefs, InsuranceData, PersonaEstado, PersonaRol, WorkflowLimits,
};
use matricula_persistence::{NewPersona, Persistence};

use crate::{
    AuthenticatedActor, CreateSolicitudRequest, CreateSolicitudResponse, IdentityInput,
    NoopNotifier, NotificationEnvelope, NotificationError, Notifier, ProcessSolicitudRequest,
    Role, SolicitudView, VehicleInput, create_solicitud, process_solicitud,
};

pub const ADMIN_CUENTA: i64 = 1;
pub const CIUDADANO_CUENTA: i64 = 100;

pub fn new_db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn limits() -> WorkflowLimits {
    WorkflowLimits::default()
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(ADMIN_CUENTA, Role::Administrador)
}

pub fn create_test_ciudadano(cuenta_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(cuenta_id, Role::Ciudadano)
}

pub fn create_test_empleado_actor(cuenta_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(cuenta_id, Role::Empleado)
}

/// Inserts an active caseworker linked to `cuenta_id`.
pub fn seed_empleado(db: &mut Persistence, cedula: &str, cuenta_id: i64) -> i64 {
    db.insert_persona(&NewPersona {
        nombres: String::from("Carlos"),
        apellidos: String::from("Gómez"),
        cedula: Some(Cedula::parse(cedula).expect("valid test cedula")),
        fecha_nacimiento: None,
        telefono: None,
        email: Some(String::from("carlos@dgii.example")),
        direccion: None,
        rol: PersonaRol::Empleado,
        cuenta_id: Some(cuenta_id),
        estado: PersonaEstado::Activo,
    })
    .expect("insert caseworker")
}

pub fn create_test_identity(cedula: &str) -> IdentityInput {
    IdentityInput {
        nombres: String::from("Ana"),
        apellidos: String::from("Pérez"),
        cedula: cedula.to_string(),
        fecha_nacimiento: Some(String::from("1990-05-17")),
        telefono: Some(String::from("809-555-0101")),
        email: Some(String::from("ana@example.com")),
        direccion: None,
    }
}

pub fn create_test_request(cedula: &str, chasis: &str) -> CreateSolicitudRequest {
    CreateSolicitudRequest {
        propietario: create_test_identity(cedula),
        vehiculo: VehicleInput {
            chasis: chasis.to_string(),
            uso: String::from("privado"),
            modelo_id: 7,
            tipo_vehiculo_id: 2,
            anio: Some(2022),
            color: Some(String::from("rojo")),
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

/// Submits an application as the citizen behind `cuenta_id`.
pub fn submit(
    db: &mut Persistence,
    cuenta_id: i64,
    cedula: &str,
    chasis: &str,
) -> CreateSolicitudResponse {
    create_solicitud(
        db,
        create_test_request(cedula, chasis),
        &create_test_ciudadano(cuenta_id),
        &limits(),
        &NoopNotifier,
    )
    .expect("create solicitud")
}

pub fn approve(db: &mut Persistence, solicitud_id: i64, nota: &str) -> SolicitudView {
    process_solicitud(
        db,
        solicitud_id,
        ProcessSolicitudRequest {
            decision: Decision::Aprobar {
                nota_revision: nota.to_string(),
            },
        },
        &create_test_admin(),
        &limits(),
        &NoopNotifier,
    )
    .expect("approve solicitud")
}

/// Records every notification it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationEnvelope>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<NotificationEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<(NotificationKind, i64)> {
        self.sent()
            .into_iter()
            .map(|e| (e.kind, e.cuenta_id))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

/// Refuses every notification.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable {
            reason: String::from("mail relay offline"),
        })
    }
}
