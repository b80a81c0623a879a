// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operation handlers.
//!
//! Each handler authorizes the actor, validates its input, runs the
//! workflow inside one write transaction, reads the committed view back
//! inside that same transaction, and dispatches notifications only after
//! the commit succeeded.

use matricula::{Command, TransitionResult, apply, open};
use matricula_domain::{
    DomainError, EmpleadoLoad, PersonaEstado, PersonaRol, Solicitud, SolicitudEstado,
    WorkflowLimits, evaluate_reassignment, validate_decision, validate_documents, validate_identity_fields, validate_insurance_data,
    validate_vehicle_data,
};
use matricula_persistence::{NewSolicitud, Persistence, PersistenceError};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::notifications::{NotificationEnvelope, Notifier, dispatch};
use crate::request_response::{
    AssignSolicitudRequest, CreateSolicitudRequest, CreateSolicitudResponse,
    DisablePersonaResponse, EmpleadoListFilter, EmpleadoLoadInfo, ListEmpleadoLoadsResponse,
    PersonaView, ProcessSolicitudRequest, RegisterPersonaRequest, RegisterPersonaResponse,
    SolicitudView,
};
use crate::workflow::{
    actor_persona_id, apply_effects, assign_new, build_envelopes, enforce_vehicle_capacity,
    ensure_chasis_free, ensure_policy_free, now_rfc3339, persona_not_found, resolve_identity,
    solicitud_not_found,
};

/// Submits a registration application.
///
/// Any authenticated actor may submit. A citizen's account is linked to
/// the resolved owner; caseworkers and administrators submitting on
/// someone's behalf resolve the owner by national ID alone.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The application data
/// * `authenticated_actor` - The authenticated actor submitting
/// * `limits` - Workflow limits in force
/// * `notifier` - Receives `Created` and `Assigned` after commit
///
/// # Returns
///
/// * `Ok(CreateSolicitudResponse)` on success
/// * `Err(ApiError)` if validation fails or a business rule is violated
///
/// # Errors
///
/// Returns an error if:
/// - Any identity, vehicle, insurance, or document field is invalid
/// - The owner already holds the maximum of active vehicles
/// - The chassis or policy number is already in use
/// - No caseworker exists
/// - The database operation fails
pub fn create_solicitud(
    persistence: &mut Persistence,
    request: CreateSolicitudRequest,
    authenticated_actor: &AuthenticatedActor,
    limits: &WorkflowLimits,
    notifier: &dyn Notifier,
) -> Result<CreateSolicitudResponse, ApiError> {
    let fields = request
        .propietario
        .into_fields()
        .map_err(translate_domain_error)?;
    let vehiculo = request.vehiculo.into_data().map_err(translate_domain_error)?;
    let seguro = request.seguro;
    let documentos = request.documentos;

    validate_identity_fields(&fields).map_err(translate_domain_error)?;
    validate_vehicle_data(&vehiculo).map_err(translate_domain_error)?;
    if let Some(seguro) = &seguro {
        validate_insurance_data(seguro).map_err(translate_domain_error)?;
    }
    validate_documents(&documentos, seguro.is_some()).map_err(translate_domain_error)?;

    let registrada_en: String = now_rfc3339()?;
    let cuenta_id: Option<i64> =
        (authenticated_actor.role == Role::Ciudadano).then_some(authenticated_actor.cuenta_id);

    let (view, envelopes): (SolicitudView, Vec<NotificationEnvelope>) =
        persistence.write_transaction(|db| -> Result<_, ApiError> {
            let propietario = resolve_identity(db, &fields, cuenta_id, PersonaRol::Ciudadano)?;
            enforce_vehicle_capacity(db, propietario.persona_id, limits)?;
            ensure_chasis_free(db, vehiculo.chasis.value())?;

            let seguro_id: Option<i64> = match &seguro {
                Some(seguro) => {
                    ensure_policy_free(db, &seguro.numero_poliza)?;
                    Some(db.insert_seguro(seguro)?)
                }
                None => None,
            };

            let vehiculo_id: i64 = db.insert_vehiculo(&vehiculo, seguro_id)?;
            let matricula_id: i64 = db.reserve_matricula(vehiculo_id)?;
            let assignment = assign_new(db, limits)?;

            let solicitud_id: i64 = db.insert_solicitud(&NewSolicitud {
                propietario_id: propietario.persona_id,
                empleado_id: assignment.empleado_id,
                vehiculo_id,
                matricula_id,
                documentos: documentos.clone(),
                en_cola: assignment.en_cola,
                registrada_en: registrada_en.clone(),
            })?;

            let solicitud: Solicitud = db
                .get_solicitud(solicitud_id)?
                .ok_or_else(|| solicitud_not_found(solicitud_id))?;
            let notices = apply_effects(db, open(&solicitud), limits)?;

            let record = db.get_solicitud_record(solicitud_id)?;
            let envelopes = build_envelopes(db, &notices, &record.solicitud)?;
            Ok((SolicitudView::from(&record), envelopes))
        })?;

    info!(
        solicitud_id = view.solicitud_id,
        propietario_id = view.propietario.persona_id,
        empleado_id = view.empleado.persona_id,
        en_cola = view.en_cola,
        "Solicitud created"
    );

    dispatch(notifier, &envelopes);

    Ok(CreateSolicitudResponse {
        solicitud_id: view.solicitud_id,
        codigo_matricula: view.matricula.codigo.clone(),
        registrada_en: view.registrada_en.clone(),
        empleado_id: view.empleado.persona_id,
        en_cola: view.en_cola,
        solicitud: view,
    })
}

/// Retrieves one application.
///
/// # Errors
///
/// Returns an error if the application does not exist or the actor is not
/// its owner, its caseworker, or an administrator.
pub fn get_solicitud(
    persistence: &mut Persistence,
    solicitud_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SolicitudView, ApiError> {
    let solicitud: Solicitud = persistence
        .get_solicitud(solicitud_id)?
        .ok_or_else(|| solicitud_not_found(solicitud_id))?;

    let persona_id = actor_persona_id(persistence, authenticated_actor)?;
    AuthorizationService::authorize_view_solicitud(authenticated_actor, persona_id, &solicitud)?;

    let record = persistence.get_solicitud_record(solicitud_id)?;
    Ok(SolicitudView::from(&record))
}

/// Lists an owner's applications, newest first.
///
/// # Errors
///
/// Returns an error if a citizen asks for someone else's applications or
/// the database query fails.
pub fn list_by_owner(
    persistence: &mut Persistence,
    propietario_id: i64,
    estado: Option<SolicitudEstado>,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<SolicitudView>, ApiError> {
    let persona_id = actor_persona_id(persistence, authenticated_actor)?;
    AuthorizationService::authorize_list_by_owner(authenticated_actor, persona_id, propietario_id)?;

    let solicitudes = persistence.list_solicitudes_by_propietario(propietario_id, estado)?;
    to_views(persistence, &solicitudes)
}

/// Lists a caseworker's applications, oldest first.
///
/// # Errors
///
/// Returns an error if the actor is neither the caseworker nor an
/// administrator, or the database query fails.
pub fn list_by_employee(
    persistence: &mut Persistence,
    empleado_id: i64,
    filter: EmpleadoListFilter,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<SolicitudView>, ApiError> {
    let persona_id = actor_persona_id(persistence, authenticated_actor)?;
    AuthorizationService::authorize_list_by_employee(authenticated_actor, persona_id, empleado_id)?;

    let solicitudes =
        persistence.list_solicitudes_by_empleado(empleado_id, filter.estado, filter.solo_en_cola)?;
    to_views(persistence, &solicitudes)
}

fn to_views(
    persistence: &mut Persistence,
    solicitudes: &[Solicitud],
) -> Result<Vec<SolicitudView>, ApiError> {
    solicitudes
        .iter()
        .map(|s| {
            persistence
                .get_solicitud_record(s.solicitud_id)
                .map(|record| SolicitudView::from(&record))
                .map_err(ApiError::from)
        })
        .collect()
}

/// Reassigns a pending application to a specific caseworker.
///
/// The pending cap does not block an administrator; it only decides the
/// queued flag. Both the previous and the new assignee are reconciled.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The application or target persona does not exist
/// - The target is not a caseworker or is disabled
/// - The application is no longer pending
pub fn assign_to_employee(
    persistence: &mut Persistence,
    solicitud_id: i64,
    request: AssignSolicitudRequest,
    authenticated_actor: &AuthenticatedActor,
    limits: &WorkflowLimits,
    notifier: &dyn Notifier,
) -> Result<SolicitudView, ApiError> {
    AuthorizationService::authorize_assign_solicitud(authenticated_actor)?;

    let (view, envelopes): (SolicitudView, Vec<NotificationEnvelope>) =
        persistence.write_transaction(|db| -> Result<_, ApiError> {
            let solicitud: Solicitud = db
                .get_solicitud(solicitud_id)?
                .ok_or_else(|| solicitud_not_found(solicitud_id))?;

            db.lock_empleados()?;
            let target = db
                .get_persona(request.empleado_id)?
                .ok_or_else(|| persona_not_found(request.empleado_id))?;
            if !target.is_available_caseworker() {
                return Err(translate_domain_error(DomainError::CaseworkerUnavailable(
                    target.persona_id,
                )));
            }

            let load = EmpleadoLoad {
                empleado_id: target.persona_id,
                estado: target.estado,
                pendientes: db.count_pending_for_empleado(target.persona_id)?,
            };
            let assignment = evaluate_reassignment(&load, solicitud.empleado_id, limits)
                .map_err(translate_domain_error)?;

            let result: TransitionResult = apply(&solicitud, Command::Reasignar { assignment })
                .map_err(translate_core_error)?;
            db.update_assignment(
                solicitud_id,
                result.new_state.empleado_id,
                result.new_state.en_cola,
            )?;

            let notices = apply_effects(db, result.effects, limits)?;
            let record = db.get_solicitud_record(solicitud_id)?;
            let envelopes = build_envelopes(db, &notices, &record.solicitud)?;
            Ok((SolicitudView::from(&record), envelopes))
        })?;

    info!(
        solicitud_id,
        empleado_id = view.empleado.persona_id,
        en_cola = view.en_cola,
        "Solicitud reassigned"
    );

    dispatch(notifier, &envelopes);
    Ok(view)
}

/// Approves or rejects a pending application.
///
/// Approval issues the plate's final code and activates the vehicle for
/// its owner. Rejection cancels the plate and leaves the vehicle inactive.
/// Either way the caseworker's capacity is reconciled and the owner is
/// notified after commit.
///
/// # Errors
///
/// Returns an error if:
/// - The decision is missing its note, reason, or detail
/// - The application does not exist
/// - The actor is neither its caseworker nor an administrator
/// - The application is no longer pending
/// - The database operation fails
pub fn process_solicitud(
    persistence: &mut Persistence,
    solicitud_id: i64,
    request: ProcessSolicitudRequest,
    authenticated_actor: &AuthenticatedActor,
    limits: &WorkflowLimits,
    notifier: &dyn Notifier,
) -> Result<SolicitudView, ApiError> {
    validate_decision(&request.decision).map_err(translate_domain_error)?;
    let procesada_en: String = now_rfc3339()?;
    let command: Command = Command::from_decision(request.decision, procesada_en);
    let command_name: &'static str = command.name();

    let (view, envelopes): (SolicitudView, Vec<NotificationEnvelope>) =
        persistence.write_transaction(|db| -> Result<_, ApiError> {
            let solicitud: Solicitud = db
                .get_solicitud(solicitud_id)?
                .ok_or_else(|| solicitud_not_found(solicitud_id))?;

            let persona_id = actor_persona_id(db, authenticated_actor)?;
            AuthorizationService::authorize_process_solicitud(
                authenticated_actor,
                persona_id,
                &solicitud,
            )?;

            let result: TransitionResult = apply(&solicitud, command).map_err(translate_core_error)?;
            db.update_solicitud_status(&result.new_state)?;

            let notices = apply_effects(db, result.effects, limits)?;
            let record = db.get_solicitud_record(solicitud_id)?;
            let envelopes = build_envelopes(db, &notices, &record.solicitud)?;
            Ok((SolicitudView::from(&record), envelopes))
        })?;

    info!(
        solicitud_id,
        command = command_name,
        estado = view.estado.as_str(),
        codigo = %view.matricula.codigo,
        "Solicitud processed"
    );

    dispatch(notifier, &envelopes);
    Ok(view)
}

/// Registers the persona behind an authenticated account.
///
/// Mirrors the account locally, then resolves the submitted identity the
/// same way an application does. Re-registering the same account and
/// national ID is idempotent.
///
/// # Errors
///
/// Returns an error if:
/// - Any identity field is invalid
/// - The login name belongs to another account
/// - The resolved persona is disabled
/// - The database operation fails
pub fn register_account_persona(
    persistence: &mut Persistence,
    request: RegisterPersonaRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<RegisterPersonaResponse, ApiError> {
    let fields = request
        .identidad
        .into_fields()
        .map_err(translate_domain_error)?;
    validate_identity_fields(&fields).map_err(translate_domain_error)?;
    if request.usuario.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("usuario"),
            message: String::from("Login name must not be empty"),
        });
    }

    let rol: PersonaRol = authenticated_actor.role.persona_rol();
    let cuenta_id: i64 = authenticated_actor.cuenta_id;

    let response = persistence.write_transaction(|db| -> Result<_, ApiError> {
        db.upsert_cuenta(cuenta_id, &request.usuario, rol)
            .map_err(|e| match e {
                PersistenceError::UniqueViolation(_) => ApiError::DomainRuleViolation {
                    rule: String::from("unique_usuario"),
                    message: format!("Login name '{}' is already taken", request.usuario),
                },
                other => ApiError::from(other),
            })?;

        let resolved = resolve_identity(db, &fields, Some(cuenta_id), rol)?;
        let persona = db
            .get_persona(resolved.persona_id)?
            .ok_or_else(|| persona_not_found(resolved.persona_id))?;

        Ok(RegisterPersonaResponse {
            persona: PersonaView::from(&persona),
            created: resolved.created,
        })
    })?;

    info!(
        cuenta_id,
        persona_id = response.persona.persona_id,
        created = response.created,
        "Account persona registered"
    );

    Ok(response)
}

/// Lists every non-disabled caseworker with their pending count.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the query fails.
pub fn list_empleado_loads(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    limits: &WorkflowLimits,
) -> Result<ListEmpleadoLoadsResponse, ApiError> {
    AuthorizationService::authorize_list_empleado_loads(authenticated_actor)?;

    let empleados: Vec<EmpleadoLoadInfo> = persistence
        .list_empleado_loads()?
        .into_iter()
        .map(|load| EmpleadoLoadInfo::from_load(load, limits.max_pending_per_empleado))
        .collect();

    Ok(ListEmpleadoLoadsResponse {
        max_pendientes: limits.max_pending_per_empleado,
        empleados,
    })
}

/// Soft-disables a persona.
///
/// The persona and its linked account move to `deshabilitado` and the link
/// is cleared, freeing the account and the national ID for re-resolution.
/// Applications already assigned to a disabled caseworker stay where they
/// are until an administrator reassigns them.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an administrator
/// - The persona does not exist or is already disabled
/// - The database operation fails
pub fn disable_persona(
    persistence: &mut Persistence,
    persona_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<DisablePersonaResponse, ApiError> {
    AuthorizationService::authorize_disable_persona(authenticated_actor)?;

    let response = persistence.write_transaction(|db| -> Result<_, ApiError> {
        let persona = db
            .get_persona(persona_id)?
            .ok_or_else(|| persona_not_found(persona_id))?;
        if persona.estado == PersonaEstado::Deshabilitado {
            return Err(translate_domain_error(DomainError::PersonaDisabled(
                persona_id,
            )));
        }

        let cuenta_desvinculada: Option<i64> = persona.cuenta_id;

        db.lock_personas(&[persona_id])?;
        // Mirrors onto the linked account, so it must run before unlinking.
        db.set_persona_estado(persona_id, PersonaEstado::Deshabilitado)?;
        if cuenta_desvinculada.is_some() {
            db.set_cuenta_link(persona_id, None)?;
        }

        let persona = db
            .get_persona(persona_id)?
            .ok_or_else(|| persona_not_found(persona_id))?;

        Ok(DisablePersonaResponse {
            persona: PersonaView::from(&persona),
            cuenta_desvinculada,
        })
    })?;

    info!(
        persona_id,
        cuenta_desvinculada = ?response.cuenta_desvinculada,
        "Persona disabled"
    );

    Ok(response)
}
