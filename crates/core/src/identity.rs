// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity resolution planning.
//!
//! Given what the store knows about an account and a national ID, decides
//! which `Persona` owns an application and how links must change. The
//! persistence layer executes the plan.

use matricula_domain::{DomainError, IdentityFields, Persona, PersonaEstado, PersonaUpdate};

/// How a submitted identity maps onto stored personas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityPlan {
    /// The account's linked persona is the owner. Apply `update`.
    UseLinked {
        persona_id: i64,
        update: PersonaUpdate,
    },
    /// The account is linked to `from_persona_id`, but the submitted
    /// national ID belongs to `to_persona_id`. The account moves to the
    /// existing owner of the ID, which receives `update`. The previous
    /// persona keeps its own data.
    Relink {
        from_persona_id: i64,
        to_persona_id: i64,
        /// An account the ID's owner was linked to before, if different.
        displaced_cuenta_id: Option<i64>,
        update: PersonaUpdate,
    },
    /// A persona with the national ID exists and is not linked to this
    /// account. Link it (when an account is present) and apply `update`.
    LinkExisting {
        persona_id: i64,
        /// An account the persona was linked to before, if different.
        displaced_cuenta_id: Option<i64>,
        update: PersonaUpdate,
    },
    /// No persona matches. Create one from the submitted fields.
    Create,
}

/// Decides how to resolve an identity.
///
/// # Arguments
///
/// * `linked` - The non-disabled persona currently linked to the account, if any
/// * `by_cedula` - The non-disabled persona holding the submitted national ID, if any
/// * `fields` - The submitted identity fields
/// * `cuenta_id` - The authenticated account, if any
///
/// # Errors
///
/// Returns `DomainError::PersonaDisabled` if a disabled persona is supplied.
pub fn plan_identity(
    linked: Option<&Persona>,
    by_cedula: Option<&Persona>,
    fields: &IdentityFields,
    cuenta_id: Option<i64>,
) -> Result<IdentityPlan, DomainError> {
    for persona in linked.iter().chain(by_cedula.iter()) {
        if persona.estado == PersonaEstado::Deshabilitado {
            return Err(DomainError::PersonaDisabled(persona.persona_id));
        }
    }

    match (linked, by_cedula) {
        (Some(current), Some(owner)) if current.persona_id != owner.persona_id => {
            Ok(IdentityPlan::Relink {
                from_persona_id: current.persona_id,
                to_persona_id: owner.persona_id,
                displaced_cuenta_id: owner.cuenta_id.filter(|c| Some(*c) != cuenta_id),
                update: merge_identity(owner, fields),
            })
        }
        (Some(current), _) => Ok(IdentityPlan::UseLinked {
            persona_id: current.persona_id,
            update: merge_identity(current, fields),
        }),
        (None, Some(owner)) => Ok(IdentityPlan::LinkExisting {
            persona_id: owner.persona_id,
            displaced_cuenta_id: owner.cuenta_id.filter(|c| Some(*c) != cuenta_id),
            update: merge_identity(owner, fields),
        }),
        (None, None) => Ok(IdentityPlan::Create),
    }
}

/// Computes the non-destructive merge of submitted fields into a persona.
///
/// Only fields that were supplied and differ from the stored value appear
/// in the result, so merging the same submission twice yields an empty
/// update the second time.
#[must_use]
pub fn merge_identity(persona: &Persona, fields: &IdentityFields) -> PersonaUpdate {
    fn changed(stored: Option<&String>, submitted: Option<&String>) -> Option<String> {
        submitted.filter(|s| stored != Some(*s)).cloned()
    }

    PersonaUpdate {
        nombres: (persona.nombres != fields.nombres).then(|| fields.nombres.clone()),
        apellidos: (persona.apellidos != fields.apellidos).then(|| fields.apellidos.clone()),
        cedula: (persona.cedula.as_ref() != Some(&fields.cedula)).then(|| fields.cedula.clone()),
        fecha_nacimiento: changed(
            persona.fecha_nacimiento.as_ref(),
            fields.fecha_nacimiento.as_ref(),
        ),
        telefono: changed(persona.telefono.as_ref(), fields.telefono.as_ref()),
        email: changed(persona.email.as_ref(), fields.email.as_ref()),
        direccion: changed(persona.direccion.as_ref(), fields.direccion.as_ref()),
    }
}
