// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persona and account mirror mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use matricula_domain::{PersonaEstado, PersonaRol, PersonaUpdate};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewPersona, PersonaChangeset};
use crate::diesel_schema::{cuentas, personas};
use crate::error::PersistenceError;

backend_fn! {
/// Creates or refreshes the local mirror of an authentication account.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if another account already
/// uses `usuario`, or an error if the write fails.
pub fn upsert_cuenta(
    conn: &mut _,
    cuenta_id: i64,
    usuario: &str,
    rol: PersonaRol,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(cuentas::table)
        .filter(cuentas::cuenta_id.eq(cuenta_id))
        .set((cuentas::usuario.eq(usuario), cuentas::rol.eq(rol.as_str())))
        .execute(conn)?;

    if updated == 0 {
        diesel::insert_into(cuentas::table)
            .values((
                cuentas::cuenta_id.eq(cuenta_id),
                cuentas::usuario.eq(usuario),
                cuentas::rol.eq(rol.as_str()),
                cuentas::estado.eq(PersonaEstado::Activo.as_str()),
            ))
            .execute(conn)?;
        info!(cuenta_id, usuario, "Account mirror created");
    } else {
        debug!(cuenta_id, usuario, "Account mirror refreshed");
    }

    Ok(())
}
}

backend_fn! {
/// Inserts a persona and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_persona(conn: &mut _, persona: &NewPersona) -> Result<i64, PersistenceError> {
    diesel::insert_into(personas::table)
        .values((
            personas::nombres.eq(&persona.nombres),
            personas::apellidos.eq(&persona.apellidos),
            personas::cedula.eq(persona.cedula.as_ref().map(|c| c.value().to_string())),
            personas::fecha_nacimiento.eq(&persona.fecha_nacimiento),
            personas::telefono.eq(&persona.telefono),
            personas::email.eq(&persona.email),
            personas::direccion.eq(&persona.direccion),
            personas::rol.eq(persona.rol.as_str()),
            personas::cuenta_id.eq(persona.cuenta_id),
            personas::estado.eq(persona.estado.as_str()),
        ))
        .execute(conn)?;

    let persona_id: i64 = conn.get_last_insert_rowid()?;

    info!(persona_id, rol = persona.rol.as_str(), "Persona created");
    Ok(persona_id)
}
}

backend_fn! {
/// Applies a partial identity update to a persona.
///
/// Fields left as `None` in the update are not touched.
///
/// # Errors
///
/// Returns an error if any update fails.
pub fn update_persona(
    conn: &mut _,
    persona_id: i64,
    update: &PersonaUpdate,
) -> Result<(), PersistenceError> {
    if update.is_empty() {
        return Ok(());
    }

    diesel::update(personas::table)
        .filter(personas::persona_id.eq(persona_id))
        .set(PersonaChangeset::from(update))
        .execute(conn)?;

    debug!(persona_id, "Persona identity fields updated");
    Ok(())
}
}

backend_fn! {
/// Links a persona to an account, or clears the link.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_cuenta_link(
    conn: &mut _,
    persona_id: i64,
    cuenta_id: Option<i64>,
) -> Result<(), PersistenceError> {
    diesel::update(personas::table)
        .filter(personas::persona_id.eq(persona_id))
        .set(personas::cuenta_id.eq(cuenta_id))
        .execute(conn)?;

    info!(persona_id, ?cuenta_id, "Persona account link changed");
    Ok(())
}
}

backend_fn! {
/// Sets a persona's state, mirroring it onto the linked account if any.
///
/// # Errors
///
/// Returns an error if an update fails.
pub fn set_persona_estado(
    conn: &mut _,
    persona_id: i64,
    estado: PersonaEstado,
) -> Result<(), PersistenceError> {
    diesel::update(personas::table)
        .filter(personas::persona_id.eq(persona_id))
        .set(personas::estado.eq(estado.as_str()))
        .execute(conn)?;

    let cuenta_id: Option<i64> = personas::table
        .filter(personas::persona_id.eq(persona_id))
        .select(personas::cuenta_id)
        .first::<Option<i64>>(conn)?;

    if let Some(cuenta_id) = cuenta_id {
        diesel::update(cuentas::table)
            .filter(cuentas::cuenta_id.eq(cuenta_id))
            .set(cuentas::estado.eq(estado.as_str()))
            .execute(conn)?;
    }

    debug!(persona_id, estado = estado.as_str(), "Persona state set");
    Ok(())
}
}

backend_fn! {
/// Sets the state of an account mirror row. A missing row is left alone.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_cuenta_estado(
    conn: &mut _,
    cuenta_id: i64,
    estado: PersonaEstado,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(cuentas::table)
        .filter(cuentas::cuenta_id.eq(cuenta_id))
        .set(cuentas::estado.eq(estado.as_str()))
        .execute(conn)?;

    debug!(cuenta_id, estado = estado.as_str(), updated, "Account state set");
    Ok(())
}
}
