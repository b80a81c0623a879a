// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Cedula, PersonaEstado, PersonaRol};
use serde::{Deserialize, Serialize};

/// An identity record, citizen or caseworker.
///
/// A `Persona` is distinct from the authentication account; the two are
/// linked 1:1 through `cuenta_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// The canonical identifier assigned by the database.
    pub persona_id: i64,
    /// Given names.
    pub nombres: String,
    /// Family names.
    pub apellidos: String,
    /// National ID. Only transiently absent.
    pub cedula: Option<Cedula>,
    /// Birth date (ISO 8601), if known.
    pub fecha_nacimiento: Option<String>,
    /// Contact phone, if known.
    pub telefono: Option<String>,
    /// Contact email, if known.
    pub email: Option<String>,
    /// Postal address, if known.
    pub direccion: Option<String>,
    /// Role category.
    pub rol: PersonaRol,
    /// The linked account, if any.
    pub cuenta_id: Option<i64>,
    /// Lifecycle state.
    pub estado: PersonaEstado,
}

impl Persona {
    /// Returns true if this persona is a caseworker that has not been disabled.
    #[must_use]
    pub fn is_available_caseworker(&self) -> bool {
        self.rol == PersonaRol::Empleado && self.estado != PersonaEstado::Deshabilitado
    }
}

/// Identity fields submitted with an application or account registration.
///
/// Names and cédula are always supplied. The remaining fields are merged
/// non-destructively: `None` means "not supplied", never "clear".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFields {
    /// Given names.
    pub nombres: String,
    /// Family names.
    pub apellidos: String,
    /// National ID.
    pub cedula: Cedula,
    /// Birth date (ISO 8601).
    pub fecha_nacimiento: Option<String>,
    /// Contact phone.
    pub telefono: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal address.
    pub direccion: Option<String>,
}

/// Field changes to apply to an existing `Persona`.
///
/// Every `Some` field overwrites the stored value; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaUpdate {
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub cedula: Option<Cedula>,
    pub fecha_nacimiento: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
}

impl PersonaUpdate {
    /// Returns true if applying this update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nombres.is_none()
            && self.apellidos.is_none()
            && self.cedula.is_none()
            && self.fecha_nacimiento.is_none()
            && self.telefono.is_none()
            && self.email.is_none()
            && self.direccion.is_none()
    }
}
