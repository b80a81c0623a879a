// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction at the server boundary.
//!
//! Credentials are checked by the external authentication service, which
//! forwards the verified account and role on every request as
//! `X-Cuenta-Id` and `X-Rol` headers. This extractor only parses them.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use matricula_api::{AuthenticatedActor, Role, authenticate_stub};
use tracing::{debug, warn};

pub const CUENTA_HEADER: &str = "x-cuenta-id";
pub const ROL_HEADER: &str = "x-rol";

/// The authenticated actor for a request.
pub struct SessionActor(pub AuthenticatedActor);

impl<S: Send + Sync> FromRequestParts<S> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cuenta_id: i64 = header_value(parts, CUENTA_HEADER)?
            .parse()
            .map_err(|_| {
                warn!("Account header is not an integer");
                SessionError::InvalidHeader(CUENTA_HEADER)
            })?;
        let role: Role = parse_role(header_value(parts, ROL_HEADER)?)?;

        let actor = authenticate_stub(cuenta_id, role).map_err(|e| {
            warn!(cuenta_id, error = %e, "Actor rejected");
            SessionError::Rejected(e.to_string())
        })?;

        debug!(cuenta_id, role = role.as_str(), "Actor extracted");
        Ok(Self(actor))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, SessionError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| {
            debug!(header = name, "Missing actor header");
            SessionError::MissingHeader(name)
        })?
        .to_str()
        .map_err(|_| SessionError::InvalidHeader(name))
}

/// Parses the role header.
fn parse_role(value: &str) -> Result<Role, SessionError> {
    match value.trim().to_lowercase().as_str() {
        "ciudadano" => Ok(Role::Ciudadano),
        "empleado" => Ok(Role::Empleado),
        "administrador" => Ok(Role::Administrador),
        _ => Err(SessionError::InvalidHeader(ROL_HEADER)),
    }
}

/// Actor extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingHeader(&'static str),
    InvalidHeader(&'static str),
    Rejected(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingHeader(name) => format!("Missing {name} header"),
            Self::InvalidHeader(ROL_HEADER) => format!(
                "Invalid {ROL_HEADER} header. Must be 'ciudadano', 'empleado' or 'administrador'"
            ),
            Self::InvalidHeader(name) => format!("Invalid {name} header"),
            Self::Rejected(reason) => format!("Authentication failed: {reason}"),
        };

        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}
