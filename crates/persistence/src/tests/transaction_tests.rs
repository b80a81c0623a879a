// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::PersonaRol;

use super::{create_test_fields, insert_test_persona, new_db};
use crate::{NewPersona, PersistenceError};

#[test]
fn test_committed_writes_are_visible() {
    let mut db = new_db();

    let id: i64 = db
        .write_transaction(|tx| {
            let persona =
                NewPersona::from_identity(&create_test_fields("00112345678"), PersonaRol::Ciudadano, None);
            tx.insert_persona(&persona)
        })
        .unwrap();

    assert!(db.get_persona(id).unwrap().is_some());
}

#[test]
fn test_error_rolls_back_every_write() {
    let mut db = new_db();

    let result: Result<(), PersistenceError> = db.write_transaction(|tx| {
        insert_test_persona(tx, "00112345678", PersonaRol::Ciudadano, Some(1));
        tx.upsert_cuenta(1, "ana", PersonaRol::Ciudadano)?;
        Err(PersistenceError::QueryFailed(String::from("forced")))
    });

    assert!(result.is_err());
    assert!(db.find_persona_by_cedula("00112345678").unwrap().is_none());
    assert!(db.get_cuenta(1).unwrap().is_none());
}

#[test]
fn test_connection_is_usable_after_rollback() {
    let mut db = new_db();

    let _: Result<(), PersistenceError> =
        db.write_transaction(|_| Err(PersistenceError::QueryFailed(String::from("forced"))));

    let id = db
        .write_transaction(|tx| -> Result<i64, PersistenceError> {
            Ok(insert_test_persona(tx, "00112345678", PersonaRol::Empleado, None))
        })
        .unwrap();
    assert!(db.get_persona(id).unwrap().is_some());
}

#[test]
fn test_locks_are_accepted_inside_transaction() {
    let mut db = new_db();
    let id = insert_test_persona(&mut db, "00112345678", PersonaRol::Empleado, None);

    let result: Result<(), PersistenceError> = db.write_transaction(|tx| {
        tx.lock_empleados()?;
        tx.lock_personas(&[id])?;
        Ok(())
    });

    assert!(result.is_ok());
}
