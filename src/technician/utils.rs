use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use diesel::prelude::*;

use crate::{
    models::technicians::Technician,
    query::{self, Scope},
};

pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<Technician>> {
    use crate::schema::technicians;

    technicians::table
        .filter(technicians::email.eq(email))
        .select(Technician::as_select())
        .first(conn)
        .optional()
}

pub fn find_by_id(conn: &mut PgConnection, id: i32) -> QueryResult<Option<Technician>> {
    use crate::schema::technicians;

    technicians::table
        .find(id)
        .select(Technician::as_select())
        .first(conn)
        .optional()
}

/// The technician behind a session and the number of appointments in their
/// scope, read on one connection.
pub fn find_profile(
    conn: &mut PgConnection,
    id: i32,
    scope: Option<&Scope>,
) -> QueryResult<Option<(Technician, i64)>> {
    let technician = match find_by_id(conn, id)? {
        Some(technician) => technician,
        None => return Ok(None),
    };
    let total = query::count_total(conn, scope)?;
    Ok(Some((technician, total)))
}

/// Salted Argon2 hash in PHC string form, as stored in `technicians.password`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("stored password is not a PHC hash: {}", err);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
