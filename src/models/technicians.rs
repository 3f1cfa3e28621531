use crate::schema::technicians;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = technicians)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Technician {
    pub id: i32,
    pub name: String,
    pub expertise: String,
    pub location: String,
    pub contact: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
}
