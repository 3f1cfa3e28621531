use crate::schema::appointments;
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// A service request as captured by intake. Read-only from this service.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Appointment {
    pub id: i32,
    pub intent: Option<String>,
    pub name: Option<String>,
    pub problem_description: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub time_slot: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
