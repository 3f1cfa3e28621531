use serde::Serialize;

use crate::{
    models::{appointments::Appointment, technicians::Technician},
    query::AnalyticsSeries,
    utils::format_date,
};

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub login_token: String,
    pub technician_name: String,
}

/// One appointment as shown in the dashboard and history tables.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct AppointmentRow {
    pub id: i32,
    pub date: String,
    pub time_slot: String,
    pub name: String,
    pub intent: String,
    pub problem_description: String,
    pub location: String,
    pub contact: String,
}

impl From<Appointment> for AppointmentRow {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            date: format_date(appointment.created_at.as_ref()),
            time_slot: appointment.time_slot.unwrap_or_default(),
            name: appointment.name.unwrap_or_default(),
            intent: appointment.intent.unwrap_or_default(),
            problem_description: appointment.problem_description.unwrap_or_default(),
            location: appointment.location.unwrap_or_default(),
            contact: appointment.contact.unwrap_or_default(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<AppointmentRow>,
}

impl AppointmentsResponse {
    pub fn rows(appointments: Vec<Appointment>) -> Self {
        Self {
            success: true,
            err: "".to_string(),
            appointments: appointments.into_iter().map(AppointmentRow::from).collect(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub err: String,
    pub id: i32,
    pub name: String,
    pub expertise: String,
    pub location: String,
    pub contact: String,
    pub email: String,
    pub total_appointments: i64,
}

impl ProfileResponse {
    pub fn new(technician: Technician, total_appointments: i64) -> Self {
        Self {
            success: true,
            err: "".to_string(),
            id: technician.id,
            name: technician.name,
            expertise: technician.expertise,
            location: technician.location,
            contact: technician.contact,
            email: technician.email,
            total_appointments,
        }
    }
}

#[derive(Default, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub err: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    #[serde(flatten)]
    pub analytics: AnalyticsSeries,
}

crate::impl_err_response! {
    LoginResponse,
    AppointmentsResponse,
    ProfileResponse,
    AnalyticsResponse,
}
