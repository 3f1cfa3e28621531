use serde::Serialize;

use crate::{query::AnalyticsSeries, session::SessionContext};

#[derive(Debug, Default, Serialize)]
pub struct TechnicianInfo {
    pub name: String,
    pub expertise: String,
    pub location: String,
}

impl From<&SessionContext> for TechnicianInfo {
    fn from(session: &SessionContext) -> Self {
        Self {
            name: session.technician_name.clone(),
            expertise: session.technician_expertise.clone().unwrap_or_default(),
            location: session.technician_location.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ChartDataResponse {
    pub success: bool,
    pub err: String,
    pub technician: TechnicianInfo,
    #[serde(flatten)]
    pub analytics: AnalyticsSeries,
    pub generated_at: String,
}
