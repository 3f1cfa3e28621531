use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Views that take no parameters.
#[derive(Deserialize)]
pub struct ViewRequest {}

#[derive(Deserialize)]
pub struct AnalyticsRequest {
    pub window_days: Option<u32>,
}
