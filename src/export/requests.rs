use serde::Deserialize;

#[derive(Deserialize)]
pub struct ExportRequest {
    pub window_days: Option<u32>,
}

#[derive(Deserialize)]
pub struct ChartRequest {
    #[serde(default)]
    pub download: Option<String>,
    pub window_days: Option<u32>,
}

impl ChartRequest {
    /// Only the literal `download=true` asks for an attachment.
    pub fn wants_download(&self) -> bool {
        self.download.as_deref() == Some("true")
    }
}
