use serde::Serialize;

/// Minimal success body shared by mutating management endpoints.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    // ---
    pub fn success() -> Self {
        Self { status: "success" }
    }
}
