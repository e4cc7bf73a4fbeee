//! API 핸들러 모듈.

pub mod control;
pub mod models;
pub mod results;
pub mod settings;
pub mod status;
pub mod stream;

use serde::Serialize;

/// 단순 성공 응답 (`{"success": true, ...}`)
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl SuccessResponse<serde_json::Map<String, serde_json::Value>> {
    pub fn ok() -> Self {
        Self::with(serde_json::Map::new())
    }
}
