use crate::utils::error::{ErrorCategory, GariError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// HTTP 邊界上的錯誤：依錯誤類別決定狀態碼，依路由決定對外訊息
#[derive(Debug)]
pub enum ApiError {
    MapData(GariError),
    Isoline(GariError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        let err = match self {
            ApiError::MapData(e) | ApiError::Isoline(e) => e,
        };
        if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::MapData(e) if e.is_client_error() => e.to_string(),
            ApiError::MapData(e) => {
                // 驅動訊息只寫進日誌，不回傳給瀏覽器
                tracing::error!(
                    "❌ Error fetching map data (category: {:?}): {}",
                    e.category(),
                    e
                );
                "Error fetching data from database".to_string()
            }
            ApiError::Isoline(e) if e.category() == ErrorCategory::Validation => {
                tracing::warn!("Rejected isoline request: {}", e);
                e.to_string()
            }
            ApiError::Isoline(e) => {
                tracing::error!("❌ Error fetching isoline data: {}", e);
                format!("Failed to fetch isoline data: {}", e)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
