//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del núcleo de reservas
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::VehicleId;
use crate::services::conflict_detector::RentalConflict;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Conflict: vehicle #{vehicle_id} is already booked ({} overlapping rental(s))", conflicts.len())]
    Conflict {
        vehicle_id: VehicleId,
        conflicts: Vec<RentalConflict>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable que distingue la taxonomía ante el llamador
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "VALIDATION_ERROR",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code().to_string();
        let message = self.to_string();

        let (status, error, details) = match self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", None),
            AppError::InvalidInput(e) => (StatusCode::BAD_REQUEST, "Validation Error", Some(json!(e))),
            AppError::Conflict { vehicle_id, conflicts } => (
                StatusCode::CONFLICT,
                "Conflict",
                Some(json!({ "vehicle_id": vehicle_id, "conflicts": conflicts })),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", None),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, "Invalid State", None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request", None),
            AppError::Internal(msg) => {
                tracing::error!("💥 Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            details,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para transiciones sobre un estado incorrecto
pub fn invalid_state_error(resource: &str, id: impl std::fmt::Display, status: impl std::fmt::Display) -> AppError {
    AppError::InvalidState(format!("{} #{} is not ACTIVE (current status: {})", resource, id, status))
}

/// Función helper para crear errores de validación de dominio
pub fn validation_error(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
