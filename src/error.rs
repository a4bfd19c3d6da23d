use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ErrorBody;

const UPSTREAM_MESSAGE: &str = "Error al actualizar el reclamo en el servicio externo";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(
        "La cuadrilla {cuadrilla_id} alcanzó su límite de {limite} reclamos simultáneos"
    )]
    CapacityExceeded { cuadrilla_id: i64, limite: i32 },

    #[error("{0}")]
    Forbidden(String),

    #[error("No autorizado: {0}")]
    Unauthorized(String),

    #[error("Error al actualizar el reclamo en el servicio externo: {0}")]
    Upstream(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CapacityExceeded { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Database, internal and upstream details stay in the logs
        let error_message = match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Error interno del servidor".to_string()
            }
            AppError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            other => other.to_string(),
        };

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::warn!("Request rejected with status {}: {}", status_code, self);
        }

        HttpResponse::build(status_code).json(ErrorBody::new(error_message))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn cuadrilla_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Cuadrilla {} no encontrada", id))
    }
}
