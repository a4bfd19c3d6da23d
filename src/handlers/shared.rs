use actix_web::{HttpRequest, ResponseError, error, web};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// JSON body errors answer 400 `{ error }` instead of actix's plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Cuerpo JSON inválido: {}", err);
        error::InternalError::from_response(err, AppError::BadRequest(message).error_response()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Parámetro de ruta inválido: {}", err);
        error::InternalError::from_response(err, AppError::BadRequest(message).error_response()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Parámetro de consulta inválido: {}", err);
        error::InternalError::from_response(err, AppError::BadRequest(message).error_response()).into()
    })
}
