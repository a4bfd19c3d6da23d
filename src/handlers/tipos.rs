use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::TipoCuadrillaInput;
use crate::error::AppError;
use crate::services::Claims;

pub async fn list_tipos(
    state: web::Data<AppState>,
    _claims: Claims,
) -> Result<HttpResponse, AppError> {
    let tipos = state.cuadrillas.list_tipos().await?;

    Ok(HttpResponse::Ok().json(tipos))
}

pub async fn create_tipo(
    state: web::Data<AppState>,
    _claims: Claims,
    input: web::Json<TipoCuadrillaInput>,
) -> Result<HttpResponse, AppError> {
    let nombre = input.into_inner().nombre;

    if nombre.trim().is_empty() {
        return Err(AppError::BadRequest(
            "El nombre del tipo de cuadrilla es obligatorio".to_string(),
        ));
    }

    let tipo = state.cuadrillas.create_tipo(&nombre).await?;

    Ok(HttpResponse::Created().json(tipo))
}
