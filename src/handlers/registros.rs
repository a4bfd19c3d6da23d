use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::ActualizarEstadoInput;
use crate::error::AppError;
use crate::services::Claims;

pub async fn update_estado(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<i64>,
    input: web::Json<ActualizarEstadoInput>,
) -> Result<HttpResponse, AppError> {
    let registro_id = path.into_inner();
    let estado = input.into_inner().estado;

    let registro = state
        .registros
        .update_estado(registro_id, estado)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Registro de reclamo {} no encontrado", registro_id))
        })?;

    log::info!(
        "Registro {} (reclamo {}) moved to {} by {}",
        registro.id,
        registro.reclamo_id,
        registro.estado,
        claims.email
    );

    Ok(HttpResponse::Ok().json(registro))
}
