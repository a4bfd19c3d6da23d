use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{MensajeInput, NuevoMensaje};
use crate::error::AppError;
use crate::services::Claims;

async fn ensure_cuadrilla(state: &AppState, id: i64) -> Result<(), AppError> {
    match state.cuadrillas.find_cuadrilla(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::cuadrilla_not_found(id)),
    }
}

pub async fn list_mensajes(
    state: web::Data<AppState>,
    _claims: Claims,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let cuadrilla_id = path.into_inner();
    ensure_cuadrilla(&state, cuadrilla_id).await?;

    let mensajes = state.mensajes.list_mensajes(cuadrilla_id).await?;

    Ok(HttpResponse::Ok().json(mensajes))
}

pub async fn create_mensaje(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<i64>,
    input: web::Json<MensajeInput>,
) -> Result<HttpResponse, AppError> {
    let cuadrilla_id = path.into_inner();
    let contenido = input.into_inner().contenido.trim().to_string();

    if contenido.is_empty() {
        return Err(AppError::BadRequest(
            "El contenido del mensaje es obligatorio".to_string(),
        ));
    }

    ensure_cuadrilla(&state, cuadrilla_id).await?;

    let mensaje = state
        .mensajes
        .create_mensaje(&NuevoMensaje {
            cuadrilla_id,
            remitente: claims.email,
            contenido,
            es_sistema: false,
        })
        .await?;

    Ok(HttpResponse::Created().json(mensaje))
}
