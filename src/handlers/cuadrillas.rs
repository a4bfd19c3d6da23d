use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::database::models::{AsignarReclamoRequest, CuadrillaInput, RegistrosQuery};
use crate::error::AppError;
use crate::middleware::RequestIdExt;
use crate::services::Claims;

pub async fn list_cuadrillas(
    state: web::Data<AppState>,
    _claims: Claims,
) -> Result<HttpResponse, AppError> {
    let cuadrillas = state.cuadrillas.list_cuadrillas().await?;

    Ok(HttpResponse::Ok().json(cuadrillas))
}

pub async fn get_cuadrilla(
    state: web::Data<AppState>,
    _claims: Claims,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let cuadrilla = state
        .cuadrillas
        .find_cuadrilla(id)
        .await?
        .ok_or_else(|| AppError::cuadrilla_not_found(id))?;

    Ok(HttpResponse::Ok().json(cuadrilla))
}

pub async fn create_cuadrilla(
    state: web::Data<AppState>,
    claims: Claims,
    input: web::Json<CuadrillaInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    input.validate().map_err(AppError::BadRequest)?;

    let cuadrilla = state.cuadrillas.create_cuadrilla(&input).await?;

    log::info!(
        "Cuadrilla {} ({}) created by {}",
        cuadrilla.id,
        cuadrilla.nombre,
        claims.email
    );

    Ok(HttpResponse::Created().json(cuadrilla))
}

pub async fn update_cuadrilla(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<i64>,
    input: web::Json<CuadrillaInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();
    input.validate().map_err(AppError::BadRequest)?;

    let cuadrilla = state
        .cuadrillas
        .update_cuadrilla(id, &input)
        .await?
        .ok_or_else(|| AppError::cuadrilla_not_found(id))?;

    log::info!(
        "Cuadrilla {} updated by {} (limite={}, disponible={})",
        id,
        claims.email,
        cuadrilla.limite_reclamos_simultaneos,
        cuadrilla.disponible
    );

    Ok(HttpResponse::Ok().json(cuadrilla))
}

pub async fn delete_cuadrilla(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !state.cuadrillas.delete_cuadrilla(id).await? {
        return Err(AppError::cuadrilla_not_found(id));
    }

    log::info!("Cuadrilla {} deleted by {}", id, claims.email);

    Ok(HttpResponse::NoContent().finish())
}

pub async fn asignar_reclamo(
    state: web::Data<AppState>,
    claims: Claims,
    input: web::Json<AsignarReclamoRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let correlation_id = req.correlation_id().unwrap_or_default();

    log::info!(
        "[{}] {} requested assignment of reclamo {:?} to cuadrilla {:?}",
        correlation_id,
        claims.email,
        input.reclamo_id,
        input.cuadrilla_id
    );

    match state.asignaciones.assign(input.into_inner()).await {
        Ok(response) => {
            log::info!(
                "[{}] Reclamo {} assigned to cuadrilla {}",
                correlation_id,
                response.nuevo_registro_reclamo.reclamo_id,
                response.updated_cuadrilla.id
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("[{}] Assignment rejected: {}", correlation_id, e);
            Err(e)
        }
    }
}

pub async fn list_reclamos(
    state: web::Data<AppState>,
    _claims: Claims,
    path: web::Path<i64>,
    query: web::Query<RegistrosQuery>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if state.cuadrillas.find_cuadrilla(id).await?.is_none() {
        return Err(AppError::cuadrilla_not_found(id));
    }

    let registros = state
        .registros
        .list_registros(id, query.abiertos.unwrap_or(false))
        .await?;

    Ok(HttpResponse::Ok().json(registros))
}
