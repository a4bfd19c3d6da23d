use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::PermisosInput;
use crate::error::AppError;
use crate::services::Claims;
use crate::services::menu::{self, PERMISO_AJUSTES};

/// Sections the caller's role may see.
pub async fn get_menu(
    state: web::Data<AppState>,
    claims: Claims,
) -> Result<HttpResponse, AppError> {
    let secciones = menu::menu_for_role(state.roles.as_ref(), &claims.role).await?;

    Ok(HttpResponse::Ok().json(secciones))
}

pub async fn get_permisos(
    state: web::Data<AppState>,
    _claims: Claims,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let rol = path.into_inner();

    let permisos = state
        .roles
        .find_rol(&rol)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rol '{}' no encontrado", rol)))?;

    Ok(HttpResponse::Ok().json(permisos))
}

pub async fn update_permisos(
    state: web::Data<AppState>,
    claims: Claims,
    path: web::Path<String>,
    input: web::Json<PermisosInput>,
) -> Result<HttpResponse, AppError> {
    menu::require_permission(state.roles.as_ref(), &claims.role, PERMISO_AJUSTES).await?;

    let rol = path.into_inner();
    if rol.trim().is_empty() {
        return Err(AppError::BadRequest("El rol es obligatorio".to_string()));
    }

    let permisos = menu::normalize_permisos(&input.permisos)?;
    let actualizado = state.roles.upsert_permisos(rol.trim(), &permisos).await?;

    log::info!(
        "Permisos of rol '{}' set to {:?} by {}",
        actualizado.rol,
        actualizado.permisos,
        claims.email
    );

    Ok(HttpResponse::Ok().json(actualizado))
}
