//! Navigation sections and the per-role permission filter.

use std::collections::HashSet;

use serde::Serialize;

use crate::database::store::RolStore;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    /// Sections without an id are visible to every role with any permission.
    pub id: Option<&'static str>,
    pub titulo: &'static str,
    pub ruta: &'static str,
}

pub const SECCIONES: &[MenuSection] = &[
    MenuSection {
        id: Some("panel"),
        titulo: "Panel",
        ruta: "/panel",
    },
    MenuSection {
        id: Some("obras"),
        titulo: "Obras",
        ruta: "/obras",
    },
    MenuSection {
        id: Some("encuestas"),
        titulo: "Encuestas",
        ruta: "/encuestas",
    },
    MenuSection {
        id: Some("servicios"),
        titulo: "Servicios",
        ruta: "/servicios",
    },
    MenuSection {
        id: Some("ceresito"),
        titulo: "Ceresito",
        ruta: "/ceresito",
    },
    MenuSection {
        id: Some("ajustes"),
        titulo: "Ajustes",
        ruta: "/ajustes",
    },
    MenuSection {
        id: Some("salir"),
        titulo: "Salir",
        ruta: "/salir",
    },
];

/// Permission needed to edit role permissions.
pub const PERMISO_AJUSTES: &str = "ajustes";

/// Keeps the sections `permitted` allows, in their original order.
///
/// An empty permission set yields nothing, so a role that was never
/// configured sees no sections rather than all of them.
pub fn filter_sections<S: AsRef<str>>(
    sections: &[MenuSection],
    permitted: &[S],
) -> Vec<MenuSection> {
    if permitted.is_empty() {
        return Vec::new();
    }

    let permitted: HashSet<&str> = permitted.iter().map(|p| p.as_ref()).collect();

    sections
        .iter()
        .filter(|section| section.id.is_none_or(|id| permitted.contains(id)))
        .copied()
        .collect()
}

/// Validates identifiers against [`SECCIONES`] and returns them deduplicated
/// in menu order.
pub fn normalize_permisos(permisos: &[String]) -> Result<Vec<String>, AppError> {
    let requested: HashSet<&str> = permisos.iter().map(|p| p.trim()).collect();

    let mut desconocidos: Vec<&str> = requested
        .iter()
        .copied()
        .filter(|p| !SECCIONES.iter().any(|s| s.id == Some(*p)))
        .collect();

    if !desconocidos.is_empty() {
        desconocidos.sort_unstable();
        return Err(AppError::BadRequest(format!(
            "Permisos desconocidos: {}",
            desconocidos.join(", ")
        )));
    }

    Ok(SECCIONES
        .iter()
        .filter_map(|s| s.id)
        .filter(|id| requested.contains(id))
        .map(str::to_string)
        .collect())
}

pub async fn permisos_for_role(roles: &dyn RolStore, rol: &str) -> Result<Vec<String>, AppError> {
    Ok(roles
        .find_rol(rol)
        .await?
        .map(|r| r.permisos)
        .unwrap_or_default())
}

pub async fn menu_for_role(roles: &dyn RolStore, rol: &str) -> Result<Vec<MenuSection>, AppError> {
    let permisos = permisos_for_role(roles, rol).await?;
    Ok(filter_sections(SECCIONES, &permisos))
}

pub async fn require_permission(
    roles: &dyn RolStore,
    rol: &str,
    permiso: &str,
) -> Result<(), AppError> {
    let permisos = permisos_for_role(roles, rol).await?;
    if permisos.iter().any(|p| p == permiso) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "El rol '{}' no tiene el permiso '{}'",
            rol, permiso
        )))
    }
}
