use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum EstadoReclamo {
        Pendiente => "PENDIENTE",
        Asignado => "ASIGNADO",
        EnProceso => "EN_PROCESO",
        Completado => "COMPLETADO",
        Solucionado => "SOLUCIONADO",
        Cancelado => "CANCELADO",
    }
}

impl EstadoReclamo {
    /// Terminal states release the crew slot held by the assignment.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EstadoReclamo::Completado | EstadoReclamo::Solucionado | EstadoReclamo::Cancelado
        )
    }

    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Terminal values as stored, for `estado <> ALL($n)` filters.
    pub fn terminal_values() -> Vec<String> {
        Self::ALL
            .iter()
            .filter(|estado| estado.is_terminal())
            .map(|estado| estado.as_str().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistroReclamo {
    pub id: i64,
    pub cuadrilla_id: i64,
    pub reclamo_id: i64,
    pub reclamo: Option<String>,
    pub fecha: Option<String>,
    pub prioridad: Option<String>,
    pub detalle: Option<String>,
    pub ubicacion: Option<String>,
    pub barrio: Option<String>,
    pub estado: EstadoReclamo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complaint fields copied onto the assignment record at assignment time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReclamoDetalles {
    pub reclamo: Option<String>,
    pub fecha: Option<String>,
    pub prioridad: Option<String>,
    pub detalle: Option<String>,
    pub ubicacion: Option<String>,
    pub barrio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NuevoRegistroReclamo {
    pub reclamo_id: i64,
    pub detalles: ReclamoDetalles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarEstadoInput {
    pub estado: EstadoReclamo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrosQuery {
    pub abiertos: Option<bool>,
}
