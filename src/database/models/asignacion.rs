use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cuadrilla, ReclamoDetalles, RegistroReclamo};

/// Identifier accepted either as a JSON integer or as a numeric string.
/// Any other JSON value still deserializes and is rejected by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl FlexibleId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlexibleId::Number(n) => Some(*n),
            FlexibleId::Text(s) => s.trim().parse().ok(),
            FlexibleId::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignarReclamoRequest {
    #[serde(default)]
    pub reclamo_id: Option<FlexibleId>,
    #[serde(default)]
    pub cuadrilla_id: Option<FlexibleId>,
    #[serde(default)]
    pub reclamo_detalles: ReclamoDetalles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignacionResponse {
    pub message: String,
    pub updated_cuadrilla: Cuadrilla,
    pub nuevo_registro_reclamo: RegistroReclamo,
}

/// Locally committed assignment that has not yet been confirmed by the
/// complaints service. Carries what the compensation needs to undo it.
#[derive(Debug, Clone)]
pub struct Reserva {
    pub cuadrilla: Cuadrilla,
    pub registro: RegistroReclamo,
    pub ultima_asignacion_previa: Option<DateTime<Utc>>,
}
