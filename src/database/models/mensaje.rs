use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REMITENTE_SISTEMA: &str = "SISTEMA";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Mensaje {
    pub id: i64,
    pub cuadrilla_id: i64,
    pub remitente: String,
    pub contenido: String,
    pub es_sistema: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NuevoMensaje {
    pub cuadrilla_id: i64,
    pub remitente: String,
    pub contenido: String,
    pub es_sistema: bool,
}

impl NuevoMensaje {
    pub fn sistema(cuadrilla_id: i64, contenido: String) -> Self {
        Self {
            cuadrilla_id,
            remitente: REMITENTE_SISTEMA.to_string(),
            contenido,
            es_sistema: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MensajeInput {
    pub contenido: String,
}
