use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capacity given to crews created without an explicit limit.
pub const DEFAULT_LIMITE_RECLAMOS: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cuadrilla {
    pub id: i64,
    pub nombre: String,
    pub telefono: Option<String>,
    pub disponible: bool,
    pub ultima_asignacion: Option<DateTime<Utc>>,
    pub limite_reclamos_simultaneos: i32,
    /// Every complaint ever assigned, in assignment order. Historical only;
    /// capacity is computed from the open assignment records.
    pub reclamos_asignados: Vec<i64>,
    #[sqlx(skip)]
    pub tipos: Vec<TipoCuadrilla>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TipoCuadrilla {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuadrillaInput {
    pub nombre: String,
    pub telefono: Option<String>,
    pub limite_reclamos_simultaneos: Option<i32>,
    /// `None` leaves the crew's tipos untouched on update.
    #[serde(default)]
    pub tipo_ids: Option<Vec<i64>>,
}

impl CuadrillaInput {
    pub fn limite(&self) -> i32 {
        self.limite_or(DEFAULT_LIMITE_RECLAMOS)
    }

    /// Requested limit, or `actual` when the field was omitted.
    pub fn limite_or(&self, actual: i32) -> i32 {
        self.limite_reclamos_simultaneos.unwrap_or(actual)
    }

    pub fn tipo_ids(&self) -> &[i64] {
        self.tipo_ids.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.nombre.trim().is_empty() {
            return Err("El nombre de la cuadrilla es obligatorio".to_string());
        }
        if self.limite() < 1 {
            return Err("limiteReclamosSimultaneos debe ser al menos 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipoCuadrillaInput {
    pub nombre: String,
}
