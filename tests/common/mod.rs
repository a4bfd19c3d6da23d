#![allow(dead_code)]

use std::env;

use cuadrillas_api::database::models::{CuadrillaInput, NuevoRegistroReclamo, ReclamoDetalles};

pub const CONFIG_VARS: &[&str] = &[
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "JWT_SECRET",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "COMPLAINTS_API_URL",
    "COMPLAINTS_API_TIMEOUT_SECS",
    "CORS_ORIGIN",
];

/// Snapshot of the configuration variables, restored on drop.
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    pub fn cleared() -> Self {
        let saved = CONFIG_VARS
            .iter()
            .map(|key| (*key, env::var(key).ok()))
            .collect();

        for key in CONFIG_VARS {
            unsafe {
                env::remove_var(key);
            }
        }

        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            unsafe {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

pub fn cuadrilla_input(nombre: &str, limite: i32) -> CuadrillaInput {
    CuadrillaInput {
        nombre: nombre.to_string(),
        telefono: None,
        limite_reclamos_simultaneos: Some(limite),
        tipo_ids: None,
    }
}

pub fn nuevo_registro(reclamo_id: i64) -> NuevoRegistroReclamo {
    NuevoRegistroReclamo {
        reclamo_id,
        detalles: ReclamoDetalles {
            reclamo: Some("Árbol caído".to_string()),
            barrio: Some("Sur".to_string()),
            ..ReclamoDetalles::default()
        },
    }
}
