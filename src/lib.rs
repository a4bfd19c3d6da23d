pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

pub use config::Config;
pub use error::AppError;
pub use services::{AssignmentService, ComplaintsApi, HttpComplaintsClient};

use database::store::{CuadrillaStore, MensajeStore, RegistroStore, RolStore};

pub struct AppState {
    pub cuadrillas: Arc<dyn CuadrillaStore>,
    pub registros: Arc<dyn RegistroStore>,
    pub mensajes: Arc<dyn MensajeStore>,
    pub roles: Arc<dyn RolStore>,
    pub asignaciones: AssignmentService,
}

impl AppState {
    pub fn new(
        cuadrillas: Arc<dyn CuadrillaStore>,
        registros: Arc<dyn RegistroStore>,
        mensajes: Arc<dyn MensajeStore>,
        roles: Arc<dyn RolStore>,
        complaints: Arc<dyn ComplaintsApi>,
    ) -> Self {
        let asignaciones = AssignmentService::new(registros.clone(), mensajes.clone(), complaints);

        Self {
            cuadrillas,
            registros,
            mensajes,
            roles,
            asignaciones,
        }
    }
}
