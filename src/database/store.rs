//! Storage seams used by the handlers and services.
//!
//! The PostgreSQL repositories in [`crate::database::repositories`] are the
//! production implementations.

use async_trait::async_trait;

use crate::database::models::{
    Cuadrilla, CuadrillaInput, EstadoReclamo, Mensaje, NuevoMensaje, NuevoRegistroReclamo,
    RegistroReclamo, Reserva, RolPermisos, TipoCuadrilla,
};
use crate::error::AppError;

#[async_trait]
pub trait CuadrillaStore: Send + Sync {
    async fn list_cuadrillas(&self) -> Result<Vec<Cuadrilla>, AppError>;

    async fn find_cuadrilla(&self, id: i64) -> Result<Option<Cuadrilla>, AppError>;

    async fn create_cuadrilla(&self, input: &CuadrillaInput) -> Result<Cuadrilla, AppError>;

    /// Updates descriptive fields and the limit, recomputing `disponible`.
    async fn update_cuadrilla(
        &self,
        id: i64,
        input: &CuadrillaInput,
    ) -> Result<Option<Cuadrilla>, AppError>;

    async fn delete_cuadrilla(&self, id: i64) -> Result<bool, AppError>;

    async fn list_tipos(&self) -> Result<Vec<TipoCuadrilla>, AppError>;

    async fn create_tipo(&self, nombre: &str) -> Result<TipoCuadrilla, AppError>;
}

#[async_trait]
pub trait RegistroStore: Send + Sync {
    /// Admits and records an assignment atomically with respect to other
    /// writers of the same crew.
    ///
    /// Fails with `NotFound` for an unknown crew and `CapacityExceeded` when
    /// the crew already holds `limite` open assignments; neither writes.
    async fn reserve(
        &self,
        cuadrilla_id: i64,
        nuevo: &NuevoRegistroReclamo,
    ) -> Result<Reserva, AppError>;

    /// Undoes a reservation whose downstream confirmation failed.
    async fn release(&self, reserva: &Reserva) -> Result<(), AppError>;

    async fn list_registros(
        &self,
        cuadrilla_id: i64,
        solo_abiertos: bool,
    ) -> Result<Vec<RegistroReclamo>, AppError>;

    /// Moves a record to `estado` and recomputes the owning crew's
    /// availability. Terminal records are rejected with `BadRequest`.
    async fn update_estado(
        &self,
        registro_id: i64,
        estado: EstadoReclamo,
    ) -> Result<Option<RegistroReclamo>, AppError>;
}

#[async_trait]
pub trait MensajeStore: Send + Sync {
    async fn list_mensajes(&self, cuadrilla_id: i64) -> Result<Vec<Mensaje>, AppError>;

    async fn create_mensaje(&self, nuevo: &NuevoMensaje) -> Result<Mensaje, AppError>;
}

#[async_trait]
pub trait RolStore: Send + Sync {
    async fn find_rol(&self, rol: &str) -> Result<Option<RolPermisos>, AppError>;

    async fn upsert_permisos(
        &self,
        rol: &str,
        permisos: &[String],
    ) -> Result<RolPermisos, AppError>;
}
