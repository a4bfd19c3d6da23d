//! Crew assignment workflow.
//!
//! Admission and the local writes happen inside [`RegistroStore::reserve`]
//! under the crew lock. The complaints service is then told about the
//! assignment; if that fails the reservation is released again so the local
//! store never claims an assignment the system of record does not know about.

use std::sync::Arc;

use crate::database::models::{
    AsignacionResponse, AsignarReclamoRequest, FlexibleId, NuevoMensaje, NuevoRegistroReclamo,
};
use crate::database::store::{MensajeStore, RegistroStore};
use crate::error::AppError;
use crate::services::complaints::ComplaintsApi;

#[derive(Clone)]
pub struct AssignmentService {
    registros: Arc<dyn RegistroStore>,
    mensajes: Arc<dyn MensajeStore>,
    complaints: Arc<dyn ComplaintsApi>,
}

impl AssignmentService {
    pub fn new(
        registros: Arc<dyn RegistroStore>,
        mensajes: Arc<dyn MensajeStore>,
        complaints: Arc<dyn ComplaintsApi>,
    ) -> Self {
        Self {
            registros,
            mensajes,
            complaints,
        }
    }

    pub async fn assign(
        &self,
        request: AsignarReclamoRequest,
    ) -> Result<AsignacionResponse, AppError> {
        let reclamo_id = request
            .reclamo_id
            .as_ref()
            .and_then(FlexibleId::as_i64)
            .ok_or_else(|| AppError::BadRequest("reclamoId es obligatorio".to_string()))?;

        let cuadrilla_id = request
            .cuadrilla_id
            .as_ref()
            .and_then(FlexibleId::as_i64)
            .ok_or_else(|| AppError::NotFound("Cuadrilla no encontrada".to_string()))?;

        let nuevo = NuevoRegistroReclamo {
            reclamo_id,
            detalles: request.reclamo_detalles,
        };

        let reserva = self.registros.reserve(cuadrilla_id, &nuevo).await?;

        log::info!(
            "Reclamo {} reserved for cuadrilla {} (registro {}, disponible={})",
            reclamo_id,
            cuadrilla_id,
            reserva.registro.id,
            reserva.cuadrilla.disponible
        );

        if let Err(e) = self.complaints.mark_assigned(reclamo_id, cuadrilla_id).await {
            log::error!(
                "Complaints service rejected assignment of reclamo {} to cuadrilla {}: {}",
                reclamo_id,
                cuadrilla_id,
                e
            );

            match self.registros.release(&reserva).await {
                Ok(()) => log::info!(
                    "Released registro {} after downstream failure",
                    reserva.registro.id
                ),
                Err(release_err) => log::error!(
                    "Failed to release registro {} for cuadrilla {}; local state now diverges: {}",
                    reserva.registro.id,
                    cuadrilla_id,
                    release_err
                ),
            }

            return Err(e);
        }

        let nota = NuevoMensaje::sistema(
            cuadrilla_id,
            format!("Reclamo #{} asignado a la cuadrilla", reclamo_id),
        );
        if let Err(e) = self.mensajes.create_mensaje(&nota).await {
            log::warn!(
                "Failed to post assignment note for cuadrilla {}: {}",
                cuadrilla_id,
                e
            );
        }

        Ok(AsignacionResponse {
            message: "Reclamo asignado exitosamente".to_string(),
            updated_cuadrilla: reserva.cuadrilla,
            nuevo_registro_reclamo: reserva.registro,
        })
    }
}
