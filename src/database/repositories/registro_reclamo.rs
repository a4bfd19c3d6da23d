use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::{
    models::{Cuadrilla, EstadoReclamo, NuevoRegistroReclamo, RegistroReclamo, Reserva},
    repositories::cuadrilla::{attach_tipos, count_abiertos, lock_cuadrilla},
    store::RegistroStore,
};
use crate::error::AppError;
use crate::services::capacity;

#[derive(Clone)]
pub struct RegistroReclamoRepository {
    pool: PgPool,
}

impl RegistroReclamoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistroStore for RegistroReclamoRepository {
    async fn reserve(
        &self,
        cuadrilla_id: i64,
        nuevo: &NuevoRegistroReclamo,
    ) -> Result<Reserva, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Concurrent assignments to the same crew queue up here
        let cuadrilla = lock_cuadrilla(&mut tx, cuadrilla_id)
            .await?
            .ok_or_else(|| AppError::cuadrilla_not_found(cuadrilla_id))?;

        let abiertos = count_abiertos(&mut tx, cuadrilla_id).await?;
        capacity::check_admission(cuadrilla_id, abiertos, cuadrilla.limite_reclamos_simultaneos)?;

        let detalles = &nuevo.detalles;
        let registro = sqlx::query_as::<_, RegistroReclamo>(
            r#"
            INSERT INTO
                registros_reclamo (
                    cuadrilla_id,
                    reclamo_id,
                    reclamo,
                    fecha,
                    prioridad,
                    detalle,
                    ubicacion,
                    barrio,
                    estado,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING
                id,
                cuadrilla_id,
                reclamo_id,
                reclamo,
                fecha,
                prioridad,
                detalle,
                ubicacion,
                barrio,
                estado,
                created_at,
                updated_at
            "#,
        )
        .bind(cuadrilla_id)
        .bind(nuevo.reclamo_id)
        .bind(&detalles.reclamo)
        .bind(&detalles.fecha)
        .bind(&detalles.prioridad)
        .bind(&detalles.detalle)
        .bind(&detalles.ubicacion)
        .bind(&detalles.barrio)
        .bind(EstadoReclamo::Asignado)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let disponible =
            capacity::is_available(abiertos + 1, cuadrilla.limite_reclamos_simultaneos);

        let mut actualizada = sqlx::query_as::<_, Cuadrilla>(
            r#"
            UPDATE
                cuadrillas
            SET
                disponible = $1,
                ultima_asignacion = $2,
                reclamos_asignados = array_append(reclamos_asignados, $3),
                updated_at = $2
            WHERE
                id = $4
            RETURNING
                id,
                nombre,
                telefono,
                disponible,
                ultima_asignacion,
                limite_reclamos_simultaneos,
                reclamos_asignados,
                created_at,
                updated_at
            "#,
        )
        .bind(disponible)
        .bind(now)
        .bind(nuevo.reclamo_id)
        .bind(cuadrilla_id)
        .fetch_one(&mut *tx)
        .await?;

        attach_tipos(&mut tx, std::slice::from_mut(&mut actualizada)).await?;
        tx.commit().await?;

        Ok(Reserva {
            cuadrilla: actualizada,
            registro,
            ultima_asignacion_previa: cuadrilla.ultima_asignacion,
        })
    }

    async fn release(&self, reserva: &Reserva) -> Result<(), AppError> {
        let cuadrilla_id = reserva.cuadrilla.id;
        let mut tx = self.pool.begin().await?;

        let Some(actual) = lock_cuadrilla(&mut tx, cuadrilla_id).await? else {
            // Crew deleted in the meantime; its records cascaded with it
            return Ok(());
        };

        sqlx::query("DELETE FROM registros_reclamo WHERE id = $1")
            .bind(reserva.registro.id)
            .execute(&mut *tx)
            .await?;

        let mut historial = actual.reclamos_asignados.clone();
        capacity::remove_last(&mut historial, reserva.registro.reclamo_id);

        // Only roll the timestamp back if no later assignment moved it
        let ultima_asignacion = if actual.ultima_asignacion == reserva.cuadrilla.ultima_asignacion {
            reserva.ultima_asignacion_previa
        } else {
            actual.ultima_asignacion
        };

        let abiertos = count_abiertos(&mut tx, cuadrilla_id).await?;
        let disponible = capacity::is_available(abiertos, actual.limite_reclamos_simultaneos);

        sqlx::query(
            r#"
            UPDATE
                cuadrillas
            SET
                disponible = $1,
                ultima_asignacion = $2,
                reclamos_asignados = $3,
                updated_at = $4
            WHERE
                id = $5
            "#,
        )
        .bind(disponible)
        .bind(ultima_asignacion)
        .bind(&historial)
        .bind(Utc::now())
        .bind(cuadrilla_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_registros(
        &self,
        cuadrilla_id: i64,
        solo_abiertos: bool,
    ) -> Result<Vec<RegistroReclamo>, AppError> {
        let excluidos = if solo_abiertos {
            EstadoReclamo::terminal_values()
        } else {
            Vec::new()
        };

        let registros = sqlx::query_as::<_, RegistroReclamo>(
            r#"
            SELECT
                id,
                cuadrilla_id,
                reclamo_id,
                reclamo,
                fecha,
                prioridad,
                detalle,
                ubicacion,
                barrio,
                estado,
                created_at,
                updated_at
            FROM
                registros_reclamo
            WHERE
                cuadrilla_id = $1
                AND estado <> ALL($2)
            ORDER BY
                created_at DESC,
                id DESC
            "#,
        )
        .bind(cuadrilla_id)
        .bind(excluidos)
        .fetch_all(&self.pool)
        .await?;

        Ok(registros)
    }

    async fn update_estado(
        &self,
        registro_id: i64,
        estado: EstadoReclamo,
    ) -> Result<Option<RegistroReclamo>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let cuadrilla_id = sqlx::query_scalar::<_, i64>(
            "SELECT cuadrilla_id FROM registros_reclamo WHERE id = $1",
        )
        .bind(registro_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(cuadrilla_id) = cuadrilla_id else {
            return Ok(None);
        };

        // Crew first, then record: the same lock order as reserve()
        let Some(cuadrilla) = lock_cuadrilla(&mut tx, cuadrilla_id).await? else {
            return Ok(None);
        };

        let actual = sqlx::query_scalar::<_, EstadoReclamo>(
            "SELECT estado FROM registros_reclamo WHERE id = $1 FOR UPDATE",
        )
        .bind(registro_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(actual) = actual else {
            return Ok(None);
        };

        if actual.is_terminal() && actual != estado {
            return Err(AppError::BadRequest(format!(
                "El registro {} ya está cerrado ({}) y no puede pasar a {}",
                registro_id, actual, estado
            )));
        }

        let registro = sqlx::query_as::<_, RegistroReclamo>(
            r#"
            UPDATE
                registros_reclamo
            SET
                estado = $1,
                updated_at = $2
            WHERE
                id = $3
            RETURNING
                id,
                cuadrilla_id,
                reclamo_id,
                reclamo,
                fecha,
                prioridad,
                detalle,
                ubicacion,
                barrio,
                estado,
                created_at,
                updated_at
            "#,
        )
        .bind(estado)
        .bind(now)
        .bind(registro_id)
        .fetch_one(&mut *tx)
        .await?;

        let abiertos = count_abiertos(&mut tx, cuadrilla_id).await?;
        let disponible = capacity::is_available(abiertos, cuadrilla.limite_reclamos_simultaneos);

        sqlx::query("UPDATE cuadrillas SET disponible = $1, updated_at = $2 WHERE id = $3")
            .bind(disponible)
            .bind(now)
            .bind(cuadrilla_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(registro))
    }
}
