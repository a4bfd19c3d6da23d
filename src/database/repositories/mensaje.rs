use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{
    models::{Mensaje, NuevoMensaje},
    store::MensajeStore,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct MensajeRepository {
    pool: PgPool,
}

impl MensajeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MensajeStore for MensajeRepository {
    async fn list_mensajes(&self, cuadrilla_id: i64) -> Result<Vec<Mensaje>, AppError> {
        let mensajes = sqlx::query_as::<_, Mensaje>(
            r#"
            SELECT
                id,
                cuadrilla_id,
                remitente,
                contenido,
                es_sistema,
                created_at
            FROM
                mensajes
            WHERE
                cuadrilla_id = $1
            ORDER BY
                created_at ASC,
                id ASC
            "#,
        )
        .bind(cuadrilla_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mensajes)
    }

    async fn create_mensaje(&self, nuevo: &NuevoMensaje) -> Result<Mensaje, AppError> {
        let mensaje = sqlx::query_as::<_, Mensaje>(
            r#"
            INSERT INTO
                mensajes (
                    cuadrilla_id,
                    remitente,
                    contenido,
                    es_sistema
                )
            VALUES
                ($1, $2, $3, $4)
            RETURNING
                id,
                cuadrilla_id,
                remitente,
                contenido,
                es_sistema,
                created_at
            "#,
        )
        .bind(nuevo.cuadrilla_id)
        .bind(&nuevo.remitente)
        .bind(&nuevo.contenido)
        .bind(nuevo.es_sistema)
        .fetch_one(&self.pool)
        .await?;

        Ok(mensaje)
    }
}
