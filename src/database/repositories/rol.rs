use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::{models::RolPermisos, store::RolStore};
use crate::error::AppError;

#[derive(Clone)]
pub struct RolRepository {
    pool: PgPool,
}

impl RolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolStore for RolRepository {
    async fn find_rol(&self, rol: &str) -> Result<Option<RolPermisos>, AppError> {
        let rol = sqlx::query_as::<_, RolPermisos>(
            "SELECT rol, permisos, updated_at FROM roles WHERE rol = $1",
        )
        .bind(rol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rol)
    }

    async fn upsert_permisos(
        &self,
        rol: &str,
        permisos: &[String],
    ) -> Result<RolPermisos, AppError> {
        let rol = sqlx::query_as::<_, RolPermisos>(
            r#"
            INSERT INTO
                roles (rol, permisos, updated_at)
            VALUES
                ($1, $2, $3)
            ON CONFLICT (rol) DO UPDATE
            SET
                permisos = EXCLUDED.permisos,
                updated_at = EXCLUDED.updated_at
            RETURNING
                rol,
                permisos,
                updated_at
            "#,
        )
        .bind(rol)
        .bind(permisos)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(rol)
    }
}
