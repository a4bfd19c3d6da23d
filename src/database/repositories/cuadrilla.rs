use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::database::{
    models::{Cuadrilla, CuadrillaInput, EstadoReclamo, TipoCuadrilla},
    store::CuadrillaStore,
};
use crate::error::AppError;
use crate::services::capacity;

#[derive(Debug, sqlx::FromRow)]
struct CuadrillaTipoRow {
    cuadrilla_id: i64,
    id: i64,
    nombre: String,
}

/// Locks the crew row for the rest of the transaction.
pub(crate) async fn lock_cuadrilla(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<Cuadrilla>, sqlx::Error> {
    sqlx::query_as::<_, Cuadrilla>(
        r#"
        SELECT
            id,
            nombre,
            telefono,
            disponible,
            ultima_asignacion,
            limite_reclamos_simultaneos,
            reclamos_asignados,
            created_at,
            updated_at
        FROM
            cuadrillas
        WHERE
            id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn count_abiertos(
    conn: &mut PgConnection,
    cuadrilla_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT
            COUNT(*)
        FROM
            registros_reclamo
        WHERE
            cuadrilla_id = $1
            AND estado <> ALL($2)
        "#,
    )
    .bind(cuadrilla_id)
    .bind(EstadoReclamo::terminal_values())
    .fetch_one(conn)
    .await
}

pub(crate) async fn attach_tipos(
    conn: &mut PgConnection,
    cuadrillas: &mut [Cuadrilla],
) -> Result<(), sqlx::Error> {
    if cuadrillas.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = cuadrillas.iter().map(|c| c.id).collect();
    let rows = sqlx::query_as::<_, CuadrillaTipoRow>(
        r#"
        SELECT
            ct.cuadrilla_id,
            t.id,
            t.nombre
        FROM
            cuadrilla_tipos ct
            INNER JOIN tipos_cuadrilla t ON t.id = ct.tipo_id
        WHERE
            ct.cuadrilla_id = ANY($1)
        ORDER BY
            t.nombre
        "#,
    )
    .bind(&ids)
    .fetch_all(conn)
    .await?;

    let mut by_cuadrilla: HashMap<i64, Vec<TipoCuadrilla>> = HashMap::new();
    for row in rows {
        by_cuadrilla
            .entry(row.cuadrilla_id)
            .or_default()
            .push(TipoCuadrilla {
                id: row.id,
                nombre: row.nombre,
            });
    }

    for cuadrilla in cuadrillas.iter_mut() {
        cuadrilla.tipos = by_cuadrilla.remove(&cuadrilla.id).unwrap_or_default();
    }

    Ok(())
}

async fn replace_tipos(
    conn: &mut PgConnection,
    cuadrilla_id: i64,
    tipo_ids: &[i64],
) -> Result<(), AppError> {
    let tipo_ids: Vec<i64> = tipo_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let existentes = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tipos_cuadrilla WHERE id = ANY($1)",
    )
    .bind(&tipo_ids)
    .fetch_one(&mut *conn)
    .await?;

    if existentes != tipo_ids.len() as i64 {
        return Err(AppError::BadRequest(
            "Uno o más tipos de cuadrilla no existen".to_string(),
        ));
    }

    sqlx::query("DELETE FROM cuadrilla_tipos WHERE cuadrilla_id = $1")
        .bind(cuadrilla_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO
            cuadrilla_tipos (cuadrilla_id, tipo_id)
        SELECT
            $1,
            UNNEST($2::BIGINT[])
        "#,
    )
    .bind(cuadrilla_id)
    .bind(&tipo_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[derive(Clone)]
pub struct CuadrillaRepository {
    pool: PgPool,
}

impl CuadrillaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CuadrillaStore for CuadrillaRepository {
    async fn list_cuadrillas(&self) -> Result<Vec<Cuadrilla>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let mut cuadrillas = sqlx::query_as::<_, Cuadrilla>(
            r#"
            SELECT
                id,
                nombre,
                telefono,
                disponible,
                ultima_asignacion,
                limite_reclamos_simultaneos,
                reclamos_asignados,
                created_at,
                updated_at
            FROM
                cuadrillas
            ORDER BY
                nombre,
                id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        attach_tipos(&mut conn, &mut cuadrillas).await?;

        Ok(cuadrillas)
    }

    async fn find_cuadrilla(&self, id: i64) -> Result<Option<Cuadrilla>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let cuadrilla = sqlx::query_as::<_, Cuadrilla>(
            r#"
            SELECT
                id,
                nombre,
                telefono,
                disponible,
                ultima_asignacion,
                limite_reclamos_simultaneos,
                reclamos_asignados,
                created_at,
                updated_at
            FROM
                cuadrillas
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(mut cuadrilla) = cuadrilla else {
            return Ok(None);
        };

        attach_tipos(&mut conn, std::slice::from_mut(&mut cuadrilla)).await?;

        Ok(Some(cuadrilla))
    }

    async fn create_cuadrilla(&self, input: &CuadrillaInput) -> Result<Cuadrilla, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut cuadrilla = sqlx::query_as::<_, Cuadrilla>(
            r#"
            INSERT INTO
                cuadrillas (
                    nombre,
                    telefono,
                    disponible,
                    limite_reclamos_simultaneos,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, TRUE, $3, $4, $4)
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
        .bind(input.nombre.trim())
        .bind(&input.telefono)
        .bind(input.limite())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        replace_tipos(&mut tx, cuadrilla.id, input.tipo_ids()).await?;
        attach_tipos(&mut tx, std::slice::from_mut(&mut cuadrilla)).await?;
        tx.commit().await?;

        Ok(cuadrilla)
    }

    async fn update_cuadrilla(
        &self,
        id: i64,
        input: &CuadrillaInput,
    ) -> Result<Option<Cuadrilla>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let Some(actual) = lock_cuadrilla(&mut tx, id).await? else {
            return Ok(None);
        };

        let limite = input.limite_or(actual.limite_reclamos_simultaneos);
        let abiertos = count_abiertos(&mut tx, id).await?;
        let disponible = capacity::is_available(abiertos, limite);

        let mut cuadrilla = sqlx::query_as::<_, Cuadrilla>(
            r#"
            UPDATE
                cuadrillas
            SET
                nombre = $1,
                telefono = $2,
                limite_reclamos_simultaneos = $3,
                disponible = $4,
                updated_at = $5
            WHERE
                id = $6
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
        .bind(input.nombre.trim())
        .bind(&input.telefono)
        .bind(limite)
        .bind(disponible)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(tipo_ids) = &input.tipo_ids {
            replace_tipos(&mut tx, id, tipo_ids).await?;
        }
        attach_tipos(&mut tx, std::slice::from_mut(&mut cuadrilla)).await?;
        tx.commit().await?;

        Ok(Some(cuadrilla))
    }

    async fn delete_cuadrilla(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cuadrillas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_tipos(&self) -> Result<Vec<TipoCuadrilla>, AppError> {
        let tipos = sqlx::query_as::<_, TipoCuadrilla>(
            "SELECT id, nombre FROM tipos_cuadrilla ORDER BY nombre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tipos)
    }

    async fn create_tipo(&self, nombre: &str) -> Result<TipoCuadrilla, AppError> {
        let result = sqlx::query_as::<_, TipoCuadrilla>(
            r#"
            INSERT INTO
                tipos_cuadrilla (nombre)
            VALUES
                ($1)
            RETURNING
                id,
                nombre
            "#,
        )
        .bind(nombre.trim())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(tipo) => Ok(tipo),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::BadRequest(format!("El tipo de cuadrilla '{}' ya existe", nombre.trim())),
            ),
            Err(e) => Err(e.into()),
        }
    }
}
