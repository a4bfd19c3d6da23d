//! Client for the external complaints service, which owns the canonical
//! complaint record. This service only mirrors assignment state into it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Config;
use crate::database::models::EstadoReclamo;
use crate::error::AppError;

#[async_trait]
pub trait ComplaintsApi: Send + Sync {
    /// Marks the complaint as ASIGNADO to the given crew.
    async fn mark_assigned(&self, reclamo_id: i64, cuadrilla_id: i64) -> Result<(), AppError>;
}

#[derive(Debug, Serialize)]
struct ReclamoPatch {
    estado: EstadoReclamo,
    cuadrillaid: i64,
}

#[derive(Debug, Clone)]
pub struct HttpComplaintsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpComplaintsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::internal_server_error_message(format!(
                    "failed to build complaints HTTP client: {e}"
                ))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.complaints_api_url.clone(),
            Duration::from_secs(config.complaints_api_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ComplaintsApi for HttpComplaintsClient {
    async fn mark_assigned(&self, reclamo_id: i64, cuadrilla_id: i64) -> Result<(), AppError> {
        let url = format!("{}/reclamos/{}", self.base_url, reclamo_id);
        let body = ReclamoPatch {
            estado: EstadoReclamo::Asignado,
            cuadrillaid: cuadrilla_id,
        };

        let response = self
            .client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("PATCH {url} failed: {e}")))?;

        let status = response.status();
        log::debug!("Complaints service answered {} for reclamo {}", status, reclamo_id);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "PATCH {url} returned {status}: {body}"
            )));
        }

        Ok(())
    }
}
