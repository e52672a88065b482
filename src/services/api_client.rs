// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP al backend de progreso
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, Response};

use crate::errors::{ProgressError, ProgressResult};
use crate::models::{ProgressUpsertRequest, RemoteProgress};

/// API remota de progreso
#[async_trait(?Send)]
pub trait ProgressApi {
    /// GET /progress?profileId=...
    async fn fetch_progress(&self, profile_id: &str) -> ProgressResult<Vec<RemoteProgress>>;

    /// POST /progress (upsert)
    async fn upsert_progress(&self, request: &ProgressUpsertRequest) -> ProgressResult<RemoteProgress>;
}

/// Cliente API sobre fetch (gloo-net)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_status(response: Response) -> ProgressResult<Response> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| response.status_text());
        Err(ProgressError::Http {
            status,
            message: error_text,
        })
    }
}

#[async_trait(?Send)]
impl ProgressApi for ApiClient {
    async fn fetch_progress(&self, profile_id: &str) -> ProgressResult<Vec<RemoteProgress>> {
        let url = format!("{}/progress", self.base_url);

        log::info!("📥 Obteniendo progreso de {}", profile_id);

        let response = Request::get(&url)
            .query([("profileId", profile_id)])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let rows = response.json::<Vec<RemoteProgress>>().await?;
        log::info!("✅ {} filas de progreso recibidas", rows.len());
        Ok(rows)
    }

    async fn upsert_progress(&self, request: &ProgressUpsertRequest) -> ProgressResult<RemoteProgress> {
        let url = format!("{}/progress", self.base_url);

        log::info!(
            "📤 Guardando progreso: level {} ({} ⭐, {} xp)",
            request.level,
            request.stars,
            request.xp
        );

        let response = Request::post(&url).json(request)?.send().await?;
        let response = Self::check_status(response).await?;

        Ok(response.json::<RemoteProgress>().await?)
    }
}
