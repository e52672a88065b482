// ============================================================================
// SERVICIO DE SINCRONIZACIÓN DE PROGRESO (OFFLINE-FIRST)
// ============================================================================
// Caché local por usuario + fusión "mejor resultado" + reconciliación con el
// backend. Ninguna operación pública devuelve error: ante un fallo remoto se
// degrada a la caché local.
// ============================================================================

use chrono::Utc;

use crate::config::SyncConfig;
use crate::errors::{ProgressError, ProgressResult};
use crate::models::{
    ConnectivityStatus, GameId, GameResult, MergePolicy, ProgressRecord, ProgressSummary,
    ProgressUpsertRequest, SyncResult,
};
use crate::services::api_client::ProgressApi;
use crate::services::offline_service::{LocalStore, OfflineService};
use crate::state::SyncStateWrapper;

/// Motor de sincronización de progreso
#[derive(Clone)]
pub struct ProgressSyncEngine<S: LocalStore, A: ProgressApi> {
    offline_service: OfflineService<S>,
    api: A,
    config: SyncConfig,
    state: SyncStateWrapper,
}

impl<S: LocalStore, A: ProgressApi> ProgressSyncEngine<S, A> {
    pub fn new(store: S, api: A, config: SyncConfig) -> Self {
        Self {
            offline_service: OfflineService::new(store, config.clone()),
            api,
            config,
            state: SyncStateWrapper::new(),
        }
    }

    pub fn state(&self) -> &SyncStateWrapper {
        &self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn connectivity(&self) -> ConnectivityStatus {
        self.state.get_connectivity()
    }

    pub fn read_local(&self, user_id: &str) -> Vec<ProgressRecord> {
        self.offline_service.read_local(user_id)
    }

    pub fn write_local(&self, user_id: &str, records: &[ProgressRecord]) {
        self.offline_service.write_local(user_id, records)
    }

    /// Resumen calculado solo con la caché local (sin red)
    pub fn local_summary(&self, user_id: &str) -> ProgressSummary {
        ProgressSummary::from_records(&self.read_local(user_id))
    }

    /// Un fallo de transporte marca offline; un 4xx/5xx prueba que el backend responde
    fn record_failure(&self, error: &ProgressError) {
        if error.is_transport() {
            self.state.record_remote_outcome(false);
        } else if error.is_remote() {
            self.state.record_remote_outcome(true);
        }
    }

    /// Guarda el resultado calculado por el juego al terminar la partida
    pub async fn record_game_result(
        &self,
        user_id: &str,
        game_id: GameId,
        result: GameResult,
    ) -> ProgressRecord {
        self.upsert_progress(user_id, game_id, result.stars, Some(result.score), result.completed)
            .await
    }

    /// Guarda el resultado de una partida: primero backend, si falla caché local
    pub async fn upsert_progress(
        &self,
        user_id: &str,
        game_id: GameId,
        stars: u8,
        score: Option<u32>,
        completed: bool,
    ) -> ProgressRecord {
        let attempt = ProgressRecord::new(game_id, stars, score.unwrap_or(0), completed);

        log::info!(
            "📊 Guardando progreso: {} ({} ⭐, score {}) para {}",
            game_id,
            attempt.stars,
            attempt.best_score,
            user_id
        );

        match self.push_remote(user_id, &attempt).await {
            Ok(confirmed) => {
                self.state.record_remote_outcome(true);
                log::info!("✅ Progreso guardado en el backend");
                confirmed
            }
            Err(e) => {
                self.record_failure(&e);
                log::error!("❌ Error guardando progreso (API), fallback a localStorage: {}", e);
                self.store_offline(user_id, attempt)
            }
        }
    }

    async fn push_remote(&self, user_id: &str, attempt: &ProgressRecord) -> ProgressResult<ProgressRecord> {
        let to_send = match self.config.merge_policy {
            MergePolicy::KeepBest => {
                let remote = self.fetch_remote_records(user_id).await?;
                attempt.merged_with(remote.iter().find(|r| r.game_id == attempt.game_id))
            }
            MergePolicy::RemoteWins => attempt.clone(),
        };

        let request =
            ProgressUpsertRequest::for_record(user_id, self.config.reading_games_world, &to_send);
        let echoed = self.api.upsert_progress(&request).await?;

        let confirmed = echoed
            .to_record(self.config.reading_games_world)
            .filter(|r| r.game_id == to_send.game_id)
            .unwrap_or_else(|| to_send.clone());

        Ok(ProgressRecord {
            completed: confirmed.completed || to_send.completed,
            last_played_at: Utc::now(),
            ..confirmed
        })
    }

    /// Fusiona con la caché local y la reescribe entera
    fn store_offline(&self, user_id: &str, attempt: ProgressRecord) -> ProgressRecord {
        let mut current = self.offline_service.read_local(user_id);
        let existing = current.iter().position(|r| r.game_id == attempt.game_id);

        let merged = ProgressRecord {
            last_played_at: Utc::now(),
            ..attempt.merged_with(existing.map(|i| &current[i]))
        };

        match existing {
            Some(index) => current[index] = merged.clone(),
            None => current.push(merged.clone()),
        }
        self.offline_service.write_local(user_id, &current);

        log::info!("💾 Progreso guardado offline, se sincronizará más tarde");
        merged
    }

    /// Progreso del usuario: backend si responde, si no la caché local
    pub async fn list_progress(&self, user_id: &str) -> Vec<ProgressRecord> {
        match self.fetch_remote_records(user_id).await {
            Ok(records) => {
                self.state.record_remote_outcome(true);
                records
            }
            Err(e) => {
                self.record_failure(&e);
                log::error!("❌ Error cargando progreso: {}", e);
                let local = self.offline_service.read_local(user_id);
                if !local.is_empty() {
                    log::info!("📦 Usando progreso offline (localStorage)");
                }
                local
            }
        }
    }

    async fn fetch_remote_records(&self, user_id: &str) -> ProgressResult<Vec<ProgressRecord>> {
        let rows = self.api.fetch_progress(user_id).await?;
        let world = self.config.reading_games_world;
        Ok(rows.iter().filter_map(|row| row.to_record(world)).collect())
    }

    /// Empuja la caché local al backend; la limpia solo si todo se envió
    pub async fn sync_local_to_server(&self, user_id: &str) -> SyncResult {
        let _guard = match self.state.try_begin_sync(user_id) {
            Some(guard) => guard,
            None => {
                log::warn!("⚠️ Sincronización ya en progreso para {}, saltando...", user_id);
                return SyncResult::default();
            }
        };

        let local = self.offline_service.read_local(user_id);
        if local.is_empty() {
            log::info!("📭 No hay progreso local pendiente");
            return SyncResult::default();
        }

        log::info!("🔄 Sincronizando {} registros locales", local.len());

        let snapshot = match self.config.merge_policy {
            MergePolicy::KeepBest => match self.fetch_remote_records(user_id).await {
                Ok(remote) => Some(remote),
                Err(e) => {
                    self.record_failure(&e);
                    log::error!("❌ No se pudo leer el progreso remoto: {}", e);
                    let result = SyncResult {
                        pushed: 0,
                        errors: local.len(),
                    };
                    self.state.set_last_result(result);
                    return result;
                }
            },
            MergePolicy::RemoteWins => None,
        };

        let mut result = SyncResult::default();
        let mut transport_errors = 0;
        for record in &local {
            let to_send = match &snapshot {
                Some(remote) => record.merged_with(remote.iter().find(|r| r.game_id == record.game_id)),
                None => record.clone(),
            };
            let request =
                ProgressUpsertRequest::for_record(user_id, self.config.reading_games_world, &to_send);

            match self.api.upsert_progress(&request).await {
                Ok(_) => result.pushed += 1,
                Err(e) => {
                    log::warn!("⚠️ Error enviando {}: {}", record.game_id, e);
                    if e.is_transport() {
                        transport_errors += 1;
                    }
                    result.errors += 1;
                }
            }
        }

        // Offline solo si ninguna petición obtuvo respuesta del backend
        self.state
            .record_remote_outcome(result.pushed > 0 || result.errors > transport_errors);

        if result.is_clean() {
            self.release_pushed(user_id, &local);
        }

        log::info!("🔄 Sync Reading Games: pushed={}, errors={}", result.pushed, result.errors);
        self.state.set_last_result(result);
        result
    }

    /// Quita de la caché solo lo enviado; lo escrito durante la pasada se queda
    fn release_pushed(&self, user_id: &str, pushed: &[ProgressRecord]) {
        let remaining: Vec<ProgressRecord> = self
            .offline_service
            .read_local(user_id)
            .into_iter()
            .filter(|record| !pushed.contains(record))
            .collect();

        if remaining.is_empty() {
            self.offline_service.clear_local(user_id);
        } else {
            log::info!("📝 {} registros nuevos durante la sync, se conservan", remaining.len());
            self.offline_service.write_local(user_id, &remaining);
        }
    }

    /// Health check ligero: GET /progress con un perfil centinela
    pub async fn is_reachable(&self) -> bool {
        let reachable = self
            .api
            .fetch_progress(&self.config.health_check_profile_id)
            .await
            .is_ok();
        self.state.record_remote_outcome(reachable);
        reachable
    }
}
