// ============================================================================
// BINDINGS WASM - Fachada JS del motor de progreso
// ============================================================================
// Los métodos async devuelven Promises con valores JSON-compatibles.
// ============================================================================

use std::rc::Rc;

use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::config::CONFIG;
use crate::errors::ProgressError;
use crate::models::{catalog, ConnectivityStatus, GameId, GameResult, SyncResult};
use crate::services::{ApiClient, AppStore, NetworkMonitor, ProgressSyncEngine};
use crate::utils::constants::MAX_STARS;

type BrowserEngine = ProgressSyncEngine<AppStore, ApiClient>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncReport {
    pushed: usize,
    errors: usize,
    summary: String,
}

impl From<SyncResult> for SyncReport {
    fn from(result: SyncResult) -> Self {
        Self {
            pushed: result.pushed,
            errors: result.errors,
            summary: result.summary(),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn parse_game(slug: &str) -> Result<GameId, JsValue> {
    GameId::from_slug(slug).ok_or_else(|| to_js_error(ProgressError::UnknownGame(slug.to_string())))
}

/// Los números de JS llegan como f64: negativos, NaN e infinitos se rechazan
fn js_count(value: f64, field: &str) -> Result<u32, ProgressError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProgressError::InvalidInput(format!("{} = {}", field, value)));
    }
    Ok(value.round().min(u32::MAX as f64) as u32)
}

fn js_stars(value: f64) -> Result<u8, ProgressError> {
    Ok(js_count(value, "stars")?.min(MAX_STARS as u32) as u8)
}

fn to_js_error(error: ProgressError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct ReadingProgress {
    engine: BrowserEngine,
    monitor: Rc<NetworkMonitor<AppStore, ApiClient>>,
}

#[wasm_bindgen]
impl ReadingProgress {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReadingProgress {
        let api = ApiClient::new(CONFIG.backend_url());
        log::info!("📚 ReadingProgress listo ({})", api.base_url());
        let engine = ProgressSyncEngine::new(AppStore::detect(), api, CONFIG.sync_config.clone());
        let monitor = Rc::new(NetworkMonitor::new(engine.clone()));
        ReadingProgress { engine, monitor }
    }

    #[wasm_bindgen(js_name = upsertProgress)]
    pub fn upsert_progress(
        &self,
        user_id: String,
        slug: String,
        stars: f64,
        score: Option<f64>,
        completed: bool,
    ) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let game_id = parse_game(&slug)?;
            let stars = js_stars(stars).map_err(to_js_error)?;
            let score = score
                .map(|s| js_count(s, "score"))
                .transpose()
                .map_err(to_js_error)?;
            let record = engine
                .upsert_progress(&user_id, game_id, stars, score, completed)
                .await;
            to_js(&record)
        })
    }

    /// Estrellas y score de una partida a partir de aciertos y rondas
    #[wasm_bindgen(js_name = gameResult)]
    pub fn game_result(slug: &str, correct: f64, rounds: f64) -> Result<JsValue, JsValue> {
        let game_id = parse_game(slug)?;
        let correct = js_count(correct, "correct").map_err(to_js_error)?;
        let rounds = js_count(rounds, "rounds").map_err(to_js_error)?;
        to_js(&GameResult::from_rounds(game_id, correct, rounds))
    }

    #[wasm_bindgen(js_name = recordGameResult)]
    pub fn record_game_result(
        &self,
        user_id: String,
        slug: String,
        correct: f64,
        rounds: f64,
    ) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let game_id = parse_game(&slug)?;
            let correct = js_count(correct, "correct").map_err(to_js_error)?;
            let rounds = js_count(rounds, "rounds").map_err(to_js_error)?;
            let result = GameResult::from_rounds(game_id, correct, rounds);
            to_js(&engine.record_game_result(&user_id, game_id, result).await)
        })
    }

    #[wasm_bindgen(js_name = listProgress)]
    pub fn list_progress(&self, user_id: String) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move { to_js(&engine.list_progress(&user_id).await) })
    }

    #[wasm_bindgen(js_name = syncLocalToServer)]
    pub fn sync_local_to_server(&self, user_id: String) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move {
            let result = engine.sync_local_to_server(&user_id).await;
            to_js(&SyncReport::from(result))
        })
    }

    #[wasm_bindgen(js_name = isReachable)]
    pub fn is_reachable(&self) -> Promise {
        let engine = self.engine.clone();
        future_to_promise(async move { Ok(JsValue::from_bool(engine.is_reachable().await)) })
    }

    #[wasm_bindgen(js_name = readLocal)]
    pub fn read_local(&self, user_id: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.read_local(user_id))
    }

    pub fn summary(&self, user_id: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.local_summary(user_id))
    }

    /// "unknown" | "online" | "offline"
    pub fn connectivity(&self) -> String {
        match self.monitor.current_status() {
            ConnectivityStatus::Unknown => "unknown",
            ConnectivityStatus::Online => "online",
            ConnectivityStatus::Offline => "offline",
        }
        .to_string()
    }

    /// Sincroniza automáticamente el progreso de `user_id` al volver la red
    #[wasm_bindgen(js_name = startAutoSync)]
    pub fn start_auto_sync(&self, user_id: String) -> Result<(), JsValue> {
        self.monitor.set_active_user(Some(user_id));
        self.monitor.start_monitoring()
    }

    pub fn catalog() -> Result<JsValue, JsValue> {
        to_js(&catalog())
    }
}

impl Default for ReadingProgress {
    fn default() -> Self {
        Self::new()
    }
}
