// ============================================================================
// LECTIO PROGRESS - PROGRESO OFFLINE-FIRST DE LOS READING GAMES (RUST + WASM)
// ============================================================================
// - Models: registros de progreso, catálogo de juegos, resultados de sync
// - Services: caché local, cliente API, motor de sincronización, red
// - State: conectividad + pasadas en curso con Rc<RefCell>
// - Bindings: fachada JS (`ReadingProgress`)
// ============================================================================

pub mod bindings;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

pub use bindings::ReadingProgress;
pub use errors::{ProgressError, ProgressResult};
pub use models::{GameId, ProgressRecord, SyncResult};
pub use services::ProgressSyncEngine;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    if config::CONFIG.is_logging_enabled() {
        wasm_logger::init(Config::default());
    }
    log::info!("🚀 Lectio Progress - Reading Games offline-first");

    Ok(())
}
