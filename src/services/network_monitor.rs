// ============================================================================
// MONITOR DE ESTADO DE RED
// ============================================================================
// Escucha los eventos online/offline del navegador, actualiza el badge de
// conectividad y lanza una sincronización cuando vuelve la conexión.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Event};

use crate::models::ConnectivityStatus;
use crate::services::api_client::ProgressApi;
use crate::services::offline_service::LocalStore;
use crate::services::sync_service::ProgressSyncEngine;

/// Monitor de red ligado a un motor de sincronización
pub struct NetworkMonitor<S: LocalStore + Clone + 'static, A: ProgressApi + Clone + 'static> {
    engine: ProgressSyncEngine<S, A>,
    active_user: Rc<RefCell<Option<String>>>,
    // Flag para prevenir múltiples registros de listeners
    monitoring_started: Rc<Cell<bool>>,
}

impl<S: LocalStore + Clone + 'static, A: ProgressApi + Clone + 'static> NetworkMonitor<S, A> {
    pub fn new(engine: ProgressSyncEngine<S, A>) -> Self {
        // Estado inicial desde navigator.onLine
        if let Some(is_online) = navigator_on_line() {
            engine
                .state()
                .set_connectivity(ConnectivityStatus::from_reachable(is_online));
        }

        Self {
            engine,
            active_user: Rc::new(RefCell::new(None)),
            monitoring_started: Rc::new(Cell::new(false)),
        }
    }

    /// Usuario cuyo progreso se sincroniza al volver la conexión
    pub fn set_active_user(&self, user_id: Option<String>) {
        *self.active_user.borrow_mut() = user_id;
    }

    pub fn current_status(&self) -> ConnectivityStatus {
        self.engine.connectivity()
    }

    /// Registra los listeners una sola vez
    pub fn start_monitoring(&self) -> Result<(), JsValue> {
        if self.monitoring_started.replace(true) {
            log::warn!("⚠️ NetworkMonitor: start_monitoring ya fue llamado, ignorando llamada duplicada");
            return Ok(());
        }

        let window = window().ok_or_else(|| JsValue::from_str("No window"))?;

        let online_closure = Closure::wrap(Box::new({
            let engine = self.engine.clone();
            let active_user = self.active_user.clone();
            move |_event: Event| {
                log::info!("🌐 Network: ONLINE");
                engine.state().set_connectivity(ConnectivityStatus::Online);
                if let Some(user_id) = active_user.borrow().clone() {
                    schedule_sync(engine.clone(), user_id);
                }
            }
        }) as Box<dyn FnMut(Event)>);

        let offline_closure = Closure::wrap(Box::new({
            let engine = self.engine.clone();
            move |_event: Event| {
                log::warn!("📴 Network: OFFLINE");
                engine.state().set_connectivity(ConnectivityStatus::Offline);
            }
        }) as Box<dyn FnMut(Event)>);

        window.add_event_listener_with_callback("online", online_closure.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback("offline", offline_closure.as_ref().unchecked_ref())?;

        // Listeners de window: viven lo mismo que la página
        online_closure.forget();
        offline_closure.forget();

        log::info!("✅ NetworkMonitor: listeners registrados (solo una vez)");
        Ok(())
    }
}

/// Sync diferido: deja que la red se estabilice antes de empujar
fn schedule_sync<S, A>(engine: ProgressSyncEngine<S, A>, user_id: String)
where
    S: LocalStore + Clone + 'static,
    A: ProgressApi + Clone + 'static,
{
    let delay = engine.config().auto_sync_delay_ms;
    Timeout::new(delay, move || {
        spawn_local(async move {
            log::info!("🌐 Conexión restaurada - sincronizando progreso de {}", user_id);
            let result = engine.sync_local_to_server(&user_id).await;
            log::info!("🔄 {}", result);
        });
    })
    .forget();
}

fn navigator_on_line() -> Option<bool> {
    let window = window()?;
    let navigator = js_sys::Reflect::get(&window, &JsValue::from_str("navigator")).ok()?;
    js_sys::Reflect::get(&navigator, &JsValue::from_str("onLine"))
        .ok()?
        .as_bool()
}
