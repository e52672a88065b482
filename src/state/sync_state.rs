// ============================================================================
// SYNC STATE - Conectividad observada + pasadas de sync en curso
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::models::{ConnectivityStatus, SyncResult};

/// Estado de sincronización compartido (un solo hilo, Rc<RefCell>)
#[derive(Clone)]
pub struct SyncStateWrapper {
    pub connectivity: Rc<RefCell<ConnectivityStatus>>,
    pub in_flight: Rc<RefCell<HashSet<String>>>,
    pub last_result: Rc<RefCell<Option<SyncResult>>>,
}

impl SyncStateWrapper {
    pub fn new() -> Self {
        Self {
            connectivity: Rc::new(RefCell::new(ConnectivityStatus::Unknown)),
            in_flight: Rc::new(RefCell::new(HashSet::new())),
            last_result: Rc::new(RefCell::new(None)),
        }
    }

    pub fn get_connectivity(&self) -> ConnectivityStatus {
        *self.connectivity.borrow()
    }

    pub fn set_connectivity(&self, status: ConnectivityStatus) {
        let previous = self.connectivity.replace(status);
        if previous != status {
            match status {
                ConnectivityStatus::Online => log::info!("🌐 Conectividad: ONLINE"),
                ConnectivityStatus::Offline => log::warn!("📴 Conectividad: OFFLINE"),
                ConnectivityStatus::Unknown => {}
            }
        }
    }

    /// Registra el resultado de una llamada remota
    pub fn record_remote_outcome(&self, success: bool) {
        self.set_connectivity(ConnectivityStatus::from_reachable(success));
    }

    /// Marca una pasada de sync para `user_id`; None si ya hay una en curso
    pub fn try_begin_sync(&self, user_id: &str) -> Option<InFlightGuard> {
        if !self.in_flight.borrow_mut().insert(user_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            in_flight: self.in_flight.clone(),
            user_id: user_id.to_string(),
        })
    }

    pub fn is_syncing(&self, user_id: &str) -> bool {
        self.in_flight.borrow().contains(user_id)
    }

    pub fn set_last_result(&self, result: SyncResult) {
        *self.last_result.borrow_mut() = Some(result);
    }

    pub fn get_last_result(&self) -> Option<SyncResult> {
        *self.last_result.borrow()
    }
}

impl Default for SyncStateWrapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Libera el flag "en curso" al terminar (o abandonar) la pasada
pub struct InFlightGuard {
    in_flight: Rc<RefCell<HashSet<String>>>,
    user_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.borrow_mut().remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown_and_follows_outcomes() {
        let state = SyncStateWrapper::new();
        assert_eq!(state.get_connectivity(), ConnectivityStatus::Unknown);
        state.record_remote_outcome(false);
        assert_eq!(state.get_connectivity(), ConnectivityStatus::Offline);
        state.record_remote_outcome(true);
        assert_eq!(state.get_connectivity(), ConnectivityStatus::Online);
    }

    #[test]
    fn guard_is_per_user_and_released_on_drop() {
        let state = SyncStateWrapper::new();
        let guard = state.try_begin_sync("u1").expect("first pass");
        assert!(state.try_begin_sync("u1").is_none());
        assert!(state.try_begin_sync("u2").is_some());
        assert!(state.is_syncing("u1"));
        drop(guard);
        assert!(!state.is_syncing("u1"));
        assert!(state.try_begin_sync("u1").is_some());
    }
}
