// ============================================================================
// SERVICIO OFFLINE - CACHÉ LOCAL DE PROGRESO
// ============================================================================
// Caché "best effort": una entrada JSON por usuario.
// Datos corruptos = sin datos; errores de escritura se loguean y se ignoran.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use web_sys::Storage;

use crate::config::SyncConfig;
use crate::errors::{ProgressError, ProgressResult};
use crate::models::ProgressRecord;
use crate::utils::storage::get_local_storage;

/// Almacenamiento clave-valor síncrono (localStorage o memoria)
pub trait LocalStore {
    fn get_item(&self, key: &str) -> ProgressResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> ProgressResult<()>;
    fn remove_item(&self, key: &str) -> ProgressResult<()>;
}

/// localStorage del navegador
#[derive(Clone)]
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn new() -> Option<Self> {
        get_local_storage().map(|storage| Self { storage })
    }
}

impl LocalStore for BrowserStorage {
    fn get_item(&self, key: &str) -> ProgressResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|_| ProgressError::Storage("Error leyendo localStorage".to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> ProgressResult<()> {
        // QuotaExceededError llega aquí
        self.storage
            .set_item(key, value)
            .map_err(|_| ProgressError::Storage("Error guardando en localStorage".to_string()))
    }

    fn remove_item(&self, key: &str) -> ProgressResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|_| ProgressError::Storage("Error eliminando de localStorage".to_string()))
    }
}

/// Almacenamiento en memoria: fallback sin localStorage y backend de tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simula un almacenamiento lleno: toda escritura falla
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.borrow_mut() = read_only;
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> ProgressResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> ProgressResult<()> {
        if *self.read_only.borrow() {
            return Err(ProgressError::Storage("QuotaExceededError".to_string()));
        }
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ProgressResult<()> {
        if *self.read_only.borrow() {
            return Err(ProgressError::Storage("Storage bloqueado".to_string()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// localStorage si existe; memoria si no (modo privado, sin window)
#[derive(Clone)]
pub enum AppStore {
    Browser(BrowserStorage),
    Memory(MemoryStore),
}

impl AppStore {
    pub fn detect() -> Self {
        match BrowserStorage::new() {
            Some(storage) => AppStore::Browser(storage),
            None => {
                log::warn!("⚠️ localStorage no disponible, progreso solo en memoria");
                AppStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl LocalStore for AppStore {
    fn get_item(&self, key: &str) -> ProgressResult<Option<String>> {
        match self {
            AppStore::Browser(s) => s.get_item(key),
            AppStore::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> ProgressResult<()> {
        match self {
            AppStore::Browser(s) => s.set_item(key, value),
            AppStore::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> ProgressResult<()> {
        match self {
            AppStore::Browser(s) => s.remove_item(key),
            AppStore::Memory(s) => s.remove_item(key),
        }
    }
}

/// Lectura/escritura de la caché de progreso por usuario
#[derive(Clone)]
pub struct OfflineService<S: LocalStore> {
    store: S,
    config: SyncConfig,
}

impl<S: LocalStore> OfflineService<S> {
    pub fn new(store: S, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registros locales del usuario; vacío si no hay o si están corruptos
    pub fn read_local(&self, user_id: &str) -> Vec<ProgressRecord> {
        let key = self.config.storage_key(user_id);
        match self.store.get_item(&key) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<ProgressRecord>>(&json) {
                Ok(records) => records,
                Err(e) => {
                    log::warn!("⚠️ Caché local corrupta para {}, se ignora: {}", user_id, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer la caché local: {}", e);
                Vec::new()
            }
        }
    }

    /// Sobrescribe la caché del usuario (errores solo se loguean)
    pub fn write_local(&self, user_id: &str, records: &[ProgressRecord]) {
        if let Err(e) = self.try_write_local(user_id, records) {
            log::error!("❌ Error guardando progreso local: {}", e);
        }
    }

    fn try_write_local(&self, user_id: &str, records: &[ProgressRecord]) -> ProgressResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.set_item(&self.config.storage_key(user_id), &json)?;
        log::info!("💾 Progreso local guardado: {} registros", records.len());
        Ok(())
    }

    /// Borra la caché del usuario tras una sincronización completa
    pub fn clear_local(&self, user_id: &str) {
        match self.store.remove_item(&self.config.storage_key(user_id)) {
            Ok(()) => log::info!("🗑️ Caché local limpiada para {}", user_id),
            Err(e) => log::error!("❌ Error limpiando caché local: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameId;

    fn service() -> OfflineService<MemoryStore> {
        OfflineService::new(MemoryStore::new(), SyncConfig::default())
    }

    #[test]
    fn missing_entry_reads_empty() {
        assert!(service().read_local("u1").is_empty());
    }

    #[test]
    fn write_then_read() {
        let service = service();
        let records = vec![ProgressRecord::new(GameId::MagicSound, 2, 70, true)];
        service.write_local("u1", &records);
        assert_eq!(service.read_local("u1"), records);
        assert!(service.read_local("u2").is_empty());
    }

    #[test]
    fn corrupt_json_reads_empty() {
        let service = service();
        service.store().set_item("rg-progress:u1", "{not json").unwrap();
        assert!(service.read_local("u1").is_empty());

        service
            .store()
            .set_item("rg-progress:u1", r#"[{"gameSlug":"unknown-game","stars":1}]"#)
            .unwrap();
        assert!(service.read_local("u1").is_empty());
    }

    #[test]
    fn reads_cache_written_by_the_web_app() {
        let service = service();
        service
            .store()
            .set_item(
                "rg-progress:u1",
                r#"[{"gameSlug":"magic-story","stars":3,"best_score":9,"completed":true,"last_played_at":"2024-05-02T08:30:00.000Z"}]"#,
            )
            .unwrap();
        let records = service.read_local("u1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].game_id, GameId::MagicStory);
        assert_eq!(records[0].best_score, 9);
    }

    #[test]
    fn rejected_write_is_swallowed() {
        let service = service();
        service.store().set_read_only(true);
        service.write_local("u1", &[ProgressRecord::new(GameId::MagicSound, 1, 1, true)]);
        assert!(service.read_local("u1").is_empty());
    }

    #[test]
    fn clear_removes_only_that_user() {
        let service = service();
        let records = vec![ProgressRecord::new(GameId::HiddenWords, 1, 3, true)];
        service.write_local("u1", &records);
        service.write_local("u2", &records);
        service.clear_local("u1");
        assert!(service.read_local("u1").is_empty());
        assert_eq!(service.read_local("u2"), records);
        assert_eq!(service.store().len(), 1);
    }
}
