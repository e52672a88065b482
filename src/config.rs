use serde::{Deserialize, Serialize};

use crate::models::sync::MergePolicy;
use crate::utils::constants::{
    BACKEND_URL, DEFAULT_AUTO_SYNC_DELAY_MS, HEALTH_CHECK_PROFILE_ID, PROGRESS_STORAGE_PREFIX,
    READING_GAMES_WORLD,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub enable_logging: bool,
    pub sync_config: SyncConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: BACKEND_URL.to_string(),
            enable_logging: true,
            sync_config: SyncConfig::default(),
        }
    }
}

/// Parámetros del motor de sincronización de progreso
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Valor de `world` reservado para los Reading Games en el backend
    pub reading_games_world: u32,
    pub storage_prefix: String,
    pub health_check_profile_id: String,
    pub merge_policy: MergePolicy,
    pub auto_sync_delay_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reading_games_world: READING_GAMES_WORLD,
            storage_prefix: PROGRESS_STORAGE_PREFIX.to_string(),
            health_check_profile_id: HEALTH_CHECK_PROFILE_ID.to_string(),
            merge_policy: MergePolicy::KeepBest,
            auto_sync_delay_ms: DEFAULT_AUTO_SYNC_DELAY_MS,
        }
    }
}

impl SyncConfig {
    /// Clave de localStorage para un usuario
    pub fn storage_key(&self, user_id: &str) -> String {
        format!("{}{}", self.storage_prefix, user_id)
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = SyncConfig::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .unwrap_or(BACKEND_URL).to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            sync_config: SyncConfig {
                reading_games_world: option_env!("READING_GAMES_WORLD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.reading_games_world),
                storage_prefix: option_env!("PROGRESS_STORAGE_PREFIX")
                    .map(|s| s.to_string())
                    .unwrap_or(defaults.storage_prefix),
                health_check_profile_id: option_env!("HEALTH_CHECK_PROFILE_ID")
                    .map(|s| s.to_string())
                    .unwrap_or(defaults.health_check_profile_id),
                merge_policy: option_env!("MERGE_POLICY")
                    .and_then(MergePolicy::parse)
                    .unwrap_or(defaults.merge_policy),
                auto_sync_delay_ms: option_env!("AUTO_SYNC_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.auto_sync_delay_ms),
            },
        }
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sync_config_matches_backend_convention() {
        let config = SyncConfig::default();
        assert_eq!(config.reading_games_world, 4);
        assert_eq!(config.merge_policy, MergePolicy::KeepBest);
        assert_eq!(config.storage_key("abc"), "rg-progress:abc");
    }

    #[test]
    fn backend_url_drops_trailing_slash() {
        let config = AppConfig {
            backend_url: "http://localhost:3000/api/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.backend_url(), "http://localhost:3000/api");
    }
}
