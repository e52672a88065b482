/// URL base del backend
/// Configurada en tiempo de compilación:
/// - Desarrollo: http://localhost:3000/api (por defecto)
/// - Producción: via BACKEND_URL env var
pub const BACKEND_URL: &str = match option_env!("BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:3000/api",
};

/// Convención del backend: world 4 = Reading Games
pub const READING_GAMES_WORLD: u32 = 4;

pub const PROGRESS_STORAGE_PREFIX: &str = "rg-progress:";

/// Perfil ficticio usado para el health check (GET /progress devuelve vacío)
pub const HEALTH_CHECK_PROFILE_ID: &str = "health-check";

pub const DEFAULT_AUTO_SYNC_DELAY_MS: u32 = 1_500;

pub const MAX_STARS: u8 = 3;
