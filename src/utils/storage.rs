use web_sys::{window, Storage};

/// localStorage del navegador (None fuera del navegador o en modo privado)
pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}
