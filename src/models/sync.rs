use serde::{Deserialize, Serialize};
use std::fmt;

/// Resumen de una pasada de sincronización (no se persiste)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub pushed: usize,
    pub errors: usize,
}

impl SyncResult {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    /// Texto para el botón "forzar sincronización"
    pub fn summary(&self) -> String {
        let errors = if self.errors == 1 { "error" } else { "errors" };
        format!("Synced: {} sent, {} {}", self.pushed, self.errors, errors)
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Estado de conectividad observado (badge online/offline)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Unknown,
    Online,
    Offline,
}

impl ConnectivityStatus {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            ConnectivityStatus::Online
        } else {
            ConnectivityStatus::Offline
        }
    }
}

/// Qué hacer cuando el backend responde en upsert
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// max(nuevo, servidor) también en el camino online
    KeepBest,
    /// El último resultado online sobrescribe el del servidor
    RemoteWins,
}

impl MergePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep_best" | "keep-best" => Some(MergePolicy::KeepBest),
            "remote_wins" | "remote-wins" => Some(MergePolicy::RemoteWins),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_text() {
        let result = SyncResult { pushed: 3, errors: 1 };
        assert_eq!(result.to_string(), "Synced: 3 sent, 1 error");
        assert_eq!(SyncResult::default().summary(), "Synced: 0 sent, 0 errors");
    }

    #[test]
    fn merge_policy_parsing() {
        assert_eq!(MergePolicy::parse("KEEP_BEST"), Some(MergePolicy::KeepBest));
        assert_eq!(MergePolicy::parse("remote-wins"), Some(MergePolicy::RemoteWins));
        assert_eq!(MergePolicy::parse("whatever"), None);
    }
}
