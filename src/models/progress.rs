use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::catalog::{clamp_stars, GameId};

/// Progreso de un usuario en un juego (formato de la caché local)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "gameSlug")]
    pub game_id: GameId,
    pub stars: u8,
    pub best_score: u32,
    pub completed: bool,
    pub last_played_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn new(game_id: GameId, stars: u8, score: u32, completed: bool) -> Self {
        Self {
            game_id,
            stars: clamp_stars(stars),
            best_score: score,
            completed,
            last_played_at: Utc::now(),
        }
    }

    /// Fusión "mejor resultado": nunca baja estrellas ni puntuación
    pub fn merged_with(&self, previous: Option<&ProgressRecord>) -> ProgressRecord {
        match previous {
            Some(prev) => ProgressRecord {
                game_id: self.game_id,
                stars: clamp_stars(self.stars.max(prev.stars)),
                best_score: self.best_score.max(prev.best_score),
                completed: self.completed || prev.completed,
                last_played_at: self.last_played_at,
            },
            None => self.clone(),
        }
    }
}

/// Fila de progreso tal como la devuelve el backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProgress {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    pub world: u32,
    pub level: u32,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub attempts_count: u32,
    #[serde(default)]
    pub last_played_at: Option<DateTime<Utc>>,
}

impl RemoteProgress {
    /// Convierte la fila si pertenece al mundo de los Reading Games
    pub fn to_record(&self, reading_games_world: u32) -> Option<ProgressRecord> {
        if self.world != reading_games_world {
            return None;
        }
        let game_id = match GameId::from_level(self.level) {
            Some(game_id) => game_id,
            None => {
                log::warn!("⚠️ Nivel {} sin juego en el catálogo, ignorado", self.level);
                return None;
            }
        };
        let stars = clamp_stars(self.stars);
        Some(ProgressRecord {
            game_id,
            stars,
            best_score: self.xp,
            completed: stars >= 1,
            last_played_at: self.last_played_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Body de POST /progress (upsert en el backend)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpsertRequest {
    pub profile_id: String,
    pub world: u32,
    pub level: u32,
    pub stars: u8,
    pub xp: u32,
    pub attempts_count: u32,
}

impl ProgressUpsertRequest {
    pub fn for_record(profile_id: &str, world: u32, record: &ProgressRecord) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            world,
            level: record.game_id.level(),
            stars: record.stars,
            xp: record.best_score,
            attempts_count: 1,
        }
    }
}

/// Estadísticas para la página de progreso
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_stars: u32,
    pub max_stars: u32,
    pub completed_games: u32,
    pub catalog_len: u32,
    pub percent: u32,
}

impl ProgressSummary {
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        // Un registro por juego: si hubiera duplicados, el mejor
        let mut best: BTreeMap<GameId, ProgressRecord> = BTreeMap::new();
        for record in records {
            let merged = record.merged_with(best.get(&record.game_id));
            best.insert(record.game_id, merged);
        }

        let catalog_len = GameId::ALL.len() as u32;
        let max_stars = catalog_len * 3;
        let total_stars: u32 = best.values().map(|r| r.stars as u32).sum();
        let completed_games = best.values().filter(|r| r.completed).count() as u32;
        let percent = if max_stars == 0 {
            0
        } else {
            (total_stars as f64 / max_stars as f64 * 100.0).round() as u32
        };

        Self {
            total_stars,
            max_stars,
            completed_games,
            catalog_len,
            percent,
        }
    }
}
