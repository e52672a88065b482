// ============================================================================
// CATÁLOGO DE READING GAMES
// ============================================================================
// Lista fija y ordenada: el `level` del backend es la posición (1-based)
// de cada juego en esta lista.
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::MAX_STARS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    MagicSound,
    GestureToLetter,
    FriendsOfSounds,
    MagicSyllables,
    HiddenWords,
    MagicStory,
}

impl GameId {
    pub const ALL: [GameId; 6] = [
        GameId::MagicSound,
        GameId::GestureToLetter,
        GameId::FriendsOfSounds,
        GameId::MagicSyllables,
        GameId::HiddenWords,
        GameId::MagicStory,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            GameId::MagicSound => "magic-sound",
            GameId::GestureToLetter => "gesture-to-letter",
            GameId::FriendsOfSounds => "friends-of-sounds",
            GameId::MagicSyllables => "magic-syllables",
            GameId::HiddenWords => "hidden-words",
            GameId::MagicStory => "magic-story",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.slug() == slug)
    }

    /// Posición 1-based en el catálogo
    pub fn level(self) -> u32 {
        Self::ALL
            .iter()
            .position(|g| *g == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(1)
    }

    pub fn from_level(level: u32) -> Option<Self> {
        let index = (level as usize).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn game_type(self) -> GameType {
        GameType::for_game(self)
    }

    pub fn title(self) -> &'static str {
        match self {
            GameId::MagicSound => "Le Son Magique",
            GameId::GestureToLetter => "Du Geste à la Lettre",
            GameId::FriendsOfSounds => "Les Amis des Sons",
            GameId::MagicSyllables => "Les Syllabes Magiques",
            GameId::HiddenWords => "Les Mots Cachés",
            GameId::MagicStory => "L'Histoire Magique",
        }
    }

    pub fn difficulty(self) -> u8 {
        match self {
            GameId::MagicSound | GameId::GestureToLetter => 1,
            GameId::FriendsOfSounds | GameId::MagicSyllables => 2,
            GameId::HiddenWords | GameId::MagicStory => 3,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Tipo de juego: selecciona qué UI se monta para un `GameId`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    SoundToLetter,
    GestureToLetter,
    CharacterSoundMatching,
    SyllableBuilder,
    WordToImage,
    SentenceComprehension,
}

impl GameType {
    pub fn for_game(game: GameId) -> Self {
        match game {
            GameId::MagicSound => GameType::SoundToLetter,
            GameId::GestureToLetter => GameType::GestureToLetter,
            GameId::FriendsOfSounds => GameType::CharacterSoundMatching,
            GameId::MagicSyllables => GameType::SyllableBuilder,
            GameId::HiddenWords => GameType::WordToImage,
            GameId::MagicStory => GameType::SentenceComprehension,
        }
    }
}

/// Entrada del catálogo tal como la consume la UI
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub slug: GameId,
    pub title: &'static str,
    pub difficulty_level: u8,
    pub game_type: GameType,
    pub category: &'static str,
}

impl From<GameId> for CatalogEntry {
    fn from(game: GameId) -> Self {
        Self {
            slug: game,
            title: game.title(),
            difficulty_level: game.difficulty(),
            game_type: game.game_type(),
            category: "reading-games",
        }
    }
}

pub fn catalog() -> Vec<CatalogEntry> {
    GameId::ALL.into_iter().map(CatalogEntry::from).collect()
}

fn raw_percentage(correct: u32, rounds: u32) -> f64 {
    if rounds == 0 {
        return 0.0;
    }
    correct.min(rounds) as f64 / rounds as f64 * 100.0
}

/// Porcentaje de aciertos redondeado (lo que los juegos guardan como score)
pub fn percentage_score(correct: u32, rounds: u32) -> u32 {
    raw_percentage(correct, rounds).round() as u32
}

/// 90% → 3, 70% → 2, 50% → 1
fn stars_for_percentage(percentage: f64) -> u8 {
    if percentage >= 90.0 {
        3
    } else if percentage >= 70.0 {
        2
    } else if percentage >= 50.0 {
        1
    } else {
        0
    }
}

/// Estrellas sobre el porcentaje ya redondeado
pub fn stars_for_score(correct: u32, rounds: u32) -> u8 {
    stars_for_percentage(percentage_score(correct, rounds) as f64)
}

pub fn clamp_stars(stars: u8) -> u8 {
    stars.min(MAX_STARS)
}

/// Resultado de una partida, entregado por el juego al terminar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub stars: u8,
    pub score: u32,
    pub completed: bool,
}

impl GameResult {
    /// MagicSound puntúa en aciertos brutos sin redondear; el resto en porcentaje
    pub fn from_rounds(game: GameId, correct: u32, rounds: u32) -> Self {
        let (stars, score) = match game {
            GameId::MagicSound => (
                stars_for_percentage(raw_percentage(correct, rounds)),
                correct.min(rounds),
            ),
            _ => (stars_for_score(correct, rounds), percentage_score(correct, rounds)),
        };
        Self {
            stars,
            score,
            completed: stars >= 1,
        }
    }
}
