//! Error types.
//!
//! Recoverable failures of the progression economy and run sequencing,
//! plus configuration problems detected while loading content.
//! Rejected combat inputs are not errors: turn operations return `None`.

use crate::content::CharacterId;
use thiserror::Error;

/// Invalid game configuration.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::ConfigError;
///
/// let err = ConfigError::NonPositiveSpeed { owner: "Weak Grunt".into() };
/// assert_eq!(err.to_string(), "Weak Grunt has non-positive speed");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A speed of zero would make the turn order undefined.
    #[error("{owner} has non-positive speed")]
    NonPositiveSpeed { owner: String },

    #[error("level bonus table has {found} entries, expected {expected}")]
    LevelBonusTable { expected: usize, found: usize },

    #[error("max level must be at least 1")]
    ZeroMaxLevel,

    #[error("{power} power cards do not fit a grid of {total}")]
    TooManyPowerCards { power: usize, total: usize },

    #[error("level up requires {required} flips but the grid only has {total} cards")]
    LevelUpThreshold { required: usize, total: usize },

    #[error("invalid power card range for {stat}: {min}..={max}")]
    InvalidCardRange { stat: String, min: u32, max: u32 },

    #[error("{name} knows {found} moves but needs {expected} for max level")]
    NotEnoughMoves {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{name} has no moves")]
    NoMoves { name: String },

    #[error("move {name} has accuracy {accuracy} outside 0..=100")]
    InvalidAccuracy { name: String, accuracy: u32 },

    #[error("duplicate character id {0}")]
    DuplicateCharacter(CharacterId),

    #[error("unknown character id {0}")]
    UnknownCharacter(CharacterId),

    #[error("no character is unlocked by default")]
    NoStartingCharacter,

    #[error("run has no waves")]
    NoWaves,

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to read config: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Failed progression operation. Nothing was changed.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::ProgressionError;
///
/// let err = ProgressionError::InsufficientFunds { needed: 3, available: 2 };
/// assert!(err.to_string().contains("need 3"));
/// assert!(!err.is_invalid_action());
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("not enough flip tokens: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("character {id} is already at max level {level}")]
    MaxLevel { id: CharacterId, level: u8 },

    #[error("character {id} has {flipped} cards flipped, {required} needed to level up")]
    NotEnoughFlips {
        id: CharacterId,
        flipped: usize,
        required: usize,
    },

    #[error("unknown character id {0}")]
    UnknownCharacter(CharacterId),

    #[error("character {0} is locked")]
    CharacterLocked(CharacterId),

    #[error("card index {index} out of range (grid has {total} cards)")]
    CardIndexOutOfRange { index: usize, total: usize },
}

impl ProgressionError {
    /// Level-up attempted below the card threshold or at max level.
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            ProgressionError::MaxLevel { .. } | ProgressionError::NotEnoughFlips { .. }
        )
    }
}

/// Misuse of the run sequence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunError {
    #[error("a run is already in progress")]
    RunInProgress,

    #[error("no run in progress")]
    NoActiveRun,

    #[error("no character unlock is on offer")]
    NoUnlockOffered,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),
}
