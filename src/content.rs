//! Static game content: characters, moves and monsters.
//!
//! Definitions are immutable and loaded once as part of
//! [`GameConfig`](crate::config::GameConfig).

use crate::effect::MoveEffect;
use crate::numeric::Multiplier;
use crate::stat::StatBlock;
use serde::{Deserialize, Serialize};

pub type CharacterId = u32;

fn full_accuracy() -> u32 {
    100
}

/// A move a combatant can use.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::{Move, MoveEffect, StatKind};
///
/// let dash = Move::new("Dash", 0, 90)
///     .with_effect(MoveEffect::StatBuff { stat: StatKind::Speed, value: 5 });
/// assert!(dash.is_utility());
///
/// let claw = Move::new("Claw", 10, 100);
/// assert!(!claw.is_utility());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub name: String,
    /// Damage rating, 0 for pure utility moves.
    pub damage: u32,
    /// Hit chance in percent, `[0, 100]`. Ignored for monster moves.
    #[serde(default = "full_accuracy")]
    pub accuracy: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<MoveEffect>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Move {
    pub fn new(name: impl Into<String>, damage: u32, accuracy: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            accuracy,
            effects: Vec::new(),
            description: String::new(),
        }
    }

    /// Append an effect; effects apply in order.
    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A buff/defense move: no damage and at least one effect.
    ///
    /// Utility moves always target the user and never count as an attack,
    /// so the opponent's block does not apply to them.
    pub fn is_utility(&self) -> bool {
        self.damage == 0 && !self.effects.is_empty()
    }
}

/// A playable character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDefinition {
    pub id: CharacterId,
    pub name: String,
    pub base: StatBlock,
    /// Moves in unlock order; level `n` knows the first `n`.
    pub moves: Vec<Move>,
    /// Portrait per level, index 0 for level 1.
    #[serde(default)]
    pub portraits: Vec<String>,
    #[serde(default)]
    pub unlocked_by_default: bool,
}

impl CharacterDefinition {
    /// Moves available at `level`: `moves[0 .. level)`.
    pub fn unlocked_moves(&self, level: u8) -> &[Move] {
        let count = usize::from(level).min(self.moves.len());
        &self.moves[..count]
    }

    /// The move learned on reaching `level`.
    pub fn move_learned_at(&self, level: u8) -> Option<&Move> {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.moves.get(idx))
    }

    /// Portrait path for `level`, if one is configured.
    pub fn portrait(&self, level: u8) -> Option<&str> {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.portraits.get(idx))
            .map(String::as_str)
    }
}

/// A scripted opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDefinition {
    pub name: String,
    pub stats: StatBlock,
    pub moves: Vec<Move>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MonsterDefinition {
    /// Instantiate as a regular wave enemy.
    pub fn instantiate(&self) -> MonsterInstance {
        MonsterInstance {
            name: self.name.clone(),
            stats: self.stats,
            moves: self.moves.clone(),
            is_boss: false,
        }
    }

    /// Instantiate as a boss, every stat scaled by `multiplier`.
    pub fn instantiate_boss(&self, multiplier: Multiplier) -> MonsterInstance {
        let stats = StatBlock::new(
            multiplier.apply_floor(self.stats.hp),
            multiplier.apply_floor(self.stats.attack),
            multiplier.apply_floor(self.stats.defense),
            multiplier.apply_floor(self.stats.speed),
        );
        MonsterInstance {
            name: self.name.clone(),
            stats,
            moves: self.moves.clone(),
            is_boss: true,
        }
    }
}

/// A monster ready to fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterInstance {
    pub name: String,
    pub stats: StatBlock,
    pub moves: Vec<Move>,
    pub is_boss: bool,
}
