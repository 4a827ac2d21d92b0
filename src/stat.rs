//! Stat identifier module.
//!
//! Provides the `StatKind` enum naming the four combat stats and the
//! `StatBlock` value type that carries one integer per stat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four combat stats.
///
/// Serialized in lowercase (`"attack"`, `"defense"`, ...) so that saved
/// card grids and JSON content files read naturally.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::StatKind;
///
/// let atk: StatKind = "attack".parse().unwrap();
/// assert_eq!(atk, StatKind::Attack);
/// assert_eq!(atk.to_string(), "attack");
/// assert!(atk.is_trainable());
/// assert!(!StatKind::Hp.is_trainable());
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    Speed,
}

impl StatKind {
    /// All stats, in display order.
    pub const ALL: [StatKind; 4] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Speed,
    ];

    /// Get the lowercase name of this stat.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Hp => "hp",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
        }
    }

    /// Whether power cards may target this stat.
    ///
    /// HP never receives card bonuses.
    pub fn is_trainable(self) -> bool {
        !matches!(self, StatKind::Hp)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hp" => Ok(StatKind::Hp),
            "attack" => Ok(StatKind::Attack),
            "defense" => Ok(StatKind::Defense),
            "speed" => Ok(StatKind::Speed),
            other => Err(format!("unknown stat: {other}")),
        }
    }
}

/// Integer values for all four stats.
///
/// Used for character base stats, monster stats and the effective-stat
/// snapshot a combatant carries into battle.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::{StatBlock, StatKind};
///
/// let mut block = StatBlock::new(50, 10, 10, 15);
/// block.apply_delta(StatKind::Defense, -25);
/// assert_eq!(block.get(StatKind::Defense), 0);
///
/// block.apply_delta(StatKind::Speed, -100);
/// assert_eq!(block.get(StatKind::Speed), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatBlock {
    /// Lowest speed a combatant can be reduced to.
    ///
    /// The turn scheduler divides by speed, so it must stay positive.
    pub const MIN_SPEED: u32 = 1;

    pub fn new(hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp,
            attack,
            defense,
            speed,
        }
    }

    /// Value of one stat.
    pub fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
        }
    }

    /// Overwrite one stat.
    pub fn set(&mut self, stat: StatKind, value: u32) {
        match stat {
            StatKind::Hp => self.hp = value,
            StatKind::Attack => self.attack = value,
            StatKind::Defense => self.defense = value,
            StatKind::Speed => self.speed = value.max(Self::MIN_SPEED),
        }
    }

    /// Add a signed delta to one stat.
    ///
    /// The result saturates at zero, except speed which never drops
    /// below [`StatBlock::MIN_SPEED`].
    pub fn apply_delta(&mut self, stat: StatKind, delta: i32) {
        let current = i64::from(self.get(stat));
        let next = (current + i64::from(delta)).clamp(0, i64::from(u32::MAX));
        self.set(stat, next as u32);
    }
}
