//! Stat sources module.
//!
//! Sources produce the additive contributions that make up a character's
//! effective stats. Sources are stateless and deterministic - the same
//! input always produces the same output.

use crate::cards::Card;
use crate::numeric::Multiplier;
use crate::stat::{StatBlock, StatKind};

/// Trait for stat sources.
///
/// Multiple sources for the same stat are summed together (additive).
///
/// # Examples
///
/// ```rust
/// use buffbrawl::source::{LevelScaledBase, StatSource};
/// use buffbrawl::{Multiplier, StatBlock, StatKind};
///
/// let source = LevelScaledBase::new(StatBlock::new(50, 10, 10, 15), 2, Multiplier::from_percent(110));
/// assert_eq!(source.get_value(StatKind::Hp), 55);
/// assert_eq!(source.get_value(StatKind::Speed), 16);
/// ```
pub trait StatSource: Send + Sync {
    /// Get the contribution of this source to `stat`.
    fn get_value(&self, stat: StatKind) -> u32;

    /// Human-readable label for breakdowns.
    fn describe(&self) -> String;
}

/// Base stats scaled by the level bonus, truncated per stat.
#[derive(Debug, Clone)]
pub struct LevelScaledBase {
    base: StatBlock,
    level: u8,
    bonus: Multiplier,
}

impl LevelScaledBase {
    pub fn new(base: StatBlock, level: u8, bonus: Multiplier) -> Self {
        Self { base, level, bonus }
    }
}

impl StatSource for LevelScaledBase {
    fn get_value(&self, stat: StatKind) -> u32 {
        self.bonus.apply_floor(self.base.get(stat))
    }

    fn describe(&self) -> String {
        format!("Base (Lv.{} {})", self.level, self.bonus)
    }
}

/// A flipped training card.
///
/// Contributes only to the stat it names, and never to HP.
#[derive(Debug, Clone)]
pub struct FlippedCardSource {
    index: usize,
    card: Card,
}

impl FlippedCardSource {
    pub fn new(index: usize, card: Card) -> Self {
        Self { index, card }
    }
}

impl StatSource for FlippedCardSource {
    fn get_value(&self, stat: StatKind) -> u32 {
        self.card.bonus_for(stat)
    }

    fn describe(&self) -> String {
        format!("Card #{}", self.index + 1)
    }
}
