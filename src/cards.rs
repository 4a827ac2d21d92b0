//! Training cards.
//!
//! Each character trains on a 3×3 grid of face-down cards. Six are power
//! cards carrying a small bonus to attack, defense or speed; three are
//! blanks. Contents are drawn once per grid and stay fixed until the
//! character levels up.

use crate::rng::GameRng;
use crate::stat::StatKind;
use serde::{Deserialize, Serialize};

/// Number of cards in a training grid.
pub const TOTAL_CARDS: usize = 9;

/// A full training grid.
pub type CardGrid = [Card; TOTAL_CARDS];

/// One training card.
///
/// Serialized with a `type` tag: `{"type":"power","stat":"attack","value":3}`
/// or `{"type":"blank"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Power { stat: StatKind, value: u32 },
    Blank,
}

impl Card {
    /// Bonus this card grants to `stat` once flipped.
    pub fn bonus_for(&self, stat: StatKind) -> u32 {
        match *self {
            Card::Power { stat: s, value } if s == stat && stat.is_trainable() => value,
            _ => 0,
        }
    }

    /// Whether the card carries a stat bonus.
    pub fn is_power(&self) -> bool {
        matches!(self, Card::Power { .. })
    }
}

/// Value range for power cards of one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerCardRange {
    pub stat: StatKind,
    pub min: u32,
    pub max: u32,
}

impl PowerCardRange {
    pub fn new(stat: StatKind, min: u32, max: u32) -> Self {
        Self { stat, min, max }
    }
}

/// Generate a fresh grid.
///
/// Draws `power_cards` power cards, each from a uniformly chosen range
/// with a uniform value inside it, fills the rest with blanks and shuffles
/// the whole grid. `power_cards` above [`TOTAL_CARDS`] is capped.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::cards::{generate_card_grid, PowerCardRange};
/// use buffbrawl::rng::SeededRng;
/// use buffbrawl::StatKind;
///
/// let ranges = [PowerCardRange::new(StatKind::Attack, 1, 5)];
/// let grid = generate_card_grid(&ranges, 6, &mut SeededRng::seed_from_u64(1));
/// assert_eq!(grid.iter().filter(|c| c.is_power()).count(), 6);
/// ```
pub fn generate_card_grid<R: GameRng>(
    ranges: &[PowerCardRange],
    power_cards: usize,
    rng: &mut R,
) -> CardGrid {
    let mut grid = [Card::Blank; TOTAL_CARDS];
    if !ranges.is_empty() {
        for slot in grid.iter_mut().take(power_cards) {
            let range = ranges[rng.pick_index(ranges.len())];
            let value = rng.range_inclusive(range.min, range.max);
            *slot = Card::Power {
                stat: range.stat,
                value,
            };
        }
    }
    rng.shuffle(&mut grid);
    grid
}
