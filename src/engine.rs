//! Stat engine module.
//!
//! Provides the `StatEngine` type, which turns a character's definition,
//! level and flipped training cards into effective combat stats:
//!
//! ```text
//! floor(base × levelBonus) + Σ flipped power cards of that stat
//! ```
//!
//! HP is level-scaled but receives no card bonus.

use crate::cards::CardGrid;
use crate::content::CharacterDefinition;
use crate::numeric::Multiplier;
use crate::resolved::{ResolvedStat, ResolvedStats};
use crate::source::{FlippedCardSource, LevelScaledBase, StatSource};
use crate::stat::{StatBlock, StatKind};

/// Sums registered sources into effective stats.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::source::LevelScaledBase;
/// use buffbrawl::{Multiplier, StatBlock, StatEngine, StatKind};
///
/// let mut engine = StatEngine::new();
/// engine.register_source(Box::new(LevelScaledBase::new(
///     StatBlock::new(50, 10, 10, 15),
///     1,
///     Multiplier::IDENTITY,
/// )));
///
/// let resolved = engine.resolve();
/// assert_eq!(resolved.value(StatKind::Speed), 15);
/// ```
pub struct StatEngine {
    sources: Vec<Box<dyn StatSource>>,
}

impl StatEngine {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Build the engine for one character.
    ///
    /// Only cards that are both present in `grid` and marked in `flipped`
    /// are registered. A missing grid contributes nothing.
    pub fn for_character(
        definition: &CharacterDefinition,
        level: u8,
        level_bonus: Multiplier,
        grid: Option<&CardGrid>,
        flipped: &[bool],
    ) -> Self {
        let mut engine = Self::new();
        engine.register_source(Box::new(LevelScaledBase::new(
            definition.base,
            level,
            level_bonus,
        )));
        if let Some(grid) = grid {
            for (index, (card, _)) in grid
                .iter()
                .zip(flipped)
                .enumerate()
                .filter(|(_, (card, flipped))| **flipped && card.is_power())
            {
                engine.register_source(Box::new(FlippedCardSource::new(index, *card)));
            }
        }
        engine
    }

    /// Register a source. Sources are summed in registration order.
    pub fn register_source(&mut self, source: Box<dyn StatSource>) {
        self.sources.push(source);
    }

    /// Resolve all four stats with breakdowns.
    pub fn resolve(&self) -> ResolvedStats {
        let entries = StatKind::ALL
            .iter()
            .map(|&stat| {
                let mut resolved = ResolvedStat::new(stat);
                for source in &self.sources {
                    resolved.add_source(source.describe(), source.get_value(stat));
                }
                resolved
            })
            .collect();
        ResolvedStats::new(entries)
    }

    /// Resolve straight to plain values.
    pub fn resolve_block(&self) -> StatBlock {
        self.resolve().to_block()
    }
}

impl Default for StatEngine {
    fn default() -> Self {
        Self::new()
    }
}
