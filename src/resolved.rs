//! Resolved stat results module.
//!
//! Contains the `ResolvedStat` type, which represents a fully resolved
//! stat value with a breakdown of the sources that produced it.

use crate::stat::{StatBlock, StatKind};
use serde::{Deserialize, Serialize};

/// A resolved stat value with full breakdown information.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::{ResolvedStat, StatKind};
///
/// let mut resolved = ResolvedStat::new(StatKind::Attack);
/// resolved.add_source("Base", 10);
/// resolved.add_source("Card #3", 4);
/// resolved.add_source("Card #7", 0);
///
/// assert_eq!(resolved.value, 14);
/// assert_eq!(resolved.sources.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedStat {
    pub stat: StatKind,

    /// The final resolved value.
    pub value: u32,

    /// Breakdown of contributing sources, in registration order.
    ///
    /// Each entry is `(source_description, value)`. Sources that
    /// contribute nothing are left out.
    pub sources: Vec<(String, u32)>,
}

impl ResolvedStat {
    pub fn new(stat: StatKind) -> Self {
        Self {
            stat,
            value: 0,
            sources: Vec::new(),
        }
    }

    /// Add a source contribution to the value and the breakdown.
    pub fn add_source(&mut self, description: impl Into<String>, value: u32) {
        if value == 0 {
            return;
        }
        self.value = self.value.saturating_add(value);
        self.sources.push((description.into(), value));
    }
}

/// All four resolved stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedStats {
    entries: Vec<ResolvedStat>,
}

impl ResolvedStats {
    pub fn new(entries: Vec<ResolvedStat>) -> Self {
        Self { entries }
    }

    /// Resolved entry for `stat`, with its breakdown.
    pub fn get(&self, stat: StatKind) -> Option<&ResolvedStat> {
        self.entries.iter().find(|r| r.stat == stat)
    }

    /// Final value of `stat`, 0 when it was not resolved.
    pub fn value(&self, stat: StatKind) -> u32 {
        self.get(stat).map(|r| r.value).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedStat> {
        self.entries.iter()
    }

    /// Collapse into plain values.
    pub fn to_block(&self) -> StatBlock {
        StatBlock::new(
            self.value(StatKind::Hp),
            self.value(StatKind::Attack),
            self.value(StatKind::Defense),
            self.value(StatKind::Speed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_stat_creation() {
        let stat = ResolvedStat::new(StatKind::Hp);
        assert_eq!(stat.stat, StatKind::Hp);
        assert_eq!(stat.value, 0);
        assert!(stat.sources.is_empty());
    }

    #[test]
    fn test_resolved_stat_breakdown_order() {
        let mut stat = ResolvedStat::new(StatKind::Defense);
        stat.add_source("Base", 11);
        stat.add_source("Card #1", 2);
        stat.add_source("Card #9", 5);

        assert_eq!(stat.value, 18);
        assert_eq!(stat.sources[0].0, "Base");
        assert_eq!(stat.sources[2], ("Card #9".to_string(), 5));
    }

    #[test]
    fn test_resolved_stats_to_block() {
        let mut hp = ResolvedStat::new(StatKind::Hp);
        hp.add_source("Base", 50);
        let mut speed = ResolvedStat::new(StatKind::Speed);
        speed.add_source("Base", 15);
        speed.add_source("Card #2", 2);

        let stats = ResolvedStats::new(vec![hp, speed]);
        assert_eq!(stats.value(StatKind::Speed), 17);
        assert_eq!(stats.value(StatKind::Attack), 0);
        assert_eq!(stats.to_block(), StatBlock::new(50, 0, 0, 17));
    }
}
