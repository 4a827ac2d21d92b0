//! Fixed-point multipliers.
//!
//! Level bonuses (1.0, 1.1, 1.2) and the boss stat multiplier (1.5) are
//! stored as whole percentages so that `floor(base * multiplier)` is
//! computed exactly in integer arithmetic, with no `f64` rounding drift.
//! In JSON they are plain decimal factors, rounded to the nearest percent
//! on load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative multiplier stored as a whole percentage.
///
/// Serialized as the decimal factor (`1.1` for ×1.1).
///
/// # Examples
///
/// ```rust
/// use buffbrawl::Multiplier;
///
/// let bonus = Multiplier::from_percent(110);
/// assert_eq!(bonus.apply_floor(15), 16); // floor(16.5)
/// assert_eq!(bonus.apply_floor(50), 55);
/// assert_eq!(Multiplier::IDENTITY.apply_floor(7), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Multiplier(u32);

impl Multiplier {
    /// ×1.0
    pub const IDENTITY: Multiplier = Multiplier(100);

    pub const fn from_percent(percent: u32) -> Self {
        Self(percent)
    }

    /// The multiplier in whole percent, `110` for ×1.1.
    pub fn percent(self) -> u32 {
        self.0
    }

    /// Multiply `base` and truncate toward zero.
    pub fn apply_floor(self, base: u32) -> u32 {
        let scaled = u64::from(base) * u64::from(self.0) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// Bonus over ×1.0 in whole percent, e.g. `10` for ×1.1.
    pub fn bonus_percent(self) -> u32 {
        self.0.saturating_sub(100)
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = String;

    fn try_from(factor: f64) -> Result<Self, Self::Error> {
        let percent = (factor * 100.0).round();
        if !percent.is_finite() || percent < 0.0 || percent > f64::from(u32::MAX) {
            return Err(format!("multiplier {factor} out of range"));
        }
        Ok(Self(percent as u32))
    }
}

impl From<Multiplier> for f64 {
    fn from(multiplier: Multiplier) -> f64 {
        f64::from(multiplier.0) / 100.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bonus_truncation() {
        let lv2 = Multiplier::from_percent(110);
        let lv3 = Multiplier::from_percent(120);
        assert_eq!(lv2.apply_floor(10), 11);
        assert_eq!(lv2.apply_floor(15), 16);
        assert_eq!(lv3.apply_floor(15), 18);
        assert_eq!(lv3.apply_floor(10), 12);
    }

    #[test]
    fn test_boss_multiplier() {
        let boss = Multiplier::from_percent(150);
        assert_eq!(boss.apply_floor(40), 60);
        assert_eq!(boss.apply_floor(30), 45);
        assert_eq!(boss.apply_floor(11), 16);
    }

    #[test]
    fn test_display_and_bonus() {
        assert_eq!(Multiplier::from_percent(110).to_string(), "x1.10");
        assert_eq!(Multiplier::from_percent(120).bonus_percent(), 20);
        assert_eq!(Multiplier::IDENTITY.bonus_percent(), 0);
    }

    #[test]
    fn test_serde_decimal_factor() {
        let json = serde_json::to_string(&Multiplier::from_percent(150)).unwrap();
        assert_eq!(json, "1.5");
        let back: Multiplier = serde_json::from_str("1.1").unwrap();
        assert_eq!(back, Multiplier::from_percent(110));
        let whole: Multiplier = serde_json::from_str("2").unwrap();
        assert_eq!(whole, Multiplier::from_percent(200));

        assert!(serde_json::from_str::<Multiplier>("-0.5").is_err());
    }
}
