//! Move resolution.
//!
//! Resolving a move is a pure function of the two combatants, the move
//! and one accuracy roll. The result describes what happened; callers
//! apply it with [`MoveOutcome::apply`].
//!
//! Order of steps for a player move:
//! 1. accuracy: `roll > accuracy` misses
//! 2. block: an attack into a guarding target is negated and clears the guard
//! 3. damage: `max(1, floor(attack + damage - damage × defense / 100))`
//! 4. effects, whether or not damage was dealt
//!
//! Monster moves skip the roll and carry no effects: every one is an
//! attack, so even a zero-rated move deals damage and can be blocked.

use crate::combat::Combatant;
use crate::content::Move;
use crate::effect::{Recipient, StatDelta};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

/// Rule set a move resolves under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRules {
    /// Accuracy roll, effects applied, utility moves bypass the guard.
    Player,
    /// Always hits as a plain attack; effects are ignored.
    Monster,
}

/// What a single move use did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub move_name: String,
    /// The accuracy roll, when one was made.
    pub roll: Option<f64>,
    pub missed: bool,
    pub blocked: bool,
    /// Damage dealt to the target before HP clamping.
    pub damage: u32,
    pub deltas: Vec<StatDelta>,
}

impl MoveOutcome {
    fn new(mv: &Move, roll: Option<f64>) -> Self {
        Self {
            move_name: mv.name.clone(),
            roll,
            missed: false,
            blocked: false,
            damage: 0,
            deltas: Vec::new(),
        }
    }

    /// Apply damage and deltas to the combatants.
    pub fn apply(&self, actor: &mut Combatant, target: &mut Combatant) {
        target.take_damage(self.damage);
        for delta in &self.deltas {
            match *delta {
                StatDelta::Stat { who, stat, amount } => match who {
                    Recipient::Actor => actor.apply_stat(stat, amount),
                    Recipient::Target => target.apply_stat(stat, amount),
                },
                StatDelta::Blocking { who, active } => match who {
                    Recipient::Actor => actor.blocking = active,
                    Recipient::Target => target.blocking = active,
                },
            }
        }
    }

    /// One log line describing the outcome, naming both sides.
    ///
    /// ```rust
    /// use buffbrawl::combat::Combatant;
    /// use buffbrawl::resolver::resolve_with_roll;
    /// use buffbrawl::{Move, MoveEffect, StatBlock};
    ///
    /// let wolf = Combatant::new("Wolf", StatBlock::new(50, 10, 10, 15));
    /// let grunt = Combatant::new("Grunt", StatBlock::new(30, 5, 5, 10));
    /// let roar = Move::new("Roar", 5, 75).with_effect(MoveEffect::EnemyDefenseDelta(-10));
    /// let outcome = resolve_with_roll(&wolf, &grunt, &roar, 0.0);
    /// assert_eq!(
    ///     outcome.narrate("Wolf", "Grunt"),
    ///     "Wolf used Roar! Dealt 14 damage. (Grunt defense -10)"
    /// );
    /// ```
    pub fn narrate(&self, actor: &str, target: &str) -> String {
        if self.missed {
            return format!("{actor}'s {} missed!", self.move_name);
        }
        if self.blocked {
            return format!("{target} blocked {actor}'s {}!", self.move_name);
        }
        let mut line = format!("{actor} used {}!", self.move_name);
        if self.damage > 0 {
            line.push_str(&format!(" Dealt {} damage.", self.damage));
        }
        let effects: Vec<String> = self
            .deltas
            .iter()
            .map(|delta| delta.describe(actor, target))
            .collect();
        if !effects.is_empty() {
            line.push_str(&format!(" ({})", effects.join(", ")));
        }
        line
    }
}

/// Whether `roll` in `[0, 100)` hits a move of `accuracy` percent.
///
/// Only `roll > accuracy` misses, so accuracy 0 still hits on a roll of
/// exactly 0.
pub fn is_hit(roll: f64, accuracy: u32) -> bool {
    roll <= f64::from(accuracy)
}

/// Damage of a hit.
///
/// Scales with the attacker's total attack plus the move's rating, minus
/// `defense` percent of the move's rating, floored, never below 1.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::resolver::compute_damage;
///
/// assert_eq!(compute_damage(10, 10, 10), 19);
/// assert_eq!(compute_damage(0, 1, 1000), 1);
/// ```
pub fn compute_damage(attack: u32, move_damage: u32, defense: u32) -> u32 {
    // Everything scaled by 100 so the percentage reduction stays exact.
    let raw = (i64::from(attack) + i64::from(move_damage)) * 100
        - i64::from(move_damage) * i64::from(defense);
    let floored = raw.div_euclid(100);
    u32::try_from(floored.max(1)).unwrap_or(u32::MAX)
}

/// Resolve a move under `rules`, drawing the accuracy roll from `rng`
/// when one is needed.
pub fn resolve_move<R: GameRng>(
    actor: &Combatant,
    target: &Combatant,
    mv: &Move,
    rules: MoveRules,
    rng: &mut R,
) -> MoveOutcome {
    match rules {
        MoveRules::Player => resolve_with_roll(actor, target, mv, rng.roll_percent()),
        MoveRules::Monster => resolve_monster_attack(actor, target, mv),
    }
}

/// Resolve a player move with a known accuracy roll.
pub fn resolve_with_roll(
    actor: &Combatant,
    target: &Combatant,
    mv: &Move,
    roll: f64,
) -> MoveOutcome {
    let mut outcome = MoveOutcome::new(mv, Some(roll));

    if !is_hit(roll, mv.accuracy) {
        outcome.missed = true;
        return outcome;
    }
    if !mv.is_utility() && consume_guard(&mut outcome, target) {
        return outcome;
    }

    if mv.damage > 0 {
        outcome.damage = compute_damage(actor.stats.attack, mv.damage, target.stats.defense);
    }

    outcome
        .deltas
        .extend(mv.effects.iter().map(|effect| effect.to_delta()));
    outcome
}

/// Resolve a monster move: no roll, no effects, always at least 1 damage
/// unless the target is guarding.
pub fn resolve_monster_attack(actor: &Combatant, target: &Combatant, mv: &Move) -> MoveOutcome {
    let mut outcome = MoveOutcome::new(mv, None);
    if consume_guard(&mut outcome, target) {
        return outcome;
    }
    outcome.damage = compute_damage(actor.stats.attack, mv.damage, target.stats.defense);
    outcome
}

/// Mark the outcome blocked when the target is guarding.
fn consume_guard(outcome: &mut MoveOutcome, target: &Combatant) -> bool {
    if !target.blocking {
        return false;
    }
    outcome.blocked = true;
    outcome.deltas.push(StatDelta::Blocking {
        who: Recipient::Target,
        active: false,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::MoveEffect;
    use crate::rng::ScriptedRng;
    use crate::stat::{StatBlock, StatKind};

    fn fighter(attack: u32, defense: u32) -> Combatant {
        Combatant::new("Wolf", StatBlock::new(50, attack, defense, 15))
    }

    #[test]
    fn test_damage_formula_examples() {
        assert_eq!(compute_damage(10, 10, 10), 19);
        assert_eq!(compute_damage(0, 1, 1000), 1);
        // floor(10 + 5 - 0.5)
        assert_eq!(compute_damage(10, 5, 10), 14);
        assert_eq!(compute_damage(30, 30, 0), 60);
    }

    #[test]
    fn test_accuracy_boundaries() {
        for roll in [0.0, 0.5, 50.0, 99.999] {
            assert!(is_hit(roll, 100));
        }
        assert!(is_hit(0.0, 0));
        assert!(!is_hit(0.0001, 0));
        assert!(!is_hit(99.0, 0));
        assert!(is_hit(80.0, 80));
        assert!(!is_hit(80.01, 80));
    }

    #[test]
    fn test_miss_has_no_effect() {
        let actor = fighter(10, 10);
        let target = fighter(5, 5);
        let roar = Move::new("Roar", 5, 75).with_effect(MoveEffect::EnemyDefenseDelta(-10));
        let outcome = resolve_with_roll(&actor, &target, &roar, 90.0);
        assert!(outcome.missed);
        assert_eq!(outcome.damage, 0);
        assert!(outcome.deltas.is_empty());
        assert_eq!(outcome.narrate("Wolf", "Grunt"), "Wolf's Roar missed!");
    }

    #[test]
    fn test_hit_with_damage_and_effects() {
        let actor = fighter(10, 10);
        let target = fighter(5, 5);
        let roar = Move::new("Roar", 5, 75)
            .with_effect(MoveEffect::EnemyDefenseDelta(-10))
            .with_effect(MoveEffect::SelfAttackBuff(5));
        let outcome = resolve_with_roll(&actor, &target, &roar, 10.0);
        assert!(!outcome.missed);
        // floor(10 + 5 - 0.25)
        assert_eq!(outcome.damage, 14);
        assert_eq!(outcome.deltas.len(), 2);
    }

    #[test]
    fn test_blocked_attack_consumes_guard() {
        let actor = fighter(10, 10);
        let mut target = fighter(5, 5);
        target.blocking = true;
        let crush = Move::new("Crush", 30, 75).with_effect(MoveEffect::EnemyDefenseDelta(-5));
        let outcome = resolve_with_roll(&actor, &target, &crush, 1.0);
        assert!(outcome.blocked);
        assert_eq!(outcome.damage, 0);
        assert_eq!(
            outcome.deltas,
            vec![StatDelta::Blocking {
                who: Recipient::Target,
                active: false
            }]
        );

        let mut actor = actor;
        outcome.apply(&mut actor, &mut target);
        assert!(!target.blocking);
        assert_eq!(target.hp, 50);
        assert_eq!(target.stats.defense, 5);
    }

    #[test]
    fn test_utility_ignores_enemy_guard() {
        let actor = fighter(10, 10);
        let mut target = fighter(5, 5);
        target.blocking = true;
        let dash = Move::new("Dash", 0, 90).with_effect(MoveEffect::StatBuff {
            stat: StatKind::Speed,
            value: 5,
        });
        let outcome = resolve_with_roll(&actor, &target, &dash, 0.0);
        assert!(!outcome.blocked);
        assert_eq!(outcome.damage, 0);

        let mut actor = actor;
        outcome.apply(&mut actor, &mut target);
        assert_eq!(actor.stats.speed, 20);
        assert!(target.blocking);
    }

    #[test]
    fn test_monster_moves_skip_roll() {
        let actor = fighter(5, 5);
        let target = fighter(10, 10);
        let scratch = Move::new("Scratch", 5, 0);
        let mut rng = ScriptedRng::new().with_rolls([99.0]);
        let outcome = resolve_move(&actor, &target, &scratch, MoveRules::Monster, &mut rng);
        assert!(!outcome.missed);
        assert_eq!(outcome.roll, None);
        // floor(5 + 5 - 0.5)
        assert_eq!(outcome.damage, 9);
    }

    #[test]
    fn test_monster_guard_is_a_plain_attack() {
        let boss = Combatant::new("Bear Boss", StatBlock::new(60, 45, 15, 15));
        let wolf = fighter(10, 10);
        let guard = Move::new("Guard", 0, 80).with_effect(MoveEffect::BlockNext);
        let outcome = resolve_monster_attack(&boss, &wolf, &guard);
        assert_eq!(outcome.damage, 45);
        assert!(outcome.deltas.is_empty());

        let mut boss = boss;
        let mut wolf = wolf;
        outcome.apply(&mut boss, &mut wolf);
        assert!(!boss.blocking);
        assert_eq!(wolf.hp, 5);
    }

    #[test]
    fn test_monster_attack_into_guard() {
        let grunt = fighter(5, 5);
        let mut wolf = fighter(10, 10);
        wolf.blocking = true;
        let outcome = resolve_monster_attack(&grunt, &wolf, &Move::new("Scratch", 5, 100));
        assert!(outcome.blocked);
        assert_eq!(outcome.damage, 0);
        assert_eq!(
            outcome.narrate("Grunt", "Wolf"),
            "Wolf blocked Grunt's Scratch!"
        );
    }

    #[test]
    fn test_enemy_defense_floors_at_zero() {
        let mut actor = fighter(10, 10);
        let mut target = fighter(5, 3);
        let roar = Move::new("Roar", 5, 75).with_effect(MoveEffect::EnemyDefenseDelta(-10));
        let outcome = resolve_with_roll(&actor, &target, &roar, 0.0);
        outcome.apply(&mut actor, &mut target);
        assert_eq!(target.stats.defense, 0);
    }

    #[test]
    fn test_narrate_hit() {
        let actor = fighter(10, 10);
        let target = fighter(5, 10);
        let claw = Move::new("Claw", 10, 100);
        let outcome = resolve_with_roll(&actor, &target, &claw, 42.0);
        assert_eq!(
            outcome.narrate("Wolf", "Grunt"),
            "Wolf used Claw! Dealt 19 damage."
        );
    }

    #[test]
    fn test_narrate_names_who_is_affected() {
        let actor = fighter(10, 10);
        let target = fighter(5, 5);
        let roar = Move::new("Roar", 5, 75)
            .with_effect(MoveEffect::EnemyDefenseDelta(-10))
            .with_effect(MoveEffect::SelfAttackBuff(5));
        let outcome = resolve_with_roll(&actor, &target, &roar, 0.0);
        assert_eq!(
            outcome.narrate("Wolf", "Weak Grunt"),
            "Wolf used Roar! Dealt 14 damage. (Weak Grunt defense -10, Wolf attack +5)"
        );

        let guard = Move::new("Guard", 0, 80).with_effect(MoveEffect::BlockNext);
        let outcome = resolve_with_roll(&actor, &target, &guard, 0.0);
        assert_eq!(
            outcome.narrate("Bear", "Elite Warrior"),
            "Bear used Guard! (Bear is guarding)"
        );
    }
}
