//! Speed-driven turn order.
//!
//! Each side pays `1 / speed` time units per action. Whichever side has
//! the smaller accumulated time acts next, ties going to the player, so
//! over a long horizon each side's share of turns is proportional to its
//! speed.
//!
//! Times are compared exactly in integers: scaling every time by
//! `playerSpeed × monsterSpeed` makes the player's interval
//! `monsterSpeed` and the monster's interval `playerSpeed`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who acts on a given turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOwner {
    Player,
    Monster,
}

impl fmt::Display for TurnOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TurnOwner::Player => "P",
            TurnOwner::Monster => "M",
        })
    }
}

/// Queue sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Entries generated when combat starts.
    pub initial_batch: usize,
    /// Extend once fewer than this many unconsumed entries remain.
    pub refill_threshold: usize,
    /// Entries appended per extension.
    pub refill_batch: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_batch: 10,
            refill_threshold: 3,
            refill_batch: 5,
        }
    }
}

fn check_speed(speed: u32, owner: TurnOwner) -> Result<(), ConfigError> {
    if speed == 0 {
        return Err(ConfigError::NonPositiveSpeed {
            owner: match owner {
                TurnOwner::Player => "player".into(),
                TurnOwner::Monster => "monster".into(),
            },
        });
    }
    Ok(())
}

/// Full recompute of the first `len` turns from turn 0.
///
/// Runs the accumulators forward one action at a time. This is the
/// reference ordering [`TurnScheduler`] reproduces incrementally.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::scheduler::{interleave, TurnOwner::{Monster as M, Player as P}};
///
/// // A player twice as fast acts twice per monster turn.
/// assert_eq!(interleave(20, 10, 6).unwrap(), vec![P, P, M, P, P, M]);
/// ```
pub fn interleave(
    player_speed: u32,
    monster_speed: u32,
    len: usize,
) -> Result<Vec<TurnOwner>, ConfigError> {
    check_speed(player_speed, TurnOwner::Player)?;
    check_speed(monster_speed, TurnOwner::Monster)?;

    let player_interval = u128::from(monster_speed);
    let monster_interval = u128::from(player_speed);
    let mut player_time = player_interval;
    let mut monster_time = monster_interval;

    let mut order = Vec::with_capacity(len);
    for _ in 0..len {
        if player_time <= monster_time {
            order.push(TurnOwner::Player);
            player_time += player_interval;
        } else {
            order.push(TurnOwner::Monster);
            monster_time += monster_interval;
        }
    }
    Ok(order)
}

/// Extensible queue of upcoming turns with a consumption cursor.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::scheduler::{SchedulerConfig, TurnOwner, TurnScheduler};
///
/// let mut scheduler = TurnScheduler::new(15, 10, SchedulerConfig::default()).unwrap();
/// assert_eq!(scheduler.current(), TurnOwner::Player);
/// for _ in 0..100 {
///     scheduler.advance();
/// }
/// assert!(scheduler.remaining() >= 3);
/// ```
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    player_speed: u32,
    monster_speed: u32,
    queue: Vec<TurnOwner>,
    cursor: usize,
    /// Player entries already in the queue.
    player_turns: u64,
    /// Monster entries already in the queue.
    monster_turns: u64,
    config: SchedulerConfig,
}

impl TurnScheduler {
    /// Create a scheduler and generate the initial batch.
    ///
    /// Fails when either speed is zero.
    pub fn new(
        player_speed: u32,
        monster_speed: u32,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        check_speed(player_speed, TurnOwner::Player)?;
        check_speed(monster_speed, TurnOwner::Monster)?;

        let mut scheduler = Self {
            player_speed,
            monster_speed,
            queue: Vec::new(),
            cursor: 0,
            player_turns: 0,
            monster_turns: 0,
            config,
        };
        scheduler.extend(config.initial_batch.max(1));
        scheduler.refill();
        Ok(scheduler)
    }

    /// Owner of the turn at the cursor.
    pub fn current(&self) -> TurnOwner {
        self.queue[self.cursor]
    }

    /// Consume the current turn and return the new current owner.
    ///
    /// Extends the queue when it runs low.
    pub fn advance(&mut self) -> TurnOwner {
        self.cursor += 1;
        self.refill();
        self.current()
    }

    /// Index of the current turn in the queue.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Unconsumed entries, including the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Up to `n` entries starting at the current turn.
    pub fn upcoming(&self, n: usize) -> &[TurnOwner] {
        let end = self.cursor.saturating_add(n).min(self.queue.len());
        &self.queue[self.cursor..end]
    }

    /// Every entry generated so far, consumed ones included.
    pub fn queue(&self) -> &[TurnOwner] {
        &self.queue
    }

    /// Player and monster speed used for new entries.
    pub fn speeds(&self) -> (u32, u32) {
        (self.player_speed, self.monster_speed)
    }

    /// Change the speeds used for entries generated from now on.
    ///
    /// Already queued entries are left untouched.
    pub fn set_speeds(&mut self, player_speed: u32, monster_speed: u32) -> Result<(), ConfigError> {
        check_speed(player_speed, TurnOwner::Player)?;
        check_speed(monster_speed, TurnOwner::Monster)?;
        if (player_speed, monster_speed) != (self.player_speed, self.monster_speed) {
            tracing::debug!(
                player_speed,
                monster_speed,
                queued = self.queue.len(),
                "turn speeds changed"
            );
        }
        self.player_speed = player_speed;
        self.monster_speed = monster_speed;
        Ok(())
    }

    fn refill(&mut self) {
        let threshold = self.config.refill_threshold.max(1);
        while self.remaining() < threshold {
            self.extend(self.config.refill_batch.max(1));
        }
    }

    /// Append `count` entries.
    ///
    /// Accumulators are rebuilt from how many turns each side already
    /// holds: `time = interval × (ownTurns + 1)`. This keeps the numbers
    /// bounded by the queue length and matches [`interleave`] exactly.
    fn extend(&mut self, count: usize) {
        let player_interval = u128::from(self.monster_speed);
        let monster_interval = u128::from(self.player_speed);
        let mut player_time = player_interval * u128::from(self.player_turns + 1);
        let mut monster_time = monster_interval * u128::from(self.monster_turns + 1);

        for _ in 0..count {
            if player_time <= monster_time {
                self.queue.push(TurnOwner::Player);
                self.player_turns += 1;
                player_time += player_interval;
            } else {
                self.queue.push(TurnOwner::Monster);
                self.monster_turns += 1;
                monster_time += monster_interval;
            }
        }
    }
}
