//! Combat sessions.
//!
//! A [`CombatSession`] owns both combatants for the length of one battle.
//! It asks the [`TurnScheduler`] who acts, resolves the move, commits the
//! result, and stops at victory or defeat.
//!
//! ```text
//! AwaitingPlayerInput ──move──▶ ResolvingPlayerTurn ──▶ AwaitingPlayerInput
//!        ▲                              │               AwaitingMonsterTurn
//!        │                              └─ monster HP 0 ─▶ PlayerVictory
//! AwaitingMonsterTurn ──run──▶ ResolvingMonsterTurn ──▶ (next owner)
//!                                       └─ player HP 0 ──▶ PlayerDefeat
//! ```
//!
//! Inputs that arrive in the wrong phase are ignored: the call returns
//! `None` and nothing changes.

use crate::config::GameConfig;
use crate::content::{Move, MonsterInstance};
use crate::error::ConfigError;
use crate::resolver::{resolve_move, MoveOutcome, MoveRules};
use crate::rng::GameRng;
use crate::scheduler::{TurnOwner, TurnScheduler};
use crate::stat::{StatBlock, StatKind};
use serde::{Deserialize, Serialize};

/// Live state of one side of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    /// Current HP, within `[0, stats.hp]`.
    pub hp: u32,
    /// Effective stats; `stats.hp` is max HP.
    pub stats: StatBlock,
    /// Negates the next incoming attack.
    pub blocking: bool,
}

impl Combatant {
    /// A fresh combatant at full HP.
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            hp: stats.hp,
            stats,
            blocking: false,
        }
    }

    /// Max HP, which is the `hp` stat.
    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    /// Down to 0 HP.
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Lose `amount` HP, stopping at 0.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Apply a signed stat change. HP changes heal or hurt within `[0, max]`.
    pub fn apply_stat(&mut self, stat: StatKind, amount: i32) {
        match stat {
            StatKind::Hp => {
                let next = (i64::from(self.hp) + i64::from(amount))
                    .clamp(0, i64::from(self.stats.hp));
                self.hp = next as u32;
            }
            other => self.stats.apply_delta(other, amount),
        }
    }
}

/// Where a session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatPhase {
    AwaitingPlayerInput,
    ResolvingPlayerTurn,
    AwaitingMonsterTurn,
    ResolvingMonsterTurn,
    PlayerVictory,
    PlayerDefeat,
}

impl CombatPhase {
    /// Victory or defeat; no further input is accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, CombatPhase::PlayerVictory | CombatPhase::PlayerDefeat)
    }

    fn awaiting(owner: TurnOwner) -> Self {
        match owner {
            TurnOwner::Player => CombatPhase::AwaitingPlayerInput,
            TurnOwner::Monster => CombatPhase::AwaitingMonsterTurn,
        }
    }
}

/// Which encounter of a run a battle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encounter {
    /// 1-based wave number.
    Wave(u32),
    Boss,
}

/// Final result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub encounter: Encounter,
    pub victory: bool,
    /// Flip tokens earned; zero on defeat.
    pub reward: u32,
}

/// One resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub actor: TurnOwner,
    pub outcome: MoveOutcome,
    pub line: String,
    /// Phase after the turn committed.
    pub phase: CombatPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub blocking: bool,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(c: &Combatant) -> Self {
        Self {
            name: c.name.clone(),
            hp: c.hp,
            max_hp: c.max_hp(),
            attack: c.stats.attack,
            defense: c.stats.defense,
            speed: c.stats.speed,
            blocking: c.blocking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSummary {
    pub name: String,
    pub damage: u32,
    pub accuracy: u32,
    pub description: String,
}

impl From<&Move> for MoveSummary {
    fn from(mv: &Move) -> Self {
        Self {
            name: mv.name.clone(),
            damage: mv.damage,
            accuracy: mv.accuracy,
            description: mv.description.clone(),
        }
    }
}

/// Everything the presentation layer needs to draw one combat step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub encounter: Encounter,
    pub phase: CombatPhase,
    pub player: CombatantSnapshot,
    pub monster: CombatantSnapshot,
    /// Next few turn owners, current first.
    pub upcoming: Vec<TurnOwner>,
    /// Most recent log lines, oldest first.
    pub log: Vec<String>,
    /// Moves the player may pick from.
    pub moves: Vec<MoveSummary>,
}

/// One battle between the player's character and a monster.
#[derive(Debug, Clone)]
pub struct CombatSession {
    player: Combatant,
    monster: Combatant,
    player_moves: Vec<Move>,
    monster_moves: Vec<Move>,
    scheduler: TurnScheduler,
    phase: CombatPhase,
    encounter: Encounter,
    victory_reward: u32,
    log: Vec<String>,
    log_tail: usize,
    turn_preview: usize,
}

impl CombatSession {
    /// Start a battle.
    ///
    /// `player_moves` are the moves the character has unlocked. The first
    /// queued turn decides the initial phase. Fails if either side has
    /// zero speed.
    pub fn start(
        player: Combatant,
        player_moves: Vec<Move>,
        monster: &MonsterInstance,
        encounter: Encounter,
        config: &GameConfig,
    ) -> Result<Self, ConfigError> {
        let monster_side = Combatant::new(monster.name.clone(), monster.stats);
        let scheduler = TurnScheduler::new(
            player.stats.speed,
            monster_side.stats.speed,
            config.scheduler,
        )?;
        let phase = CombatPhase::awaiting(scheduler.current());
        let victory_reward = match encounter {
            Encounter::Boss => config.rewards.boss_win,
            Encounter::Wave(_) => config.rewards.wave_win,
        };

        tracing::info!(
            player = %player.name,
            monster = %monster.name,
            ?encounter,
            first = %scheduler.current(),
            "combat started"
        );

        Ok(Self {
            player,
            monster: monster_side,
            player_moves,
            monster_moves: monster.moves.clone(),
            scheduler,
            phase,
            encounter,
            victory_reward,
            log: Vec::new(),
            log_tail: config.display.log_tail,
            turn_preview: config.display.turn_preview,
        })
    }

    /// Use the player's move at `index`.
    ///
    /// Returns `None` without changing anything when it is not the
    /// player's turn, a turn is already resolving, the battle is over,
    /// or `index` is not an unlocked move.
    pub fn submit_player_move<R: GameRng>(
        &mut self,
        index: usize,
        rng: &mut R,
    ) -> Option<TurnReport> {
        if self.phase != CombatPhase::AwaitingPlayerInput {
            tracing::debug!(phase = ?self.phase, index, "player input ignored");
            return None;
        }
        let Some(mv) = self.player_moves.get(index).cloned() else {
            tracing::warn!(
                index,
                unlocked = self.player_moves.len(),
                "move index outside unlocked moves"
            );
            return None;
        };

        self.phase = CombatPhase::ResolvingPlayerTurn;
        let outcome = resolve_move(&self.player, &self.monster, &mv, MoveRules::Player, rng);
        outcome.apply(&mut self.player, &mut self.monster);
        let line = outcome.narrate(&self.player.name, &self.monster.name);
        Some(self.commit(TurnOwner::Player, outcome, line))
    }

    /// Let the monster attack with a uniformly chosen move.
    ///
    /// Returns `None` without changing anything unless the session is
    /// waiting on the monster.
    pub fn run_monster_turn<R: GameRng>(&mut self, rng: &mut R) -> Option<TurnReport> {
        if self.phase != CombatPhase::AwaitingMonsterTurn {
            tracing::debug!(phase = ?self.phase, "monster turn ignored");
            return None;
        }
        let pick = rng.pick_index(self.monster_moves.len());
        let mv = self.monster_moves.get(pick).cloned()?;

        self.phase = CombatPhase::ResolvingMonsterTurn;
        let outcome = resolve_move(&self.monster, &self.player, &mv, MoveRules::Monster, rng);
        outcome.apply(&mut self.monster, &mut self.player);
        let line = outcome.narrate(&self.monster.name, &self.player.name);
        Some(self.commit(TurnOwner::Monster, outcome, line))
    }

    /// Record the turn, check for a finish and move to the next owner.
    fn commit(&mut self, actor: TurnOwner, outcome: MoveOutcome, line: String) -> TurnReport {
        tracing::debug!(%actor, %line, "turn resolved");
        self.log.push(line.clone());

        self.phase = if self.monster.is_defeated() {
            CombatPhase::PlayerVictory
        } else if self.player.is_defeated() {
            CombatPhase::PlayerDefeat
        } else {
            if let Err(err) = self
                .scheduler
                .set_speeds(self.player.stats.speed, self.monster.stats.speed)
            {
                tracing::error!(%err, "speed update rejected");
            }
            CombatPhase::awaiting(self.scheduler.advance())
        };

        if self.phase.is_terminal() {
            tracing::info!(
                phase = ?self.phase,
                encounter = ?self.encounter,
                turns = self.scheduler.cursor() + 1,
                "combat finished"
            );
        }

        TurnReport {
            actor,
            outcome,
            line,
            phase: self.phase,
        }
    }

    /// Where the session is in its turn cycle.
    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    /// Which wave or boss this battle is.
    pub fn encounter(&self) -> Encounter {
        self.encounter
    }

    /// Shorthand for a terminal [`phase`](Self::phase).
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Owner of the turn being waited on, `None` once finished.
    pub fn active_turn(&self) -> Option<TurnOwner> {
        match self.phase {
            CombatPhase::AwaitingPlayerInput | CombatPhase::ResolvingPlayerTurn => {
                Some(TurnOwner::Player)
            }
            CombatPhase::AwaitingMonsterTurn | CombatPhase::ResolvingMonsterTurn => {
                Some(TurnOwner::Monster)
            }
            CombatPhase::PlayerVictory | CombatPhase::PlayerDefeat => None,
        }
    }

    /// Result of a finished session.
    pub fn outcome(&self) -> Option<CombatOutcome> {
        let victory = match self.phase {
            CombatPhase::PlayerVictory => true,
            CombatPhase::PlayerDefeat => false,
            _ => return None,
        };
        Some(CombatOutcome {
            encounter: self.encounter,
            victory,
            reward: if victory { self.victory_reward } else { 0 },
        })
    }

    /// The player's side, with live stats.
    pub fn player(&self) -> &Combatant {
        &self.player
    }

    /// The monster's side, with live stats.
    pub fn monster(&self) -> &Combatant {
        &self.monster
    }

    /// Moves the player may pick, by index.
    pub fn player_moves(&self) -> &[Move] {
        &self.player_moves
    }

    /// Turn order for this battle.
    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    /// Full combat log, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Presentation view: both sides, the next few turns, the log tail
    /// and the move list.
    pub fn snapshot(&self) -> CombatSnapshot {
        let tail_start = self.log.len().saturating_sub(self.log_tail);
        CombatSnapshot {
            encounter: self.encounter,
            phase: self.phase,
            player: CombatantSnapshot::from(&self.player),
            monster: CombatantSnapshot::from(&self.monster),
            upcoming: self.scheduler.upcoming(self.turn_preview).to_vec(),
            log: self.log[tail_start..].to_vec(),
            moves: self.player_moves.iter().map(MoveSummary::from).collect(),
        }
    }
}
