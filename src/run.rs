//! Run sequencing.
//!
//! A run is the scripted waves in order followed by the boss. Winning a
//! wave pays the wave reward and starts the next fight at once; losing any
//! fight ends the run. Beating the boss pays the boss reward and, when the
//! boss's character is still locked, waits for the player to
//! [`capture`](RunController::capture) it or [`end_run`](RunController::end_run).
//!
//! Ending a run always resets the wave counter to 0 and saves.

use crate::combat::{
    CombatOutcome, CombatSession, CombatSnapshot, Combatant, Encounter, TurnReport,
};
use crate::content::{CharacterId, MonsterInstance};
use crate::error::{ProgressionError, RunError};
use crate::progression::ProgressionStore;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

/// Where the controller is between and during fights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    InCombat,
    /// Boss defeated; the character can be captured.
    AwaitingCapture(CharacterId),
}

/// How a finished run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub character: CharacterId,
    pub waves_cleared: u32,
    pub boss_defeated: bool,
    pub tokens_earned: u32,
    pub captured: Option<CharacterId>,
}

/// Drives combat sessions across a run and settles their results with
/// the [`ProgressionStore`].
pub struct RunController<R: GameRng> {
    progression: ProgressionStore,
    rng: R,
    phase: RunPhase,
    session: Option<CombatSession>,
    summary: Option<RunSummary>,
    last_outcome: Option<CombatOutcome>,
}

impl<R: GameRng> RunController<R> {
    pub fn new(progression: ProgressionStore, rng: R) -> Self {
        Self {
            progression,
            rng,
            phase: RunPhase::Idle,
            session: None,
            summary: None,
            last_outcome: None,
        }
    }

    /// Where the run is: idle, fighting, or offering a capture.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Current wave, 0 when idle.
    pub fn wave(&self) -> u32 {
        self.progression.wave()
    }

    /// Read access to progression at any time.
    pub fn progression(&self) -> &ProgressionStore {
        &self.progression
    }

    /// Progression is only editable between runs.
    pub fn progression_mut(&mut self) -> Option<&mut ProgressionStore> {
        match self.phase {
            RunPhase::Idle => Some(&mut self.progression),
            _ => None,
        }
    }

    /// Split borrow for training between runs.
    pub fn training(&mut self) -> Option<(&mut ProgressionStore, &mut R)> {
        match self.phase {
            RunPhase::Idle => Some((&mut self.progression, &mut self.rng)),
            _ => None,
        }
    }

    /// Give up the controller and keep the progression.
    pub fn into_progression(self) -> ProgressionStore {
        self.progression
    }

    /// The current fight; kept after the boss falls until the run ends.
    pub fn session(&self) -> Option<&CombatSession> {
        self.session.as_ref()
    }

    /// Snapshot of the current fight, if any.
    pub fn snapshot(&self) -> Option<CombatSnapshot> {
        self.session.as_ref().map(CombatSession::snapshot)
    }

    /// Result of the most recently finished fight.
    pub fn last_outcome(&self) -> Option<CombatOutcome> {
        self.last_outcome
    }

    /// Summary of the last finished run.
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Start a run with the selected character at wave 1.
    pub fn start_run(&mut self) -> Result<&CombatSession, RunError> {
        if self.phase != RunPhase::Idle {
            return Err(RunError::RunInProgress);
        }
        let character = self.progression.current_character_id();
        if !self
            .progression
            .character(character)
            .is_some_and(|c| c.unlocked)
        {
            return Err(ProgressionError::CharacterLocked(character).into());
        }

        self.summary = Some(RunSummary {
            character,
            waves_cleared: 0,
            boss_defeated: false,
            tokens_earned: 0,
            captured: None,
        });
        self.last_outcome = None;
        self.progression.set_wave(1);
        tracing::info!(character, "run started");

        if let Err(err) = self.start_encounter() {
            self.progression.set_wave(0);
            self.summary = None;
            return Err(err);
        }
        self.phase = RunPhase::InCombat;
        self.session.as_ref().ok_or(RunError::NoActiveRun)
    }

    /// Monster for the current wave counter: a wave, or the boss once the
    /// counter is past the last wave.
    fn next_monster(&self) -> (MonsterInstance, Encounter) {
        let config = self.progression.config();
        let wave = self.progression.wave();
        match usize::try_from(wave)
            .ok()
            .and_then(|w| w.checked_sub(1))
            .and_then(|index| config.waves.get(index))
        {
            Some(definition) => (definition.instantiate(), Encounter::Wave(wave)),
            None => (
                config
                    .boss
                    .monster
                    .instantiate_boss(config.boss.stats_multiplier),
                Encounter::Boss,
            ),
        }
    }

    fn start_encounter(&mut self) -> Result<(), RunError> {
        let id = self.progression.current_character_id();
        let name = self.progression.definition(id)?.name.clone();
        let stats = self.progression.effective_stats(id)?;
        let moves = self.progression.unlocked_moves(id)?.to_vec();
        let (monster, encounter) = self.next_monster();

        let session = CombatSession::start(
            Combatant::new(name, stats),
            moves,
            &monster,
            encounter,
            self.progression.config(),
        )?;
        self.session = Some(session);
        Ok(())
    }

    /// Forward the player's move to the active fight.
    ///
    /// `Ok(None)` means the input was ignored. When the move ends the
    /// fight, the result is settled before returning.
    pub fn submit_move(&mut self, index: usize) -> Result<Option<TurnReport>, RunError> {
        if self.phase != RunPhase::InCombat {
            return Err(RunError::NoActiveRun);
        }
        let session = self.session.as_mut().ok_or(RunError::NoActiveRun)?;
        let report = session.submit_player_move(index, &mut self.rng);
        self.settle_if_finished()?;
        Ok(report)
    }

    /// Let the monster act in the active fight.
    pub fn run_monster_turn(&mut self) -> Result<Option<TurnReport>, RunError> {
        if self.phase != RunPhase::InCombat {
            return Err(RunError::NoActiveRun);
        }
        let session = self.session.as_mut().ok_or(RunError::NoActiveRun)?;
        let report = session.run_monster_turn(&mut self.rng);
        self.settle_if_finished()?;
        Ok(report)
    }

    fn settle_if_finished(&mut self) -> Result<(), RunError> {
        let Some(outcome) = self.session.as_ref().and_then(CombatSession::outcome) else {
            return Ok(());
        };
        self.last_outcome = Some(outcome);

        if !outcome.victory {
            tracing::info!(encounter = ?outcome.encounter, "run lost");
            self.finish();
            return Ok(());
        }

        self.progression.award_currency(outcome.reward);
        if let Some(summary) = self.summary.as_mut() {
            summary.tokens_earned += outcome.reward;
        }

        match outcome.encounter {
            Encounter::Wave(wave) => {
                if let Some(summary) = self.summary.as_mut() {
                    summary.waves_cleared = wave;
                }
                self.progression.set_wave(wave + 1);
                tracing::debug!(next = wave + 1, "wave cleared");
                if let Err(err) = self.start_encounter() {
                    self.finish();
                    return Err(err);
                }
            }
            Encounter::Boss => {
                if let Some(summary) = self.summary.as_mut() {
                    summary.boss_defeated = true;
                }
                let reward_character = self
                    .progression
                    .config()
                    .boss
                    .unlocks_character
                    .filter(|id| {
                        self.progression
                            .character(*id)
                            .is_some_and(|c| !c.unlocked)
                    });
                match reward_character {
                    Some(id) => self.phase = RunPhase::AwaitingCapture(id),
                    None => self.finish(),
                }
            }
        }
        Ok(())
    }

    /// Accept the capture offer: unlock the boss's character and end the run.
    pub fn capture(&mut self) -> Result<CharacterId, RunError> {
        let RunPhase::AwaitingCapture(id) = self.phase else {
            return Err(RunError::NoUnlockOffered);
        };
        self.progression.unlock_character(id)?;
        if let Some(summary) = self.summary.as_mut() {
            summary.captured = Some(id);
        }
        self.finish();
        Ok(id)
    }

    /// End the run now, declining any capture offer.
    pub fn end_run(&mut self) -> Result<RunSummary, RunError> {
        if self.phase == RunPhase::Idle {
            return Err(RunError::NoActiveRun);
        }
        self.finish();
        self.summary.ok_or(RunError::NoActiveRun)
    }

    fn finish(&mut self) {
        self.phase = RunPhase::Idle;
        self.session = None;
        self.progression.set_wave(0);
        self.progression.save();
        if let Some(summary) = &self.summary {
            tracing::info!(
                waves = summary.waves_cleared,
                boss = summary.boss_defeated,
                tokens = summary.tokens_earned,
                "run ended"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatPhase;
    use crate::config::{GameConfig, BEAR, WOLF};
    use crate::content::Move;
    use crate::persistence::MemoryStore;
    use crate::rng::ScriptedRng;
    use crate::stat::StatBlock;

    /// Wolf strong enough to one-shot everything and always act first.
    fn strong_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.characters[0].base = StatBlock::new(500, 500, 10, 100);
        config
    }

    fn weak_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.characters[0].base = StatBlock::new(1, 1, 0, 1);
        config.characters[0].moves[0] = Move::new("Claw", 1, 100);
        config
    }

    fn controller(config: GameConfig) -> RunController<ScriptedRng> {
        let progression = ProgressionStore::new_game(config, Box::new(MemoryStore::new())).unwrap();
        RunController::new(progression, ScriptedRng::new())
    }

    fn play_out(run: &mut RunController<ScriptedRng>) {
        while run.phase() == RunPhase::InCombat {
            let phase = run.session().map(CombatSession::phase);
            match phase {
                Some(CombatPhase::AwaitingPlayerInput) => {
                    run.submit_move(0).unwrap();
                }
                Some(CombatPhase::AwaitingMonsterTurn) => {
                    run.run_monster_turn().unwrap();
                }
                other => panic!("unexpected phase {other:?}"),
            }
        }
    }

    #[test]
    fn test_full_run_with_capture() {
        let mut run = controller(strong_config());
        run.start_run().unwrap();
        assert_eq!(run.wave(), 1);

        run.submit_move(0).unwrap().unwrap();
        assert_eq!(run.wave(), 2);
        assert_eq!(run.progression().currency(), 11);
        assert_eq!(
            run.session().unwrap().encounter(),
            Encounter::Wave(2)
        );

        run.submit_move(0).unwrap();
        run.submit_move(0).unwrap();
        assert_eq!(run.session().unwrap().encounter(), Encounter::Boss);
        assert_eq!(run.session().unwrap().monster().stats.hp, 60);

        run.submit_move(0).unwrap();
        assert_eq!(run.phase(), RunPhase::AwaitingCapture(BEAR));
        assert_eq!(run.progression().currency(), 18);

        assert_eq!(run.capture(), Ok(BEAR));
        assert_eq!(run.phase(), RunPhase::Idle);
        assert_eq!(run.wave(), 0);
        assert!(run.progression().character(BEAR).unwrap().unlocked);

        let summary = run.last_summary().unwrap();
        assert_eq!(summary.waves_cleared, 3);
        assert!(summary.boss_defeated);
        assert_eq!(summary.tokens_earned, 8);
        assert_eq!(summary.captured, Some(BEAR));
    }

    #[test]
    fn test_boss_win_with_bear_unlocked_ends_run() {
        let mut run = controller(strong_config());
        run.progression_mut()
            .unwrap()
            .unlock_character(BEAR)
            .unwrap();
        run.start_run().unwrap();
        play_out(&mut run);
        assert_eq!(run.phase(), RunPhase::Idle);
        assert_eq!(run.capture(), Err(RunError::NoUnlockOffered));
        assert!(run.last_summary().unwrap().boss_defeated);
    }

    #[test]
    fn test_decline_capture() {
        let mut run = controller(strong_config());
        run.start_run().unwrap();
        play_out(&mut run);
        assert_eq!(run.phase(), RunPhase::AwaitingCapture(BEAR));
        let summary = run.end_run().unwrap();
        assert_eq!(summary.captured, None);
        assert!(!run.progression().character(BEAR).unwrap().unlocked);
    }

    #[test]
    fn test_defeat_ends_run() {
        let mut run = controller(weak_config());
        run.start_run().unwrap();
        play_out(&mut run);
        assert_eq!(run.phase(), RunPhase::Idle);
        assert_eq!(run.wave(), 0);
        assert_eq!(run.progression().currency(), 10);
        assert!(!run.last_outcome().unwrap().victory);
        assert!(run.session().is_none());
    }

    #[test]
    fn test_run_misuse() {
        let mut run = controller(strong_config());
        assert_eq!(run.submit_move(0), Err(RunError::NoActiveRun));
        assert_eq!(run.end_run(), Err(RunError::NoActiveRun));
        run.start_run().unwrap();
        assert!(matches!(run.start_run(), Err(RunError::RunInProgress)));
        assert!(run.progression_mut().is_none());
        run.end_run().unwrap();
        assert_eq!(run.wave(), 0);
        assert_eq!(run.progression().current_character_id(), WOLF);
    }

    #[test]
    fn test_ignored_input_is_not_an_error() {
        let mut run = controller(strong_config());
        run.start_run().unwrap();
        assert_eq!(run.submit_move(7), Ok(None));
        assert_eq!(run.run_monster_turn(), Ok(None));
        assert_eq!(run.phase(), RunPhase::InCombat);
    }
}
