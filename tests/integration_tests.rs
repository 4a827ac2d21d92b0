//! Cross-module scenarios.
//!
//! These tests verify:
//! - The economy across training and runs
//! - Blocking across consecutive monster turns
//! - Level-up gating and trophies
//! - Saves surviving a reload through the file store

use buffbrawl::combat::{CombatPhase, CombatSession, Combatant, Encounter};
use buffbrawl::config::{BEAR, WOLF};
use buffbrawl::persistence::JsonFileStore;
use buffbrawl::rng::{ScriptedRng, SeededRng};
use buffbrawl::run::RunPhase;
use buffbrawl::trophy::TrophyTracker;
use buffbrawl::*;
use tempfile::TempDir;

fn new_game(config: GameConfig, store: &MemoryStore) -> ProgressionStore {
    ProgressionStore::new_game(config, Box::new(store.clone())).unwrap()
}

fn play_out(run: &mut RunController<ScriptedRng>) {
    while run.phase() == RunPhase::InCombat {
        match run.session().map(CombatSession::phase) {
            Some(CombatPhase::AwaitingPlayerInput) => {
                run.submit_move(0).unwrap();
            }
            _ => {
                run.run_monster_turn().unwrap();
            }
        }
    }
}

// ============================================================================
// Economy
// ============================================================================

#[test]
fn test_new_game_flip_win_then_lose() {
    let mut config = GameConfig::default();
    // The second wave is unwinnable.
    config.waves[1].stats = StatBlock::new(999, 999, 0, 999);

    let store = MemoryStore::new();
    let mut run = RunController::new(new_game(config, &store), ScriptedRng::new());
    assert_eq!(run.progression().currency(), 10);

    {
        let (progression, rng) = run.training().unwrap();
        let outcome = progression.flip_card(WOLF, 0, rng).unwrap();
        assert!(matches!(outcome, FlipOutcome::Flipped { cost: 1, .. }));
    }
    assert_eq!(run.progression().currency(), 9);

    run.start_run().unwrap();
    assert_eq!(run.wave(), 1);
    while run.wave() == 1 {
        match run.session().map(CombatSession::phase) {
            Some(CombatPhase::AwaitingPlayerInput) => {
                run.submit_move(0).unwrap();
            }
            _ => {
                run.run_monster_turn().unwrap();
            }
        }
    }
    assert!(run.last_outcome().unwrap().victory);
    assert_eq!(run.progression().currency(), 10);
    assert_eq!(run.wave(), 2);

    play_out(&mut run);
    let outcome = run.last_outcome().unwrap();
    assert!(!outcome.victory);
    assert_eq!(outcome.encounter, Encounter::Wave(2));
    assert_eq!(run.phase(), RunPhase::Idle);
    assert_eq!(run.wave(), 0);
    assert_eq!(run.progression().currency(), 10);

    // The run end was persisted.
    let reloaded = ProgressionStore::load_or_new(GameConfig::default(), Box::new(store)).unwrap();
    assert_eq!(reloaded.currency(), 10);
    assert_eq!(reloaded.character(WOLF).unwrap().flipped_count(), 1);
}

#[test]
fn test_flip_cost_sequence_and_exhaustion() {
    let store = MemoryStore::new();
    let mut progression = new_game(GameConfig::default(), &store);
    progression.award_currency(35);
    let mut rng = SeededRng::seed_from_u64(99);

    let costs: Vec<u32> = [4, 0, 8, 1, 7, 2, 6, 3, 5]
        .into_iter()
        .map(|index| match progression.flip_card(WOLF, index, &mut rng).unwrap() {
            FlipOutcome::Flipped { cost, .. } => cost,
            FlipOutcome::AlreadyFlipped => 0,
        })
        .collect();
    assert_eq!(costs, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);

    assert_eq!(
        progression.flip_card(WOLF, 3, &mut rng),
        Ok(FlipOutcome::AlreadyFlipped)
    );
    assert!(matches!(
        progression.flip_card(WOLF, 9, &mut rng),
        Err(ProgressionError::CardIndexOutOfRange { .. })
    ));
    assert_eq!(progression.currency(), 0);
}

// ============================================================================
// Combat
// ============================================================================

#[test]
fn test_guard_blocks_exactly_one_hit() {
    let config = GameConfig::default();
    let bear = config.character(BEAR).unwrap();
    let player = Combatant::new("Bear", bear.base);
    let grunt = MonsterInstance {
        name: "Fast Grunt".into(),
        stats: StatBlock::new(30, 5, 5, 20),
        moves: vec![Move::new("Scratch", 5, 100)],
        is_boss: false,
    };
    let mut combat = CombatSession::start(
        player,
        bear.unlocked_moves(2).to_vec(),
        &grunt,
        Encounter::Wave(1),
        &config,
    )
    .unwrap();
    let mut rng = ScriptedRng::new();

    // M, P, M, M with speeds 10 vs 20
    assert_eq!(combat.phase(), CombatPhase::AwaitingMonsterTurn);
    combat.run_monster_turn(&mut rng).unwrap();
    assert_eq!(combat.player().hp, 31);

    let guard = combat.submit_player_move(1, &mut rng).unwrap();
    assert!(!guard.outcome.missed);
    assert!(combat.player().blocking);

    let blocked = combat.run_monster_turn(&mut rng).unwrap();
    assert!(blocked.outcome.blocked);
    assert_eq!(blocked.outcome.damage, 0);
    assert_eq!(combat.player().hp, 31);
    assert!(!combat.player().blocking);
    assert_eq!(blocked.line, "Bear blocked Fast Grunt's Scratch!");

    let normal = combat.run_monster_turn(&mut rng).unwrap();
    assert!(!normal.outcome.blocked);
    assert_eq!(combat.player().hp, 22);
}

#[test]
fn test_snapshot_matches_presentation_contract() {
    let store = MemoryStore::new();
    let mut run = RunController::new(new_game(GameConfig::default(), &store), ScriptedRng::new());
    run.start_run().unwrap();

    let snapshot = run.snapshot().unwrap();
    assert_eq!(snapshot.player.name, "Wolf");
    assert_eq!(snapshot.monster.name, "Weak Grunt");
    assert_eq!(snapshot.upcoming.len(), 5);
    assert_eq!(snapshot.upcoming[0], TurnOwner::Player);
    assert_eq!(snapshot.moves.len(), 1);
    assert!(snapshot.log.is_empty());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["player"]["hp"], 50);
}

// ============================================================================
// Progression
// ============================================================================

#[test]
fn test_levelling_to_max_earns_trophy() {
    let store = MemoryStore::new();
    let config = GameConfig::default();
    let trophies = TrophyTracker::load(config.trophies.clone(), Box::new(store.clone()));
    let mut progression = new_game(config, &store);
    progression.add_observer(Box::new(trophies));
    let mut rng = SeededRng::seed_from_u64(7);

    for expected in ["Dash", "Roar"] {
        progression.award_currency(21);
        for index in 0..5 {
            progression.flip_card(WOLF, index, &mut rng).unwrap();
        }
        let err = progression.level_up(WOLF, &mut rng).unwrap_err();
        assert!(err.is_invalid_action());

        progression.flip_card(WOLF, 5, &mut rng).unwrap();
        let outcome = progression.level_up(WOLF, &mut rng).unwrap();
        assert_eq!(outcome.unlocked_move.as_deref(), Some(expected));

        let wolf = progression.character(WOLF).unwrap();
        assert_eq!(wolf.flipped_count(), 0);
        let grid = wolf.card_grid.unwrap();
        assert_eq!(grid.iter().filter(|c| c.is_power()).count(), 6);
    }

    let stats = progression.effective_stats(WOLF).unwrap();
    assert_eq!(stats, StatBlock::new(60, 12, 12, 18));

    let reloaded = TrophyTracker::load(GameConfig::default().trophies, Box::new(store));
    assert!(reloaded.is_unlocked("wolf-master"));
    assert!(!reloaded.is_unlocked("bear-captured"));
}

#[test]
fn test_capture_unlocks_bear_and_trophy() {
    let mut config = GameConfig::default();
    config.characters[0].base = StatBlock::new(500, 500, 10, 100);

    let store = MemoryStore::new();
    let trophies = TrophyTracker::load(config.trophies.clone(), Box::new(store.clone()));
    let mut progression = new_game(config, &store);
    progression.add_observer(Box::new(trophies));

    let mut run = RunController::new(progression, ScriptedRng::new());
    run.start_run().unwrap();
    play_out(&mut run);
    assert_eq!(run.phase(), RunPhase::AwaitingCapture(BEAR));
    run.capture().unwrap();

    let progression = run.into_progression();
    assert!(progression.character(BEAR).unwrap().unlocked);
    assert_eq!(progression.currency(), 18);

    let reloaded = TrophyTracker::load(GameConfig::default().trophies, Box::new(store));
    assert!(reloaded.is_unlocked("bear-captured"));
}

#[test]
fn test_file_store_survives_reload() {
    let dir = TempDir::new().unwrap();
    let mut rng = SeededRng::seed_from_u64(1);

    let mut progression = ProgressionStore::load_or_new(
        GameConfig::default(),
        Box::new(JsonFileStore::new(dir.path())),
    )
    .unwrap();
    assert_eq!(progression.currency(), 10);
    progression.flip_card(WOLF, 6, &mut rng).unwrap();
    let grid = progression.character(WOLF).unwrap().card_grid;

    let reloaded = ProgressionStore::load_or_new(
        GameConfig::default(),
        Box::new(JsonFileStore::new(dir.path())),
    )
    .unwrap();
    assert_eq!(reloaded.currency(), 9);
    let wolf = reloaded.character(WOLF).unwrap();
    assert!(wolf.flipped[6]);
    assert_eq!(wolf.card_grid, grid);
}
