//! # buffbrawl - Combat and Progression Core for a Turn-Based Battler
//!
//! The rules engine of a small battler where a character trains by
//! flipping cards, then fights scripted waves and a boss:
//! - **Speed-driven** turn order (faster combatants act more often)
//! - **Pure** move resolution (accuracy, damage, blocking, buffs)
//! - **Deterministic** under test (every random draw goes through [`rng::GameRng`])
//! - **Persistent** progression behind an opaque key-value store
//!
//! ## Core Concepts
//!
//! ### Stat Pipeline
//!
//! Effective combat stats are computed from sources:
//!
//! ```text
//! [LevelScaledBase] + [FlippedCardSource]* → [ResolvedStats]
//! ```
//!
//! ### Turn Loop
//!
//! ```text
//! TurnScheduler → whose turn → MoveResolver → MoveOutcome → apply → next turn
//! ```
//!
//! ### Run Loop
//!
//! ```text
//! wave 1 → wave 2 → wave 3 → boss → (capture) → end
//!    └──────── any defeat ends the run ────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use buffbrawl::config::GameConfig;
//! use buffbrawl::persistence::MemoryStore;
//! use buffbrawl::progression::ProgressionStore;
//! use buffbrawl::rng::SeededRng;
//! use buffbrawl::run::{RunController, RunPhase};
//! use buffbrawl::combat::CombatPhase;
//!
//! let progression = ProgressionStore::new_game(GameConfig::default(), Box::new(MemoryStore::new()))?;
//! let mut run = RunController::new(progression, SeededRng::seed_from_u64(42));
//!
//! run.start_run()?;
//! while run.phase() == RunPhase::InCombat {
//!     match run.session().map(|s| s.phase()) {
//!         Some(CombatPhase::AwaitingPlayerInput) => { run.submit_move(0)?; }
//!         _ => { run.run_monster_turn()?; }
//!     }
//! }
//! if run.phase() != RunPhase::Idle {
//!     run.end_run()?; // decline the capture offer
//! }
//! assert_eq!(run.wave(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`stat`] - Stat kinds and stat blocks
//! - [`numeric`] - Fixed-point multipliers
//! - [`source`] - Stat sources
//! - [`resolved`] - Resolved stats with breakdowns
//! - [`engine`] - Effective stat computation
//! - [`content`] - Characters, moves, monsters
//! - [`effect`] - Move effects and stat deltas
//! - [`cards`] - Training cards and grid generation
//! - [`rng`] - Injectable randomness
//! - [`scheduler`] - Turn order
//! - [`resolver`] - Move resolution
//! - [`combat`] - Combat sessions
//! - [`progression`] - Player progression
//! - [`persistence`] - Save/load boundary
//! - [`trophy`] - Achievements
//! - [`run`] - Run sequencing
//! - [`config`] - Game configuration
//! - [`error`] - Error types

pub mod cards;
pub mod combat;
pub mod config;
pub mod content;
pub mod effect;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod persistence;
pub mod progression;
pub mod resolved;
pub mod resolver;
pub mod rng;
pub mod run;
pub mod scheduler;
pub mod source;
pub mod stat;
pub mod trophy;

// Re-export main types for convenience
pub use combat::{CombatPhase, CombatSession, CombatSnapshot, Combatant};
pub use config::GameConfig;
pub use content::{CharacterDefinition, CharacterId, MonsterDefinition, MonsterInstance, Move};
pub use effect::{MoveEffect, StatDelta};
pub use engine::StatEngine;
pub use error::{ConfigError, ProgressionError, RunError};
pub use numeric::Multiplier;
pub use resolved::{ResolvedStat, ResolvedStats};
pub use resolver::{compute_damage, resolve_move, MoveOutcome};
pub use run::RunController;
pub use scheduler::{TurnOwner, TurnScheduler};
pub use stat::{StatBlock, StatKind};

// Re-export persistence and progression types
pub use persistence::{JsonFileStore, MemoryStore, SaveStore};
pub use progression::{FlipOutcome, LevelUpOutcome, ProgressionStore};
