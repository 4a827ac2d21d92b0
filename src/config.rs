//! Game configuration.
//!
//! [`GameConfig::default`] is the shipped content: Wolf and Bear, three
//! waves and the Bear Boss, plus the economy constants. Other content can
//! be loaded from JSON; every field is optional and falls back to the
//! shipped value. Loaded configs are validated before use.

use crate::cards::{PowerCardRange, TOTAL_CARDS};
use crate::content::{CharacterDefinition, CharacterId, MonsterDefinition, Move};
use crate::effect::MoveEffect;
use crate::error::ConfigError;
use crate::numeric::Multiplier;
use crate::scheduler::SchedulerConfig;
use crate::stat::{StatBlock, StatKind};
use crate::trophy::{TrophyCondition, TrophyDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Flip tokens paid out for a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    pub wave_win: u32,
    pub boss_win: u32,
}

/// How much history and lookahead a combat snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub log_tail: usize,
    pub turn_preview: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossConfig {
    pub monster: MonsterDefinition,
    pub stats_multiplier: Multiplier,
    /// Character offered for capture after the boss falls.
    #[serde(default)]
    pub unlocks_character: Option<CharacterId>,
}

/// Complete game configuration.
///
/// Multipliers are written as decimal factors, so `"levelBonuses":
/// [1.0, 1.1, 1.2]` and `"statsMultiplier": 1.5` load as-is.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::config::GameConfig;
///
/// let config = GameConfig::from_json_str(r#"{ "initialFlipTokens": 25 }"#).unwrap();
/// assert_eq!(config.initial_flip_tokens, 25);
/// assert_eq!(config.max_level, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub initial_flip_tokens: u32,
    pub max_level: u8,
    /// Power cards per grid; the rest of the grid is blank.
    pub power_cards: usize,
    pub cards_required_for_level_up: usize,
    /// Multiplier per level, index 0 for level 1.
    pub level_bonuses: Vec<Multiplier>,
    pub power_card_ranges: Vec<PowerCardRange>,
    pub rewards: Rewards,
    pub characters: Vec<CharacterDefinition>,
    /// Fought in order before the boss.
    pub waves: Vec<MonsterDefinition>,
    pub boss: BossConfig,
    pub trophies: Vec<TrophyDefinition>,
    pub scheduler: SchedulerConfig,
    pub display: DisplayConfig,
}

pub const WOLF: CharacterId = 1;
pub const BEAR: CharacterId = 2;

fn wolf_moves() -> Vec<Move> {
    vec![
        Move::new("Claw", 10, 100).with_description("A basic attack"),
        Move::new("Dash", 0, 90)
            .with_effect(MoveEffect::StatBuff {
                stat: StatKind::Speed,
                value: 5,
            })
            .with_description("Increase speed"),
        Move::new("Roar", 5, 75)
            .with_effect(MoveEffect::EnemyDefenseDelta(-10))
            .with_effect(MoveEffect::SelfAttackBuff(5))
            .with_description("Decrease opponent defense -10, increase your attack +5"),
    ]
}

fn bear_moves() -> Vec<Move> {
    vec![
        Move::new("Slam", 30, 100).with_description("A powerful attack"),
        Move::new("Guard", 0, 80)
            .with_effect(MoveEffect::BlockNext)
            .with_description("Block next attack"),
        Move::new("Crush", 30, 75)
            .with_effect(MoveEffect::EnemyDefenseDelta(-5))
            .with_description("Attack and reduce defense"),
    ]
}

/// Bear's moves as the boss uses them: plain attacks without effects.
fn boss_moves() -> Vec<Move> {
    bear_moves()
        .into_iter()
        .map(|mv| Move {
            effects: Vec::new(),
            ..mv
        })
        .collect()
}

fn portraits(name: &str) -> Vec<String> {
    (1..=3)
        .map(|level| format!("images/{name}-level{level}-icon.png"))
        .collect()
}

fn wave(name: &str, stats: StatBlock, attack: Move, image: &str) -> MonsterDefinition {
    MonsterDefinition {
        name: name.into(),
        stats,
        moves: vec![attack],
        image: Some(image.into()),
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_flip_tokens: 10,
            max_level: 3,
            power_cards: 6,
            cards_required_for_level_up: 6,
            level_bonuses: vec![
                Multiplier::from_percent(100),
                Multiplier::from_percent(110),
                Multiplier::from_percent(120),
            ],
            power_card_ranges: vec![
                PowerCardRange::new(StatKind::Attack, 1, 5),
                PowerCardRange::new(StatKind::Defense, 1, 5),
                PowerCardRange::new(StatKind::Speed, 1, 2),
            ],
            rewards: Rewards {
                wave_win: 1,
                boss_win: 5,
            },
            characters: vec![
                CharacterDefinition {
                    id: WOLF,
                    name: "Wolf".into(),
                    base: StatBlock::new(50, 10, 10, 15),
                    moves: wolf_moves(),
                    portraits: portraits("wolf"),
                    unlocked_by_default: true,
                },
                CharacterDefinition {
                    id: BEAR,
                    name: "Bear".into(),
                    base: StatBlock::new(40, 30, 10, 10),
                    moves: bear_moves(),
                    portraits: portraits("bear"),
                    unlocked_by_default: false,
                },
            ],
            waves: vec![
                wave(
                    "Weak Grunt",
                    StatBlock::new(30, 5, 5, 10),
                    Move::new("Scratch", 5, 100),
                    "images/enemy-wave1.png",
                ),
                wave(
                    "Tough Brute",
                    StatBlock::new(40, 8, 8, 8),
                    Move::new("Punch", 8, 100),
                    "images/enemy-wave2.png",
                ),
                wave(
                    "Elite Warrior",
                    StatBlock::new(45, 10, 10, 12),
                    Move::new("Heavy Blow", 12, 100),
                    "images/enemy-wave3.png",
                ),
            ],
            boss: BossConfig {
                monster: MonsterDefinition {
                    name: "Bear Boss".into(),
                    stats: StatBlock::new(40, 30, 10, 10),
                    moves: boss_moves(),
                    image: Some("images/bear-boss.png".into()),
                },
                stats_multiplier: Multiplier::from_percent(150),
                unlocks_character: Some(BEAR),
            },
            trophies: vec![
                TrophyDefinition {
                    id: "bear-captured".into(),
                    name: "Bear Necessities".into(),
                    condition: TrophyCondition::CharacterUnlocked { character: BEAR },
                    flavor_text: "You've captured the mighty bear. Now the real training begins!"
                        .into(),
                    icon: Some("images/bear-level1-icon.png".into()),
                },
                TrophyDefinition {
                    id: "wolf-master".into(),
                    name: "Alpha Wolf".into(),
                    condition: TrophyCondition::CharacterLevel {
                        character: WOLF,
                        level: 3,
                    },
                    flavor_text: "The pack leader has reached their full potential.".into(),
                    icon: Some("images/wolf-level3-icon.png".into()),
                },
                TrophyDefinition {
                    id: "bear-master".into(),
                    name: "Grizzly Veteran".into(),
                    condition: TrophyCondition::CharacterLevel {
                        character: BEAR,
                        level: 3,
                    },
                    flavor_text: "This bear is now an unstoppable force of nature.".into(),
                    icon: Some("images/bear-level3-icon.png".into()),
                },
            ],
            scheduler: SchedulerConfig::default(),
            display: DisplayConfig {
                log_tail: 3,
                turn_preview: 5,
            },
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            characters = config.characters.len(),
            waves = config.waves.len(),
            "loaded game config"
        );
        Ok(config)
    }

    /// Character definition by id.
    pub fn character(&self, id: CharacterId) -> Option<&CharacterDefinition> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Multiplier for `level`. Levels past the table use its last entry.
    pub fn level_bonus(&self, level: u8) -> Multiplier {
        let index = usize::from(level.max(1)) - 1;
        self.level_bonuses
            .get(index)
            .or(self.level_bonuses.last())
            .copied()
            .unwrap_or_default()
    }

    /// Check every invariant the core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        if self.level_bonuses.len() != usize::from(self.max_level) {
            return Err(ConfigError::LevelBonusTable {
                expected: usize::from(self.max_level),
                found: self.level_bonuses.len(),
            });
        }
        if self.power_cards > TOTAL_CARDS {
            return Err(ConfigError::TooManyPowerCards {
                power: self.power_cards,
                total: TOTAL_CARDS,
            });
        }
        if self.cards_required_for_level_up > TOTAL_CARDS {
            return Err(ConfigError::LevelUpThreshold {
                required: self.cards_required_for_level_up,
                total: TOTAL_CARDS,
            });
        }
        for range in &self.power_card_ranges {
            if !range.stat.is_trainable() || range.min > range.max {
                return Err(ConfigError::InvalidCardRange {
                    stat: range.stat.to_string(),
                    min: range.min,
                    max: range.max,
                });
            }
        }

        let mut seen = HashSet::new();
        for character in &self.characters {
            if !seen.insert(character.id) {
                return Err(ConfigError::DuplicateCharacter(character.id));
            }
            if character.moves.len() < usize::from(self.max_level) {
                return Err(ConfigError::NotEnoughMoves {
                    name: character.name.clone(),
                    expected: usize::from(self.max_level),
                    found: character.moves.len(),
                });
            }
            check_speed(&character.name, character.base.speed)?;
            check_accuracy(&character.moves)?;
        }
        if !self.characters.iter().any(|c| c.unlocked_by_default) {
            return Err(ConfigError::NoStartingCharacter);
        }

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for monster in &self.waves {
            check_monster(monster, monster.stats.speed)?;
        }
        let boss = &self.boss;
        check_monster(
            &boss.monster,
            boss.stats_multiplier.apply_floor(boss.monster.stats.speed),
        )?;
        if let Some(id) = boss.unlocks_character {
            if self.character(id).is_none() {
                return Err(ConfigError::UnknownCharacter(id));
            }
        }

        for trophy in &self.trophies {
            let id = trophy.condition.character();
            if self.character(id).is_none() {
                return Err(ConfigError::UnknownCharacter(id));
            }
        }
        Ok(())
    }
}

fn check_speed(owner: &str, speed: u32) -> Result<(), ConfigError> {
    if speed == 0 {
        return Err(ConfigError::NonPositiveSpeed {
            owner: owner.to_string(),
        });
    }
    Ok(())
}

fn check_accuracy(moves: &[Move]) -> Result<(), ConfigError> {
    match moves.iter().find(|mv| mv.accuracy > 100) {
        Some(mv) => Err(ConfigError::InvalidAccuracy {
            name: mv.name.clone(),
            accuracy: mv.accuracy,
        }),
        None => Ok(()),
    }
}

fn check_monster(monster: &MonsterDefinition, speed: u32) -> Result<(), ConfigError> {
    if monster.moves.is_empty() {
        return Err(ConfigError::NoMoves {
            name: monster.name.clone(),
        });
    }
    check_speed(&monster.name, speed)
}
