//! Persistent player progression.
//!
//! [`ProgressionStore`] is the single writer of the player save: flip
//! tokens, the wave counter, the selected character and each character's
//! unlock, level and training grid. Every mutating operation either fails
//! with nothing changed or commits and persists the whole record.
//!
//! Economy rules:
//! - flipping the n-th card of a grid costs n tokens (1, 2, ... 9)
//! - levelling up needs `cards_required_for_level_up` flipped cards, clears
//!   all flips and deals a fresh grid
//! - a character at level `n` knows its first `n` moves

use crate::cards::{generate_card_grid, Card, CardGrid, TOTAL_CARDS};
use crate::config::GameConfig;
use crate::content::{CharacterDefinition, CharacterId, Move};
use crate::engine::StatEngine;
use crate::error::{ConfigError, ProgressionError};
use crate::persistence::{CharacterSave, SaveData, SaveStore, SAVE_KEY};
use crate::resolved::ResolvedStats;
use crate::rng::GameRng;
use crate::stat::StatBlock;
use crate::trophy::ProgressionObserver;
use serde::{Deserialize, Serialize};

/// Runtime state of one roster slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProgress {
    pub id: CharacterId,
    pub unlocked: bool,
    pub level: u8,
    pub flipped: [bool; TOTAL_CARDS],
    /// Generated the first time the character trains.
    pub card_grid: Option<CardGrid>,
}

impl CharacterProgress {
    fn fresh(definition: &CharacterDefinition) -> Self {
        Self {
            id: definition.id,
            unlocked: definition.unlocked_by_default,
            level: 1,
            flipped: [false; TOTAL_CARDS],
            card_grid: None,
        }
    }

    /// Cards flipped in the current grid.
    pub fn flipped_count(&self) -> usize {
        self.flipped.iter().filter(|f| **f).count()
    }

    /// Cost of the next flip, `None` once every card is face up.
    pub fn next_flip_cost(&self) -> Option<u32> {
        let count = self.flipped_count();
        (count < TOTAL_CARDS).then(|| count as u32 + 1)
    }

    /// Face-up cards with their grid index.
    pub fn revealed_cards(&self) -> Vec<(usize, Card)> {
        match &self.card_grid {
            Some(grid) => grid
                .iter()
                .enumerate()
                .filter(|(index, _)| self.flipped[*index])
                .map(|(index, card)| (index, *card))
                .collect(),
            None => Vec::new(),
        }
    }

    fn to_save(&self) -> CharacterSave {
        CharacterSave {
            id: self.id,
            unlocked: self.unlocked,
            level: self.level,
            flipped_cards: self.flipped,
            card_grid: self.card_grid,
        }
    }
}

/// Result of a flip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Flipped { card: Card, cost: u32 },
    /// The card was already face up; nothing was charged.
    AlreadyFlipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpOutcome {
    pub level: u8,
    /// Name of the move learned at the new level.
    pub unlocked_move: Option<String>,
}

/// Everything a training screen shows for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingView {
    pub id: CharacterId,
    pub name: String,
    pub level: u8,
    pub max_level: u8,
    pub flipped_count: usize,
    pub next_flip_cost: Option<u32>,
    pub can_level_up: bool,
    pub stats: ResolvedStats,
    pub moves: Vec<Move>,
    pub revealed: Vec<(usize, Card)>,
    pub portrait: Option<String>,
}

/// Owner of the player save.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::config::GameConfig;
/// use buffbrawl::persistence::MemoryStore;
/// use buffbrawl::progression::{FlipOutcome, ProgressionStore};
/// use buffbrawl::rng::SeededRng;
///
/// let mut store = ProgressionStore::new_game(GameConfig::default(), Box::new(MemoryStore::new()))?;
/// let mut rng = SeededRng::seed_from_u64(3);
///
/// let outcome = store.flip_card(1, 4, &mut rng)?;
/// assert!(matches!(outcome, FlipOutcome::Flipped { cost: 1, .. }));
/// assert_eq!(store.currency(), 9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ProgressionStore {
    config: GameConfig,
    currency: u32,
    current_wave: u32,
    current_character: CharacterId,
    characters: Vec<CharacterProgress>,
    store: Box<dyn SaveStore>,
    observers: Vec<Box<dyn ProgressionObserver>>,
}

impl ProgressionStore {
    /// Fresh game: default roster, initial flip tokens, nothing saved yet.
    pub fn new_game(config: GameConfig, store: Box<dyn SaveStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let characters: Vec<CharacterProgress> = config
            .characters
            .iter()
            .map(CharacterProgress::fresh)
            .collect();
        let current_character = characters
            .iter()
            .find(|c| c.unlocked)
            .map(|c| c.id)
            .ok_or(ConfigError::NoStartingCharacter)?;
        Ok(Self {
            currency: config.initial_flip_tokens,
            current_wave: 0,
            current_character,
            characters,
            config,
            store,
            observers: Vec::new(),
        })
    }

    /// Restore the save held by `store`, or start fresh when there is none
    /// or it cannot be read.
    ///
    /// Saved records are matched to the roster by id; unknown ids are
    /// dropped and levels clamped into range. Runs are not resumed, so the
    /// wave counter comes back as 0.
    pub fn load_or_new(config: GameConfig, store: Box<dyn SaveStore>) -> Result<Self, ConfigError> {
        let saved = store
            .load(SAVE_KEY)
            .and_then(|value| match serde_json::from_value::<SaveData>(value) {
                Ok(data) => Some(data),
                Err(err) => {
                    tracing::warn!(%err, "save unreadable, starting a new game");
                    None
                }
            });
        let mut progression = Self::new_game(config, store)?;
        if let Some(data) = saved {
            progression.overlay(data);
        }
        Ok(progression)
    }

    fn overlay(&mut self, data: SaveData) {
        let max_level = self.config.max_level;
        self.currency = data.currency;
        for saved in data.characters {
            let Some(slot) = self.characters.iter_mut().find(|c| c.id == saved.id) else {
                tracing::debug!(id = saved.id, "ignoring saved character not in roster");
                continue;
            };
            slot.unlocked = saved.unlocked;
            slot.level = saved.level.clamp(1, max_level);
            slot.flipped = saved.flipped_cards;
            slot.card_grid = saved.card_grid;
        }
        if let Some(current) = self
            .characters
            .iter()
            .find(|c| c.id == data.current_character_id && c.unlocked)
            .or_else(|| self.characters.iter().find(|c| c.unlocked))
        {
            self.current_character = current.id;
        }
        tracing::info!(
            currency = self.currency,
            character = self.current_character,
            "save loaded"
        );
    }

    /// Register an observer for level-up and unlock events.
    pub fn add_observer(&mut self, observer: Box<dyn ProgressionObserver>) {
        self.observers.push(observer);
    }

    /// Content and economy constants in use.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Flip tokens on hand.
    pub fn currency(&self) -> u32 {
        self.currency
    }

    /// Current wave of the active run, 0 when no run is active.
    pub fn wave(&self) -> u32 {
        self.current_wave
    }

    pub(crate) fn set_wave(&mut self, wave: u32) {
        self.current_wave = wave;
    }

    /// The selected character; always an unlocked one.
    pub fn current_character_id(&self) -> CharacterId {
        self.current_character
    }

    /// Progress for every character, in config order.
    pub fn characters(&self) -> &[CharacterProgress] {
        &self.characters
    }

    /// Progress for one character.
    pub fn character(&self, id: CharacterId) -> Option<&CharacterProgress> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Static definition of a character, or `UnknownCharacter`.
    pub fn definition(&self, id: CharacterId) -> Result<&CharacterDefinition, ProgressionError> {
        self.config
            .character(id)
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    fn slot(&self, id: CharacterId) -> Result<&CharacterProgress, ProgressionError> {
        self.character(id)
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    fn slot_mut(&mut self, id: CharacterId) -> Result<&mut CharacterProgress, ProgressionError> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    fn unlocked_slot(&self, id: CharacterId) -> Result<&CharacterProgress, ProgressionError> {
        let slot = self.slot(id)?;
        if !slot.unlocked {
            return Err(ProgressionError::CharacterLocked(id));
        }
        Ok(slot)
    }

    /// Make `id` the character used for the next run.
    pub fn select_character(&mut self, id: CharacterId) -> Result<(), ProgressionError> {
        self.unlocked_slot(id)?;
        self.current_character = id;
        self.save();
        Ok(())
    }

    /// The character's grid, dealt and persisted on first use.
    pub fn ensure_card_grid<R: GameRng>(
        &mut self,
        id: CharacterId,
        rng: &mut R,
    ) -> Result<CardGrid, ProgressionError> {
        if let Some(grid) = self.slot(id)?.card_grid {
            return Ok(grid);
        }
        let grid = self.deal_grid(rng);
        self.slot_mut(id)?.card_grid = Some(grid);
        tracing::debug!(id, "card grid generated");
        self.save();
        Ok(grid)
    }

    fn deal_grid<R: GameRng>(&self, rng: &mut R) -> CardGrid {
        generate_card_grid(&self.config.power_card_ranges, self.config.power_cards, rng)
    }

    /// Flip the card at `index`, paying one more token than the previous
    /// flip of this grid.
    pub fn flip_card<R: GameRng>(
        &mut self,
        id: CharacterId,
        index: usize,
        rng: &mut R,
    ) -> Result<FlipOutcome, ProgressionError> {
        self.unlocked_slot(id)?;
        if index >= TOTAL_CARDS {
            return Err(ProgressionError::CardIndexOutOfRange {
                index,
                total: TOTAL_CARDS,
            });
        }
        let slot = self.slot(id)?;
        if slot.flipped[index] {
            return Ok(FlipOutcome::AlreadyFlipped);
        }
        let cost = slot.flipped_count() as u32 + 1;
        if self.currency < cost {
            return Err(ProgressionError::InsufficientFunds {
                needed: cost,
                available: self.currency,
            });
        }
        // A rejected flip leaves the saved record untouched, grid included.
        let grid = self.ensure_card_grid(id, rng)?;

        self.currency -= cost;
        self.slot_mut(id)?.flipped[index] = true;
        let card = grid[index];
        tracing::debug!(id, index, cost, ?card, currency = self.currency, "card flipped");
        self.save();
        Ok(FlipOutcome::Flipped { card, cost })
    }

    /// Raise the character one level, clear its flips and deal a new grid.
    pub fn level_up<R: GameRng>(
        &mut self,
        id: CharacterId,
        rng: &mut R,
    ) -> Result<LevelUpOutcome, ProgressionError> {
        let slot = self.unlocked_slot(id)?;
        if slot.level >= self.config.max_level {
            return Err(ProgressionError::MaxLevel {
                id,
                level: slot.level,
            });
        }
        let flipped = slot.flipped_count();
        let required = self.config.cards_required_for_level_up;
        if flipped < required {
            return Err(ProgressionError::NotEnoughFlips {
                id,
                flipped,
                required,
            });
        }

        let grid = self.deal_grid(rng);
        let slot = self.slot_mut(id)?;
        slot.level += 1;
        slot.flipped = [false; TOTAL_CARDS];
        slot.card_grid = Some(grid);
        let level = slot.level;

        let unlocked_move = self
            .definition(id)?
            .move_learned_at(level)
            .map(|mv| mv.name.clone());
        tracing::info!(id, level, move_name = ?unlocked_move, "character levelled up");
        self.save();
        for observer in &mut self.observers {
            observer.on_level_up(id, level);
        }
        Ok(LevelUpOutcome {
            level,
            unlocked_move,
        })
    }

    /// Unlock a character. Returns `true` when it was locked before.
    pub fn unlock_character(&mut self, id: CharacterId) -> Result<bool, ProgressionError> {
        let slot = self.slot_mut(id)?;
        let newly = !slot.unlocked;
        slot.unlocked = true;
        self.save();
        if newly {
            tracing::info!(id, "character unlocked");
            for observer in &mut self.observers {
                observer.on_character_unlocked(id);
            }
        }
        Ok(newly)
    }

    /// Add flip tokens and save.
    pub fn award_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
        tracing::debug!(amount, currency = self.currency, "currency awarded");
        self.save();
    }

    /// Spend tokens; fails without change when the balance is too low.
    pub fn spend_currency(&mut self, amount: u32) -> Result<(), ProgressionError> {
        if self.currency < amount {
            return Err(ProgressionError::InsufficientFunds {
                needed: amount,
                available: self.currency,
            });
        }
        self.currency -= amount;
        self.save();
        Ok(())
    }

    fn engine(&self, id: CharacterId) -> Result<StatEngine, ProgressionError> {
        let slot = self.slot(id)?;
        let definition = self.definition(id)?;
        Ok(StatEngine::for_character(
            definition,
            slot.level,
            self.config.level_bonus(slot.level),
            slot.card_grid.as_ref(),
            &slot.flipped,
        ))
    }

    /// Combat stats from level and flipped power cards.
    pub fn effective_stats(&self, id: CharacterId) -> Result<StatBlock, ProgressionError> {
        Ok(self.engine(id)?.resolve_block())
    }

    /// Moves available at the character's current level.
    pub fn unlocked_moves(&self, id: CharacterId) -> Result<&[Move], ProgressionError> {
        let level = self.slot(id)?.level;
        Ok(self.definition(id)?.unlocked_moves(level))
    }

    /// Everything the training screen shows for one character.
    pub fn training_view(&self, id: CharacterId) -> Result<TrainingView, ProgressionError> {
        let slot = self.slot(id)?;
        let definition = self.definition(id)?;
        let max_level = self.config.max_level;
        Ok(TrainingView {
            id,
            name: definition.name.clone(),
            level: slot.level,
            max_level,
            flipped_count: slot.flipped_count(),
            next_flip_cost: slot.next_flip_cost(),
            can_level_up: slot.unlocked
                && slot.level < max_level
                && slot.flipped_count() >= self.config.cards_required_for_level_up,
            stats: self.engine(id)?.resolve(),
            moves: definition.unlocked_moves(slot.level).to_vec(),
            revealed: slot.revealed_cards(),
            portrait: definition.portrait(slot.level).map(str::to_string),
        })
    }

    /// Snapshot of the persisted record.
    pub fn save_data(&self) -> SaveData {
        SaveData {
            currency: self.currency,
            current_wave: self.current_wave,
            characters: self.characters.iter().map(CharacterProgress::to_save).collect(),
            current_character_id: self.current_character,
        }
    }

    /// Write the whole record to the store.
    pub fn save(&mut self) {
        match serde_json::to_value(self.save_data()) {
            Ok(value) => self.store.save(SAVE_KEY, &value),
            Err(err) => tracing::warn!(%err, "failed to encode save"),
        }
    }
}
