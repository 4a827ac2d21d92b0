//! Achievements.
//!
//! Trophies watch progression events and never feed back into any game
//! decision. [`ProgressionStore`](crate::progression::ProgressionStore)
//! calls every registered [`ProgressionObserver`] after a level-up or an
//! unlock has been committed.

use crate::content::CharacterId;
use crate::persistence::SaveStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Storage key for unlocked trophy ids.
pub const TROPHY_KEY: &str = "buffBrawlTrophies";

/// Receives progression events. Both hooks default to doing nothing.
pub trait ProgressionObserver {
    fn on_level_up(&mut self, _character: CharacterId, _level: u8) {}

    fn on_character_unlocked(&mut self, _character: CharacterId) {}
}

/// What earns a trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TrophyCondition {
    CharacterUnlocked { character: CharacterId },
    CharacterLevel { character: CharacterId, level: u8 },
}

impl TrophyCondition {
    /// The character the condition watches.
    pub fn character(&self) -> CharacterId {
        match *self {
            TrophyCondition::CharacterUnlocked { character }
            | TrophyCondition::CharacterLevel { character, .. } => character,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyDefinition {
    pub id: String,
    pub name: String,
    pub condition: TrophyCondition,
    #[serde(default)]
    pub flavor_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Tracks which trophies are earned and persists them under [`TROPHY_KEY`].
///
/// # Examples
///
/// ```rust
/// use buffbrawl::config::GameConfig;
/// use buffbrawl::persistence::MemoryStore;
/// use buffbrawl::trophy::{ProgressionObserver, TrophyTracker};
///
/// let config = GameConfig::default();
/// let mut trophies = TrophyTracker::load(config.trophies.clone(), Box::new(MemoryStore::new()));
/// trophies.on_character_unlocked(2);
/// assert!(trophies.is_unlocked("bear-captured"));
/// ```
pub struct TrophyTracker {
    definitions: Vec<TrophyDefinition>,
    unlocked: BTreeSet<String>,
    store: Box<dyn SaveStore>,
}

impl TrophyTracker {
    /// Restore earned trophies from `store`. Missing or unreadable data
    /// counts as nothing earned.
    pub fn load(definitions: Vec<TrophyDefinition>, store: Box<dyn SaveStore>) -> Self {
        let unlocked = store
            .load(TROPHY_KEY)
            .and_then(|value| match serde_json::from_value::<BTreeSet<String>>(value) {
                Ok(ids) => Some(ids),
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable trophy data");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            definitions,
            unlocked,
            store,
        }
    }

    /// Whether trophy `id` has been earned.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// All trophies, earned or not.
    pub fn definitions(&self) -> &[TrophyDefinition] {
        &self.definitions
    }

    /// Earned trophies in definition order.
    pub fn unlocked(&self) -> impl Iterator<Item = &TrophyDefinition> {
        self.definitions
            .iter()
            .filter(|t| self.unlocked.contains(&t.id))
    }

    /// Mark a trophy earned. Returns `true` only the first time.
    pub fn unlock(&mut self, id: &str) -> bool {
        let Some(trophy) = self.definitions.iter().find(|t| t.id == id) else {
            tracing::warn!(id, "unknown trophy");
            return false;
        };
        if !self.unlocked.insert(trophy.id.clone()) {
            return false;
        }
        tracing::info!(id, name = %trophy.name, "trophy unlocked");
        self.persist();
        true
    }

    fn persist(&mut self) {
        match serde_json::to_value(&self.unlocked) {
            Ok(value) => self.store.save(TROPHY_KEY, &value),
            Err(err) => tracing::warn!(%err, "failed to encode trophies"),
        }
    }

    fn check(&mut self, earned_by: impl Fn(&TrophyCondition) -> bool) {
        let earned: Vec<String> = self
            .definitions
            .iter()
            .filter(|t| earned_by(&t.condition))
            .map(|t| t.id.clone())
            .collect();
        for id in earned {
            self.unlock(&id);
        }
    }
}

impl ProgressionObserver for TrophyTracker {
    fn on_level_up(&mut self, character: CharacterId, level: u8) {
        self.check(|condition| {
            matches!(*condition, TrophyCondition::CharacterLevel { character: c, level: l }
                if c == character && level >= l)
        });
    }

    fn on_character_unlocked(&mut self, character: CharacterId) {
        self.check(|condition| {
            matches!(*condition, TrophyCondition::CharacterUnlocked { character: c }
                if c == character)
        });
    }
}
