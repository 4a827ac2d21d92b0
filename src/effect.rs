//! Move effects module.
//!
//! A move may carry any number of effects on top of its damage. Effects
//! are a closed set of four kinds; resolving a move turns them into
//! [`StatDelta`]s that the caller applies to the combatants.

use crate::stat::StatKind;
use serde::{Deserialize, Serialize};

/// A side effect of a move, applied after damage.
///
/// Serialized as an externally tagged object, e.g.
/// `{"statBuff": {"stat": "speed", "value": 5}}` or `"blockNext"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveEffect {
    /// Add `value` to one of the actor's own stats.
    StatBuff { stat: StatKind, value: i32 },
    /// Add to the actor's own attack.
    SelfAttackBuff(i32),
    /// The actor blocks the next incoming hit.
    BlockNext,
    /// Signed change to the opponent's defense, floored at zero.
    EnemyDefenseDelta(i32),
}

impl MoveEffect {
    /// The delta this effect produces.
    pub fn to_delta(self) -> StatDelta {
        match self {
            MoveEffect::StatBuff { stat, value } => StatDelta::Stat {
                who: Recipient::Actor,
                stat,
                amount: value,
            },
            MoveEffect::SelfAttackBuff(value) => StatDelta::Stat {
                who: Recipient::Actor,
                stat: StatKind::Attack,
                amount: value,
            },
            MoveEffect::BlockNext => StatDelta::Blocking {
                who: Recipient::Actor,
                active: true,
            },
            MoveEffect::EnemyDefenseDelta(value) => StatDelta::Stat {
                who: Recipient::Target,
                stat: StatKind::Defense,
                amount: value,
            },
        }
    }
}

/// Which side of a move a delta lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    Actor,
    Target,
}

/// A state change described by move resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatDelta {
    /// Signed change to a live combat stat.
    Stat {
        who: Recipient,
        stat: StatKind,
        amount: i32,
    },
    /// Raise or clear the blocking flag.
    Blocking { who: Recipient, active: bool },
}

impl StatDelta {
    /// Short description for the combat log, naming the affected side.
    pub fn describe(&self, actor: &str, target: &str) -> String {
        let name = |who: Recipient| match who {
            Recipient::Actor => actor,
            Recipient::Target => target,
        };
        match *self {
            StatDelta::Stat { who, stat, amount } => {
                format!("{} {} {:+}", name(who), stat, amount)
            }
            StatDelta::Blocking { who, active: true } => format!("{} is guarding", name(who)),
            StatDelta::Blocking { who, active: false } => {
                format!("{} lowers its guard", name(who))
            }
        }
    }
}
