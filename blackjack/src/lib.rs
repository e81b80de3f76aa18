mod error;
pub mod simulation;
mod statearray;
pub mod strategy;
pub mod training;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::{Display, EnumIter};

pub use error::Error;
use simulation::hand::Hand;
pub use statearray::{count_bucket, StateKey, ValueTable};
pub use training::{Trainer, TrainingConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub number_of_decks: u8,
    /// Fraction of the shoe dealt before it is rebuilt. Must lie in (0, 1).
    pub penetration: f64,
    /// How many times a single round may split. 0 disables splitting.
    pub max_splits: u8,
    pub count_bucketing: CountBucketing,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 6,
            penetration: 0.75,
            max_splits: 3,
            count_bucketing: CountBucketing::Floor,
        }
    }
}

/// How the true count is turned into a value table bucket after clamping to [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum CountBucketing {
    Floor,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Action {
    Stand = 0,
    Hit,
    Double,
    Split,
}

impl Action {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the actions a hand may take, ordered by index. Double and Split are only
    /// possible on an initial hand, Split additionally needs a pair and a split left.
    pub fn valid_for(hand: &Hand, is_initial_hand: bool, splits_left: u8) -> Vec<Action> {
        let mut valid = Vec::with_capacity(Action::COUNT);
        valid.push(Action::Stand);
        valid.push(Action::Hit);
        if is_initial_hand {
            valid.push(Action::Double);
            if hand.can_split() && splits_left > 0 {
                valid.push(Action::Split);
            }
        }
        valid
    }
}
