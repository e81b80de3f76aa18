use thiserror::Error;

use crate::simulation::GamePhase;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a shoe needs at least one deck")]
    NoDecks,

    #[error("penetration must lie in (0, 1), got {0}")]
    InvalidPenetration(f64),

    #[error("{name} out of range: {value}")]
    InvalidHyperparameter { name: &'static str, value: f64 },

    #[error("{method} is only allowed in {expected:?} phase, current phase is {actual:?}")]
    WrongPhase {
        method: &'static str,
        expected: GamePhase,
        actual: GamePhase,
    },

    #[error("no card with face value {0} left in the shoe")]
    CardUnavailable(u8),

    #[error("unknown card symbol {0:?}")]
    UnknownCard(String),

    #[error("value table has {found} states, expected {expected}")]
    TableShapeMismatch { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}
