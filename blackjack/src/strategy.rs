use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{
    simulation::{counter::HiLoCounter, hand::Hand},
    Action, Rule, StateKey, ValueTable,
};

pub trait Strategy {
    /// Picks one of `valid_actions`, which is never empty and always starts with Stand.
    fn make_decision(
        &mut self,
        table: &ValueTable,
        state: &StateKey,
        valid_actions: &[Action],
    ) -> Action;
}

/// Always takes the valid action with the highest learned value.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn make_decision(
        &mut self,
        table: &ValueTable,
        state: &StateKey,
        valid_actions: &[Action],
    ) -> Action {
        table.best_action(state, valid_actions)
    }
}

/// With probability epsilon picks a valid action uniformly at random, otherwise
/// acts greedily.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyStrategy {
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedyStrategy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        EpsilonGreedyStrategy {
            epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }
}

impl Strategy for EpsilonGreedyStrategy {
    fn make_decision(
        &mut self,
        table: &ValueTable,
        state: &StateKey,
        valid_actions: &[Action],
    ) -> Action {
        if self.rng.gen::<f64>() < self.epsilon {
            if let Some(&action) = valid_actions.choose(&mut self.rng) {
                return action;
            }
        }
        table.best_action(state, valid_actions)
    }
}

/// Recommends an action for a live hand from a trained table, encoding the state
/// exactly as training does.
pub fn recommend(
    rule: &Rule,
    table: &ValueTable,
    hand: &Hand,
    dealer_up_value: u8,
    counter: &HiLoCounter,
    is_initial_hand: bool,
) -> Action {
    let state = StateKey::encode(
        hand,
        dealer_up_value,
        counter,
        is_initial_hand,
        rule.count_bucketing,
    );
    let valid_actions = Action::valid_for(hand, is_initial_hand, rule.max_splits);
    GreedyStrategy.make_decision(table, &state, &valid_actions)
}
