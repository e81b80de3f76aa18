use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::simulation::{RoundOutcome, Simulator, SimulatorEventHandler};
use crate::strategy::EpsilonGreedyStrategy;
use crate::{Error, Rule, ValueTable};

/// Hyperparameters of the Q-learning loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub episodes: u64,
    /// Alpha, in (0, 1].
    pub learning_rate: f64,
    /// Gamma, in [0, 1].
    pub discount: f64,
    pub epsilon_start: f64,
    /// Epsilon never decays below this.
    pub epsilon_end: f64,
    /// Epsilon is multiplied by this after every episode.
    pub epsilon_decay: f64,
    /// Log progress every this many episodes.
    pub progress_interval: u64,
    pub seed: u64,
    /// Rebuild the shoe before every episode instead of playing it down.
    pub fresh_shoe_each_round: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 5_000_000,
            learning_rate: 0.1,
            discount: 0.95,
            epsilon_start: 1.0,
            epsilon_end: 0.01,
            epsilon_decay: 0.999995,
            progress_interval: 100_000,
            seed: 0,
            fresh_shoe_each_round: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let checks = [
            (
                "learning_rate",
                self.learning_rate,
                self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            ),
            (
                "discount",
                self.discount,
                (0.0..=1.0).contains(&self.discount),
            ),
            (
                "epsilon_start",
                self.epsilon_start,
                (0.0..=1.0).contains(&self.epsilon_start),
            ),
            (
                "epsilon_end",
                self.epsilon_end,
                self.epsilon_end >= 0.0 && self.epsilon_end <= self.epsilon_start,
            ),
            (
                "epsilon_decay",
                self.epsilon_decay,
                self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            ),
            (
                "progress_interval",
                self.progress_interval as f64,
                self.progress_interval > 0,
            ),
        ];
        for (name, value, valid) in checks {
            if !valid {
                return Err(Error::InvalidHyperparameter { name, value });
            }
        }
        Ok(())
    }
}

/// Owns the value table and plays episodes against it, applying one Bellman update
/// per episode.
pub struct Trainer {
    config: TrainingConfig,
    table: ValueTable,
    simulator: Simulator,
    strategy: EpsilonGreedyStrategy,
    episode: u64,
}

impl Trainer {
    pub fn new(rule: &Rule, config: &TrainingConfig) -> Result<Self, Error> {
        Self::with_table(rule, config, ValueTable::new())
    }

    /// Continues training from an existing table.
    pub fn with_table(
        rule: &Rule,
        config: &TrainingConfig,
        table: ValueTable,
    ) -> Result<Self, Error> {
        config.validate()?;
        let mut seeder = StdRng::seed_from_u64(config.seed);
        let simulator = Simulator::new(rule, seeder.gen())?;
        let strategy = EpsilonGreedyStrategy::new(config.epsilon_start, seeder.gen());
        Ok(Trainer {
            config: *config,
            table,
            simulator,
            strategy,
            episode: 0,
        })
    }

    /// Runs the remaining episodes.
    pub fn train<U: SimulatorEventHandler>(&mut self, handler: &mut U) -> Result<(), Error> {
        info!(episodes = self.config.episodes, "starting training");
        while self.episode < self.config.episodes {
            self.train_episode(handler)?;
        }
        info!(
            episodes = self.episode,
            visited_states = self.table.visited_states(),
            "training finished"
        );
        Ok(())
    }

    pub fn train_episode<U: SimulatorEventHandler>(
        &mut self,
        handler: &mut U,
    ) -> Result<RoundOutcome, Error> {
        let outcome = self
            .simulator
            .simulate_round(&self.table, &mut self.strategy, handler)?;
        apply_bellman_update(
            &mut self.table,
            &outcome,
            self.config.learning_rate,
            self.config.discount,
        );
        self.simulator
            .start_new_round(self.config.fresh_shoe_each_round)?;

        let epsilon =
            (self.strategy.epsilon() * self.config.epsilon_decay).max(self.config.epsilon_end);
        self.strategy.set_epsilon(epsilon);

        if self.episode % self.config.progress_interval == 0 {
            info!(episode = self.episode, epsilon, "training progress");
        }
        self.episode += 1;
        Ok(outcome)
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn epsilon(&self) -> f64 {
        self.strategy.epsilon()
    }

    pub fn episodes_played(&self) -> u64 {
        self.episode
    }
}

/// Moves the value of the round's decision toward its reward plus the discounted best
/// value of the final state. Returns the new value.
pub fn apply_bellman_update(
    table: &mut ValueTable,
    outcome: &RoundOutcome,
    learning_rate: f64,
    discount: f64,
) -> f64 {
    let state = &outcome.decision.state;
    let action = outcome.decision.action.index();

    let max_future_value = table.best_value(&outcome.next_state);
    let current_value = table[state][action];
    let new_value = current_value
        + learning_rate * (f64::from(outcome.reward) + discount * max_future_value - current_value);
    table[state][action] = new_value;
    new_value
}
