use std::path::Path;

use anyhow::Context;
use blackjack::simulation::{hand::Hand, Decision, RoundOutcome, SimulatorEventHandler};
use blackjack::{Action, Trainer, TrainingConfig, ValueTable};
use tracing::info;

use self::private::Statistics;

mod private {
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Statistics {
        rounds: u64,
        wins: u64,
        losses: u64,
        pushes: u64,
        busts: u64,
        doubles: u64,
        splits: u64,
        total_reward: i64,
    }

    impl Statistics {
        pub fn record_round(&mut self, reward: i8) {
            self.rounds += 1;
            self.total_reward += reward as i64;
            match reward {
                r if r > 0 => self.wins += 1,
                r if r < 0 => self.losses += 1,
                _ => self.pushes += 1,
            }
        }

        pub fn record_bust(&mut self) {
            self.busts += 1;
        }

        pub fn record_double(&mut self) {
            self.doubles += 1;
        }

        pub fn record_split(&mut self) {
            self.splits += 1;
        }

        pub fn get_rounds(&self) -> u64 {
            self.rounds
        }

        pub fn get_rate(&self, count: u64) -> f64 {
            if self.rounds == 0 {
                0.0
            } else {
                count as f64 / self.rounds as f64
            }
        }

        pub fn get_win_rate(&self) -> f64 {
            self.get_rate(self.wins)
        }

        pub fn get_loss_rate(&self) -> f64 {
            self.get_rate(self.losses)
        }

        pub fn get_push_rate(&self) -> f64 {
            self.get_rate(self.pushes)
        }

        pub fn get_bust_rate(&self) -> f64 {
            self.get_rate(self.busts)
        }

        pub fn get_doubles(&self) -> u64 {
            self.doubles
        }

        pub fn get_splits(&self) -> u64 {
            self.splits
        }

        pub fn get_average_reward(&self) -> f64 {
            if self.rounds == 0 {
                0.0
            } else {
                self.total_reward as f64 / self.rounds as f64
            }
        }
    }
}

/// Collects round statistics and logs them per period, then starts a new period.
#[derive(Debug, Clone, Default)]
struct Handler {
    rounds_in_period: u64,
    period: Statistics,
    total: Statistics,
}

impl Handler {
    fn new(rounds_in_period: u64) -> Self {
        Handler {
            rounds_in_period,
            ..Default::default()
        }
    }

    fn log(label: &str, stat: &Statistics) {
        info!(
            rounds = stat.get_rounds(),
            win_rate = stat.get_win_rate(),
            loss_rate = stat.get_loss_rate(),
            push_rate = stat.get_push_rate(),
            bust_rate = stat.get_bust_rate(),
            doubles = stat.get_doubles(),
            splits = stat.get_splits(),
            average_reward = stat.get_average_reward(),
            "{}",
            label
        );
    }
}

impl SimulatorEventHandler for Handler {
    fn on_make_decision(&mut self, decision: &Decision) {
        if decision.action == Action::Double {
            self.period.record_double();
            self.total.record_double();
        }
    }

    fn on_split(&mut self, _: &Hand) {
        self.period.record_split();
        self.total.record_split();
    }

    fn on_player_bust(&mut self) {
        self.period.record_bust();
        self.total.record_bust();
    }

    fn on_summary_round(&mut self, _: &Hand, _: &Hand, outcome: &RoundOutcome) {
        self.period.record_round(outcome.reward);
        self.total.record_round(outcome.reward);

        if self.period.get_rounds() == self.rounds_in_period {
            Self::log("period statistics", &self.period);
            self.period = Default::default();
        }
    }
}

/// Trains a table, optionally starting from the one at `output`, and writes it back.
pub fn train_and_save(
    rule: &blackjack::Rule,
    training_config: &TrainingConfig,
    output: &Path,
    resume: bool,
) -> anyhow::Result<()> {
    let table = if resume {
        ValueTable::load(output)
            .with_context(|| format!("cannot resume from {}", output.display()))?
    } else {
        ValueTable::new()
    };

    let mut trainer =
        Trainer::with_table(rule, training_config, table).context("cannot set up training")?;
    let mut handler = Handler::new(training_config.progress_interval);
    trainer.train(&mut handler)?;
    Handler::log("overall statistics", &handler.total);

    trainer
        .table()
        .save(output)
        .with_context(|| format!("cannot write table to {}", output.display()))?;
    Ok(())
}
