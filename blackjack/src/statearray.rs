use std::fs;
use std::ops::{Index, IndexMut};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::simulation::{counter::HiLoCounter, hand::Hand};
use crate::{Action, CountBucketing, Error};

const PLAYER_TOTALS: usize = 32;
const DEALER_UP_VALUES: usize = 12;
const USABLE_ACE_FLAGS: usize = 2;
const COUNT_BUCKETS: usize = 21;
const SPLIT_FLAGS: usize = 2;
const NUMBER_OF_STATES: usize =
    PLAYER_TOTALS * DEALER_UP_VALUES * USABLE_ACE_FLAGS * COUNT_BUCKETS * SPLIT_FLAGS;

const MIN_PLAYER_TOTAL: u16 = 4;
const MAX_PLAYER_TOTAL: u16 = (PLAYER_TOTALS - 1) as u16;
const MAX_TRUE_COUNT: f64 = 10.0;

/// The discrete state a decision is made in. Training and recommendation must build
/// it the same way, through `StateKey::encode`. Every key lies within the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    /// 4 to 31.
    player_total: u8,
    /// 2 to 11, Ace being 11.
    dealer_up_value: u8,
    usable_ace: bool,
    /// 0 to 20, 10 meaning a true count of 0.
    count_bucket: u8,
    can_split: bool,
}

impl StateKey {
    /// Panics if any field falls outside the value table, which means the simulator
    /// produced a hand the encoder was never meant to see.
    pub fn new(
        player_total: u16,
        dealer_up_value: u8,
        usable_ace: bool,
        count_bucket: u8,
        can_split: bool,
    ) -> StateKey {
        if !(MIN_PLAYER_TOTAL..=MAX_PLAYER_TOTAL).contains(&player_total) {
            panic!(
                "Invalid player total {}! It must be in [{}, {}]",
                player_total, MIN_PLAYER_TOTAL, MAX_PLAYER_TOTAL
            );
        }
        if !(2..=11).contains(&dealer_up_value) {
            panic!("Invalid dealer up value {}! It must be in [2, 11]", dealer_up_value);
        }
        if count_bucket as usize >= COUNT_BUCKETS {
            panic!("Invalid count bucket {}! It must be in [0, 20]", count_bucket);
        }
        StateKey {
            player_total: player_total as u8,
            dealer_up_value,
            usable_ace,
            count_bucket,
            can_split,
        }
    }

    pub fn encode(
        hand: &Hand,
        dealer_up_value: u8,
        counter: &HiLoCounter,
        is_initial_hand: bool,
        bucketing: CountBucketing,
    ) -> StateKey {
        StateKey::new(
            hand.value(),
            dealer_up_value,
            hand.has_usable_ace(),
            count_bucket(counter.true_count(), bucketing),
            is_initial_hand && hand.can_split(),
        )
    }

    pub fn player_total(&self) -> u8 {
        self.player_total
    }

    pub fn dealer_up_value(&self) -> u8 {
        self.dealer_up_value
    }

    pub fn usable_ace(&self) -> bool {
        self.usable_ace
    }

    pub fn count_bucket(&self) -> u8 {
        self.count_bucket
    }

    pub fn can_split(&self) -> bool {
        self.can_split
    }

    fn index(&self) -> usize {
        let mut index = self.player_total as usize;
        index = index * DEALER_UP_VALUES + self.dealer_up_value as usize;
        index = index * USABLE_ACE_FLAGS + self.usable_ace as usize;
        index = index * COUNT_BUCKETS + self.count_bucket as usize;
        index * SPLIT_FLAGS + self.can_split as usize
    }
}

/// Clamps the true count to [-10, 10] and shifts it to a bucket in [0, 20].
pub fn count_bucket(true_count: f64, bucketing: CountBucketing) -> u8 {
    let clamped = true_count.clamp(-MAX_TRUE_COUNT, MAX_TRUE_COUNT);
    let rounded = match bucketing {
        CountBucketing::Floor => clamped.floor(),
        CountBucketing::Nearest => clamped.round(),
    };
    (rounded + MAX_TRUE_COUNT) as u8
}

/// Learned action values for every `StateKey`, stored densely. Use a `StateKey` as the
/// index to get the four action values, ordered by `Action::index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    data: Vec<[f64; Action::COUNT]>,
}

impl ValueTable {
    pub fn new() -> ValueTable {
        ValueTable {
            data: vec![[0.0; Action::COUNT]; NUMBER_OF_STATES],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of states with at least one learned value.
    pub fn visited_states(&self) -> usize {
        self.data
            .iter()
            .filter(|values| values.iter().any(|&v| v != 0.0))
            .count()
    }

    /// The highest value over all four actions, valid or not.
    pub fn best_value(&self, state: &StateKey) -> f64 {
        self[state]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The valid action with the highest value. Ties go to the lowest action index.
    /// Stands if no action is given.
    pub fn best_action(&self, state: &StateKey, valid_actions: &[Action]) -> Action {
        let values = &self[state];
        let mut best: Option<(Action, f64)> = None;
        for &action in valid_actions {
            let value = values[action.index()];
            best = match best {
                Some((best_action, best_value))
                    if best_value > value
                        || (best_value == value && best_action.index() < action.index()) =>
                {
                    Some((best_action, best_value))
                }
                _ => Some((action, value)),
            };
        }
        best.map_or(Action::Stand, |(action, _)| action)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<ValueTable, Error> {
        let table: ValueTable = bincode::deserialize(bytes)?;
        if table.data.len() != NUMBER_OF_STATES {
            return Err(Error::TableShapeMismatch {
                expected: NUMBER_OF_STATES,
                found: table.data.len(),
            });
        }
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.to_bytes()?)?;
        info!(
            path = %path.display(),
            visited_states = self.visited_states(),
            "saved value table"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<ValueTable, Error> {
        let table = ValueTable::from_bytes(&fs::read(path)?)?;
        info!(
            path = %path.display(),
            visited_states = table.visited_states(),
            "loaded value table"
        );
        Ok(table)
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        ValueTable::new()
    }
}

impl Index<&StateKey> for ValueTable {
    type Output = [f64; Action::COUNT];
    fn index(&self, index: &StateKey) -> &Self::Output {
        &self.data[index.index()]
    }
}

impl IndexMut<&StateKey> for ValueTable {
    fn index_mut(&mut self, index: &StateKey) -> &mut Self::Output {
        &mut self.data[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Card, Suit};

    fn hand_of(face_values: &[u8]) -> Hand {
        let mut hand = Hand::new();
        for &face_value in face_values {
            hand.receive_card(Card {
                face_value,
                suit: Suit::Spade,
            });
        }
        hand
    }

    fn counter_with_true_count(running: &[&str], decks_remaining: f64) -> HiLoCounter {
        let mut counter = HiLoCounter::new();
        for symbol in running {
            counter.observe(symbol);
        }
        counter.recompute(decks_remaining);
        counter
    }

    #[test]
    fn count_bucket_clamps_and_shifts() {
        assert_eq!(count_bucket(0.0, CountBucketing::Floor), 10);
        assert_eq!(count_bucket(2.7, CountBucketing::Floor), 12);
        assert_eq!(count_bucket(-0.5, CountBucketing::Floor), 9);
        assert_eq!(count_bucket(-0.5, CountBucketing::Nearest), 9);
        assert_eq!(count_bucket(-0.4, CountBucketing::Nearest), 10);
        assert_eq!(count_bucket(2.7, CountBucketing::Nearest), 13);
        assert_eq!(count_bucket(37.0, CountBucketing::Floor), 20);
        assert_eq!(count_bucket(-37.0, CountBucketing::Nearest), 0);
    }

    #[test]
    fn encode_uses_hand_count_and_initial_flag() {
        let pair = hand_of(&[1, 1]);
        let counter = counter_with_true_count(&["2", "3", "4"], 1.5);

        let state = StateKey::encode(&pair, 10, &counter, true, CountBucketing::Floor);
        assert_eq!(state.player_total(), 12);
        assert_eq!(state.dealer_up_value(), 10);
        assert!(state.usable_ace());
        assert_eq!(state.count_bucket(), 12);
        assert!(state.can_split());

        let later = StateKey::encode(&pair, 10, &counter, false, CountBucketing::Floor);
        assert!(!later.can_split());
    }

    #[test]
    fn pair_loses_split_flag_after_hit() {
        let mut hand = hand_of(&[1, 1]);
        hand.receive_card(Card {
            face_value: 1,
            suit: Suit::Heart,
        });
        let state = StateKey::encode(&hand, 6, &HiLoCounter::new(), true, CountBucketing::Floor);
        assert!(!state.can_split());
        assert_eq!(state.player_total(), 13);
    }

    #[test]
    #[should_panic]
    fn player_total_above_table_should_panic() {
        StateKey::new(32, 10, false, 10, false);
    }

    #[test]
    #[should_panic]
    fn dealer_up_value_of_one_should_panic() {
        StateKey::new(12, 1, false, 10, false);
    }

    #[test]
    #[should_panic]
    fn count_bucket_past_table_should_panic() {
        StateKey::new(16, 10, false, COUNT_BUCKETS as u8, false);
    }

    #[test]
    fn every_state_has_its_own_slot() {
        let mut seen = vec![false; NUMBER_OF_STATES];
        for player_total in MIN_PLAYER_TOTAL..=MAX_PLAYER_TOTAL {
            for dealer_up_value in 2..=11 {
                for count_bucket in 0..COUNT_BUCKETS as u8 {
                    for usable_ace in [false, true] {
                        for can_split in [false, true] {
                            let state = StateKey::new(
                                player_total,
                                dealer_up_value,
                                usable_ace,
                                count_bucket,
                                can_split,
                            );
                            let index = state.index();
                            assert!(index < NUMBER_OF_STATES);
                            assert!(!seen[index]);
                            seen[index] = true;
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn best_action_breaks_ties_by_lowest_index() {
        let table = ValueTable::new();
        let state = StateKey::new(16, 10, false, 10, true);
        let all = [Action::Stand, Action::Hit, Action::Double, Action::Split];
        assert_eq!(table.best_action(&state, &all), Action::Stand);

        let mut table = table;
        table[&state] = [0.1, 0.5, 0.5, -1.0];
        assert_eq!(table.best_action(&state, &all), Action::Hit);
        assert_eq!(
            table.best_action(&state, &[Action::Double, Action::Hit]),
            Action::Hit
        );
        assert_eq!(
            table.best_action(&state, &[Action::Stand, Action::Split]),
            Action::Stand
        );
        assert_eq!(table.best_value(&state), 0.5);
    }

    #[test]
    fn bytes_keep_learned_values() {
        let mut table = ValueTable::new();
        let state = StateKey::new(20, 11, true, 3, false);
        table[&state][Action::Stand.index()] = 0.75;

        let restored = ValueTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, table);
        assert_eq!(restored.visited_states(), 1);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let short = ValueTable {
            data: vec![[0.0; Action::COUNT]; 10],
        };
        let result = ValueTable::from_bytes(&short.to_bytes().unwrap());
        assert!(matches!(
            result,
            Err(Error::TableShapeMismatch { found: 10, .. })
        ));
        assert!(ValueTable::from_bytes(&[1, 2, 3]).is_err());
    }
}
