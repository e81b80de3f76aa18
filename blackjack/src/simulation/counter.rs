use super::{parse_face_value, Card};

/// Hi-Lo card counter. The true count is the running count per deck remaining and
/// is only refreshed by `recompute`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HiLoCounter {
    running_count: i32,
    true_count: f64,
}

impl HiLoCounter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn observe_card(&mut self, card: &Card) {
        self.running_count += hi_lo_weight(card.face_value);
    }

    /// Observes a card reported by its rank symbol alone. Unknown symbols are neutral.
    pub fn observe(&mut self, rank_symbol: &str) {
        if let Some(face_value) = parse_face_value(rank_symbol) {
            self.running_count += hi_lo_weight(face_value);
        }
    }

    /// No decks remaining gives a true count of 0.
    pub fn recompute(&mut self, decks_remaining: f64) {
        self.true_count = if decks_remaining > 0.0 {
            self.running_count as f64 / decks_remaining
        } else {
            0.0
        };
    }

    pub fn reset(&mut self) {
        *self = Default::default();
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn true_count(&self) -> f64 {
        self.true_count
    }
}

fn hi_lo_weight(face_value: u8) -> i32 {
    match face_value {
        2..=6 => 1,
        1 | 10..=13 => -1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_and_high_cards_cancel_out() {
        let mut counter = HiLoCounter::new();
        for symbol in ["2", "3", "4", "5", "6"] {
            counter.observe(symbol);
        }
        assert_eq!(counter.running_count(), 5);
        for symbol in ["10", "J", "Q", "K", "A"] {
            counter.observe(symbol);
        }
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn middle_cards_are_neutral() {
        let mut counter = HiLoCounter::new();
        for symbol in ["7", "8", "9"] {
            counter.observe(symbol);
        }
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn unknown_symbols_are_neutral() {
        let mut counter = HiLoCounter::new();
        counter.observe("X");
        counter.observe("");
        counter.observe("0");
        assert_eq!(counter.running_count(), 0);
        counter.observe("t");
        assert_eq!(counter.running_count(), -1);
    }

    #[test]
    fn true_count_divides_by_decks_remaining() {
        let mut counter = HiLoCounter::new();
        for face_value in [2, 3, 4, 5] {
            counter.observe_card(&Card {
                face_value,
                suit: crate::simulation::Suit::Club,
            });
        }
        counter.recompute(2.0);
        assert_eq!(counter.true_count(), 2.0);

        counter.recompute(0.0);
        assert_eq!(counter.true_count(), 0.0);

        counter.reset();
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.true_count(), 0.0);
    }
}
