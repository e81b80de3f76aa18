use crate::Error;

use super::{counter::HiLoCounter, Card, Suit};

use strum::IntoEnumIterator;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

pub const CARDS_PER_DECK: usize = 52;

/// Represents a shoe in the real world. Cards are dealt from the back of `cards`.
/// The counter sees every dealt card and is reset whenever the shoe is rebuilt.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    penetration: f64,
    cards: Vec<Card>,
    counter: HiLoCounter,
    rng: StdRng,
}

impl Shoe {
    /// Creates a new shuffled shoe. The seed makes the shuffles reproducible.
    pub fn new(number_of_decks: u8, penetration: f64, seed: u64) -> Result<Shoe, Error> {
        if number_of_decks == 0 {
            return Err(Error::NoDecks);
        }
        if !(penetration > 0.0 && penetration < 1.0) {
            return Err(Error::InvalidPenetration(penetration));
        }

        let mut shoe = Shoe {
            number_of_decks,
            penetration,
            cards: Vec::with_capacity(number_of_decks as usize * CARDS_PER_DECK),
            counter: HiLoCounter::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        shoe.rebuild();
        Ok(shoe)
    }

    /// Puts every card back, shuffles, and resets the count.
    pub fn rebuild(&mut self) {
        self.cards.clear();
        for _ in 0..self.number_of_decks {
            for suit in Suit::iter() {
                for face_value in 1..=13 {
                    self.cards.push(Card { face_value, suit });
                }
            }
        }
        self.cards.shuffle(&mut self.rng);
        self.counter.reset();
        debug!(number_of_decks = self.number_of_decks, "rebuilt shoe");
    }

    /// Deals a card, rebuilding the shoe first if the penetration point was passed.
    /// The counter is updated with the dealt card.
    pub fn deal_card(&mut self) -> Card {
        loop {
            if !self.below_reshuffle_threshold() {
                if let Some(card) = self.cards.pop() {
                    self.counter.observe_card(&card);
                    self.counter.recompute(self.decks_remaining());
                    return card;
                }
            }
            self.rebuild();
        }
    }

    /// Rebuilds the shoe and moves cards of the given face values (1 to 13) so they
    /// are dealt next, in order. The rest stays shuffled.
    pub fn arrange_next_cards(&mut self, face_values: &[u8]) -> Result<(), Error> {
        self.rebuild();
        for (k, &face_value) in face_values.iter().enumerate() {
            let target = self
                .cards
                .len()
                .checked_sub(k + 1)
                .ok_or(Error::CardUnavailable(face_value))?;
            let found = self.cards[..=target]
                .iter()
                .position(|card| card.face_value == face_value)
                .ok_or(Error::CardUnavailable(face_value))?;
            self.cards.swap(found, target);
        }
        Ok(())
    }

    /// Counts a card seen outside this shoe's own deals, e.g. a hole card reported by
    /// hand, and refreshes the true count from the cards still in the shoe.
    pub fn observe_reported_card(&mut self, rank_symbol: &str) {
        self.counter.observe(rank_symbol);
        self.counter.recompute(self.decks_remaining());
    }

    /// Below this many remaining cards the next deal rebuilds the shoe.
    pub fn reshuffle_threshold(&self) -> f64 {
        (self.number_of_decks as usize * CARDS_PER_DECK) as f64 * (1.0 - self.penetration)
    }

    pub fn below_reshuffle_threshold(&self) -> bool {
        (self.cards.len() as f64) < self.reshuffle_threshold()
    }

    pub fn decks_remaining(&self) -> f64 {
        self.cards.len() as f64 / CARDS_PER_DECK as f64
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    pub fn counter(&self) -> &HiLoCounter {
        &self.counter
    }
}
