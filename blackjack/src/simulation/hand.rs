use super::Card;

/// A player's or dealer's cards with the best total that does not bust, as far as
/// the soft aces allow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
    value: u16,
    /// Aces currently counted as 11.
    soft_aces: u8,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
            value: 0,
            soft_aces: 0,
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
        self.value += card.blackjack_value() as u16;
        if card.is_ace() {
            self.soft_aces += 1;
        }
        self.harden_aces();
    }

    /// Recounts soft aces as 1 until the total is 21 or less.
    fn harden_aces(&mut self) {
        while self.value > 21 && self.soft_aces > 0 {
            self.value -= 10;
            self.soft_aces -= 1;
        }
    }

    /// Drops every card but the first, as after a split where only one half is played.
    pub fn keep_first_card(&mut self) {
        let first = self.cards.first().copied();
        self.clear();
        if let Some(card) = first {
            self.receive_card(card);
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.value = 0;
        self.soft_aces = 0;
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn soft_aces(&self) -> u8 {
        self.soft_aces
    }

    pub fn has_usable_ace(&self) -> bool {
        self.soft_aces > 0
    }

    /// Exactly two cards of the same rank. 10 and K are not a pair.
    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].face_value == self.cards[1].face_value
    }

    pub fn is_bust(&self) -> bool {
        self.value > 21
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use crate::simulation::Suit;

    use super::*;

    fn card(face_value: u8) -> Card {
        Card {
            face_value,
            suit: Suit::Heart,
        }
    }

    #[test]
    fn ace_is_reinterpreted_to_avoid_bust() {
        let mut hand = Hand::new();
        hand.receive_card(card(1));
        hand.receive_card(card(7));
        assert_eq!(hand.value(), 18);
        assert!(hand.has_usable_ace());

        hand.receive_card(card(5));
        assert_eq!(hand.value(), 13);
        assert_eq!(hand.soft_aces(), 0);
    }

    #[test]
    fn pair_of_aces_is_twelve() {
        let mut hand = Hand::new();
        hand.receive_card(card(1));
        hand.receive_card(card(1));
        assert_eq!(hand.value(), 12);
        assert_eq!(hand.soft_aces(), 1);
        assert!(hand.can_split());
    }

    #[test]
    fn value_stays_at_most_21_while_soft_aces_remain() {
        let sequences: [&[u8]; 4] = [
            &[1, 1, 1, 1, 1, 1],
            &[1, 13, 1, 9],
            &[6, 1, 1, 10, 5],
            &[1, 5, 1, 4, 1, 12],
        ];
        for sequence in sequences {
            let mut hand = Hand::new();
            for &face_value in sequence {
                hand.receive_card(card(face_value));
                assert!(hand.value() <= 21 || hand.soft_aces() == 0);
            }
        }
    }

    #[test]
    fn bust_without_soft_aces() {
        let mut hand = Hand::new();
        for face_value in [10, 6, 1, 9] {
            hand.receive_card(card(face_value));
        }
        assert_eq!(hand.value(), 26);
        assert!(hand.is_bust());
    }

    #[test]
    fn split_eligibility_needs_exactly_two_equal_ranks() {
        let mut hand = Hand::new();
        hand.receive_card(card(1));
        assert!(!hand.can_split());
        hand.receive_card(card(1));
        assert!(hand.can_split());
        hand.receive_card(card(1));
        assert!(!hand.can_split());

        let mut hand = Hand::new();
        hand.receive_card(card(10));
        hand.receive_card(card(13));
        assert!(!hand.can_split());
    }

    #[test]
    fn keep_first_card_recomputes_from_the_remaining_card() {
        let mut hand = Hand::new();
        hand.receive_card(card(1));
        hand.receive_card(card(1));
        hand.keep_first_card();
        assert_eq!(hand.cards().len(), 1);
        assert_eq!(hand.value(), 11);
        assert_eq!(hand.soft_aces(), 1);

        hand.receive_card(card(9));
        assert_eq!(hand.value(), 20);
    }
}
