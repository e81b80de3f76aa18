pub mod counter;
pub mod hand;
pub mod shoe;

use crate::{strategy::Strategy, Action, Error, Rule, StateKey, ValueTable};
use blackjack_macros::allowed_phase;
use strum_macros::EnumIter;

use self::{hand::Hand, shoe::Shoe};

static FACE_VALUE_TO_BLACKJACK_VALUE: [u8; 13] = [11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];
static FACE_VALUE_TO_SYMBOL: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];
const DEALER_STAND_VALUE: u16 = 17;

#[derive(Debug, Clone, Copy, PartialEq, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

/// Represents a card in the real world with a suit and a face value.
/// Face values run from 1 (Ace) to 13 (King). The suit never affects play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Card {
    pub face_value: u8,
    pub suit: Suit,
}

impl Card {
    /// Ace counts 11 here; a hand revalues it to 1 when needed.
    pub fn blackjack_value(&self) -> u8 {
        FACE_VALUE_TO_BLACKJACK_VALUE[(self.face_value - 1) as usize]
    }

    pub fn is_ace(&self) -> bool {
        self.face_value == 1
    }

    pub fn symbol(&self) -> &'static str {
        FACE_VALUE_TO_SYMBOL[(self.face_value - 1) as usize]
    }

    pub fn from_symbol(symbol: &str, suit: Suit) -> Result<Card, Error> {
        let face_value =
            parse_face_value(symbol).ok_or_else(|| Error::UnknownCard(symbol.to_string()))?;
        Ok(Card { face_value, suit })
    }
}

/// Maps a rank symbol (A, 2..10, T, J, Q, K, any case) to its face value.
pub fn parse_face_value(symbol: &str) -> Option<u8> {
    let symbol = symbol.trim();
    if symbol.eq_ignore_ascii_case("T") {
        return Some(10);
    }
    FACE_VALUE_TO_SYMBOL
        .iter()
        .position(|s| s.eq_ignore_ascii_case(symbol))
        .map(|i| i as u8 + 1)
}

impl Default for Card {
    fn default() -> Self {
        Card {
            face_value: 1,
            suit: Suit::Diamond,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suit = match self.suit {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        };
        write!(f, "{}{}", self.symbol(), suit)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.suit as u8 * 13 + card.face_value - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    DealInitialCards,
    PlayerTurn,
    DealerTurn,
    Summary,
    RoundOver,
}

/// The state and action the round's value update is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: StateKey,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    /// The last decision taken, or the initial state with Stand if the round
    /// started with 21.
    pub decision: Decision,
    /// -1 lose, 0 push, +1 win; doubled when the last decision was Double.
    pub reward: i8,
    /// The player's final hand, encoded as a non-initial hand.
    pub next_state: StateKey,
    pub player_value: u16,
    pub dealer_value: u16,
    pub number_of_splits: u8,
}

/// Plays single-player rounds against a dealer who hits below 17. The simulator
/// sees every card, including the dealer's hole card.
///
/// A split keeps only the first card of the pair and plays on with it as a new
/// initial hand; the other half is never played.
pub struct Simulator {
    rule: Rule,
    current_game_phase: GamePhase,
    shoe: Shoe,
    player_hand: Hand,
    dealer_hand: Hand,
    is_initial_hand: bool,
    current_splits: u8,
    /// Set once the initial cards are dealt.
    decision: Option<Decision>,
}

impl Simulator {
    pub fn new(rule: &Rule, seed: u64) -> Result<Self, Error> {
        let shoe = Shoe::new(rule.number_of_decks, rule.penetration, seed)?;
        Ok(Self::with_shoe(rule, shoe))
    }

    pub fn with_shoe(rule: &Rule, shoe: Shoe) -> Self {
        Self {
            rule: *rule,
            current_game_phase: GamePhase::DealInitialCards,
            shoe,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            is_initial_hand: true,
            current_splits: 0,
            decision: None,
        }
    }

    /// Plays a whole round with the given strategy and returns its outcome.
    /// Can be called at DealInitialCards phase.
    #[allowed_phase(DealInitialCards)]
    pub fn simulate_round<T: Strategy, U: SimulatorEventHandler>(
        &mut self,
        table: &ValueTable,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<RoundOutcome, Error> {
        handler.on_round_begin(&self.shoe);

        self.deal_initial_cards()?;
        handler.on_deal_cards(&self.player_hand, &self.dealer_hand);

        self.play_player_turn(table, strategy, handler)?;
        self.dealer_plays()?;

        let outcome = self.summary()?;
        handler.on_summary_round(&self.player_hand, &self.dealer_hand, &outcome);
        Ok(outcome)
    }

    /// Can be called at DealInitialCards phase.
    /// Deals player, dealer, player, dealer.
    #[allowed_phase(DealInitialCards)]
    pub fn deal_initial_cards(&mut self) -> Result<(), Error> {
        for _ in 0..2 {
            let card = self.shoe.deal_card();
            self.player_hand.receive_card(card);
            let card = self.shoe.deal_card();
            self.dealer_hand.receive_card(card);
        }

        self.is_initial_hand = true;
        // A starting 21 skips the player's turn, so it is settled as a stand.
        self.decision = Some(Decision {
            state: self.encode_player_state(true),
            action: Action::Stand,
        });
        self.current_game_phase = GamePhase::PlayerTurn;
        Ok(())
    }

    /// Can be called at PlayerTurn phase.
    /// Asks the strategy for decisions until the player stands, doubles or reaches 21.
    #[allowed_phase(PlayerTurn)]
    pub fn play_player_turn<T: Strategy, U: SimulatorEventHandler>(
        &mut self,
        table: &ValueTable,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<(), Error> {
        while self.player_hand.value() < 21 {
            let state = self.encode_player_state(self.is_initial_hand);
            let valid_actions =
                Action::valid_for(&self.player_hand, self.is_initial_hand, self.splits_left());
            let action = strategy.make_decision(table, &state, &valid_actions);
            let decision = Decision { state, action };
            self.decision = Some(decision);
            handler.on_make_decision(&decision);

            match action {
                Action::Stand => break,
                Action::Hit => {
                    self.hit_player();
                    self.is_initial_hand = false;
                }
                Action::Double => {
                    self.hit_player();
                    break;
                }
                Action::Split => {
                    self.player_hand.keep_first_card();
                    self.hit_player();
                    self.current_splits += 1;
                    self.is_initial_hand = true;
                    handler.on_split(&self.player_hand);
                }
            }
        }

        if self.player_hand.is_bust() {
            handler.on_player_bust();
        }
        self.current_game_phase = GamePhase::DealerTurn;
        Ok(())
    }

    /// Can be called at DealerTurn phase.
    /// The dealer hits below 17 even when the player already busted.
    #[allowed_phase(DealerTurn)]
    pub fn dealer_plays(&mut self) -> Result<(), Error> {
        while self.dealer_hand.value() < DEALER_STAND_VALUE {
            let card = self.shoe.deal_card();
            self.dealer_hand.receive_card(card);
        }
        self.current_game_phase = GamePhase::Summary;
        Ok(())
    }

    /// Can be called at Summary phase.
    #[allowed_phase(Summary)]
    pub fn summary(&mut self) -> Result<RoundOutcome, Error> {
        let Some(decision) = self.decision else {
            unreachable!("the initial cards always record a decision");
        };
        let outcome = RoundOutcome {
            decision,
            reward: settle(&self.player_hand, &self.dealer_hand, decision.action),
            next_state: self.encode_player_state(false),
            player_value: self.player_hand.value(),
            dealer_value: self.dealer_hand.value(),
            number_of_splits: self.current_splits,
        };
        self.current_game_phase = GamePhase::RoundOver;
        Ok(outcome)
    }

    /// Can be called at RoundOver phase.
    /// Clears both hands. With `fresh_shoe` the shoe is rebuilt as well, otherwise it
    /// carries over and only reshuffles at the penetration point.
    #[allowed_phase(RoundOver)]
    pub fn start_new_round(&mut self, fresh_shoe: bool) -> Result<(), Error> {
        if fresh_shoe {
            self.shoe.rebuild();
        }
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.is_initial_hand = true;
        self.current_splits = 0;
        self.decision = None;
        self.current_game_phase = GamePhase::DealInitialCards;
        Ok(())
    }

    pub fn current_game_phase(&self) -> GamePhase {
        self.current_game_phase
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn is_initial_hand(&self) -> bool {
        self.is_initial_hand
    }

    fn splits_left(&self) -> u8 {
        self.rule.max_splits.saturating_sub(self.current_splits)
    }

    fn hit_player(&mut self) {
        let card = self.shoe.deal_card();
        self.player_hand.receive_card(card);
    }

    fn dealer_up_value(&self) -> u8 {
        self.dealer_hand.cards()[0].blackjack_value()
    }

    fn encode_player_state(&self, is_initial_hand: bool) -> StateKey {
        StateKey::encode(
            &self.player_hand,
            self.dealer_up_value(),
            self.shoe.counter(),
            is_initial_hand,
            self.rule.count_bucketing,
        )
    }
}

/// Returns the player's reward. A player bust loses even if the dealer busts too.
pub fn settle(player_hand: &Hand, dealer_hand: &Hand, last_action: Action) -> i8 {
    let reward = if player_hand.is_bust() {
        -1
    } else if dealer_hand.is_bust() || player_hand.value() > dealer_hand.value() {
        1
    } else if player_hand.value() < dealer_hand.value() {
        -1
    } else {
        0
    };

    if last_action == Action::Double {
        reward * 2
    } else {
        reward
    }
}

/// Observes a round as it is played. Every method defaults to doing nothing.
pub trait SimulatorEventHandler {
    fn on_round_begin(&mut self, _shoe: &Shoe) {}
    fn on_deal_cards(&mut self, _player_hand: &Hand, _dealer_hand: &Hand) {}
    fn on_make_decision(&mut self, _decision: &Decision) {}
    fn on_split(&mut self, _player_hand: &Hand) {}
    fn on_player_bust(&mut self) {}
    fn on_summary_round(
        &mut self,
        _player_hand: &Hand,
        _dealer_hand: &Hand,
        _outcome: &RoundOutcome,
    ) {
    }
}

impl SimulatorEventHandler for () {}
