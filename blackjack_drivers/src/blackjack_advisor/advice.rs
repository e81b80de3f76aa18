use anyhow::bail;
use blackjack::simulation::{hand::Hand, shoe::Shoe, Card, Suit};
use blackjack::strategy::recommend;
use blackjack::{Action, Rule, ValueTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advice {
    pub action: Action,
    pub running_count: i32,
    pub true_count: f64,
}

/// Counts every visible card against a freshly shuffled shoe, then recommends an
/// action for the hero's hand. Unknown symbols among `seen` are not counted.
pub fn advise(
    rule: &Rule,
    table: &ValueTable,
    hand: &[String],
    dealer: &str,
    seen: &[String],
    is_initial_hand: bool,
) -> anyhow::Result<Advice> {
    if hand.len() < 2 {
        bail!("a hand needs at least two cards, got {}", hand.len());
    }

    let mut hero = Hand::new();
    for symbol in hand {
        hero.receive_card(Card::from_symbol(symbol, Suit::Heart)?);
    }
    if hero.is_bust() {
        bail!("the hand is already bust at {}", hero.value());
    }
    let dealer_card = Card::from_symbol(dealer, Suit::Spade)?;

    let mut shoe = Shoe::new(rule.number_of_decks, rule.penetration, 0)?;
    let visible = hand
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(dealer))
        .chain(seen.iter().map(String::as_str));
    for symbol in visible {
        shoe.observe_reported_card(symbol);
    }

    let counter = shoe.counter();
    let action = recommend(
        rule,
        table,
        &hero,
        dealer_card.blackjack_value(),
        counter,
        is_initial_hand,
    );
    Ok(Advice {
        action,
        running_count: counter.running_count(),
        true_count: counter.true_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::simulation::counter::HiLoCounter;
    use blackjack::{CountBucketing, StateKey};

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn untrained_table_recommends_stand() {
        let rule = Rule::default();
        let table = ValueTable::new();
        let advice = advise(&rule, &table, &symbols(&["8", "8"]), "10", &[], true).unwrap();
        assert_eq!(advice.action, Action::Stand);
        assert_eq!(advice.running_count, -1);
    }

    #[test]
    fn seen_cards_move_the_count() {
        let rule = Rule {
            number_of_decks: 1,
            ..Default::default()
        };
        let table = ValueTable::new();
        let advice = advise(
            &rule,
            &table,
            &symbols(&["2", "3"]),
            "4",
            &symbols(&["5", "6", "??"]),
            true,
        )
        .unwrap();
        assert_eq!(advice.running_count, 5);
        assert_eq!(advice.true_count, 5.0);
    }

    #[test]
    fn trained_values_drive_the_recommendation() {
        let rule = Rule::default();
        let mut counter = HiLoCounter::new();
        for symbol in ["A", "7", "9"] {
            counter.observe(symbol);
        }
        counter.recompute(6.0);
        let mut hero = Hand::new();
        for symbol in ["A", "7"] {
            hero.receive_card(Card::from_symbol(symbol, Suit::Heart).unwrap());
        }
        let state = StateKey::encode(&hero, 9, &counter, true, CountBucketing::Floor);

        let mut table = ValueTable::new();
        table[&state] = [-0.3, 0.2, -0.1, 0.0];
        let advice = advise(&rule, &table, &symbols(&["A", "7"]), "9", &[], true).unwrap();
        assert_eq!(advice.action, Action::Hit);
    }

    #[test]
    fn bad_input_is_rejected() {
        let rule = Rule::default();
        let table = ValueTable::new();
        assert!(advise(&rule, &table, &symbols(&["A"]), "9", &[], true).is_err());
        assert!(advise(&rule, &table, &symbols(&["A", "X"]), "9", &[], true).is_err());
        assert!(advise(&rule, &table, &symbols(&["A", "7"]), "1", &[], true).is_err());
        assert!(advise(&rule, &table, &symbols(&["K", "Q", "5"]), "9", &[], false).is_err());
    }
}
