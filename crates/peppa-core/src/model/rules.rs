//! Play legality. The trick engine itself only checks turn order and hand
//! ownership; these rules are enforced at the intent boundary before a card
//! reaches it.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;

/// Cards `hand` may legally play into a trick led with `lead_suit`
/// (`None` when leading). Never empty for a non-empty hand.
pub fn legal_plays(hand: &Hand, lead_suit: Option<Suit>, hearts_broken: bool) -> Vec<Card> {
    match lead_suit {
        Some(suit) if hand.has_suit(suit) => hand
            .iter()
            .copied()
            .filter(|card| card.suit == suit)
            .collect(),
        Some(_) => hand.cards().to_vec(),
        None if !hearts_broken && !hand.only_hearts() => hand
            .iter()
            .copied()
            .filter(|card| !card.suit.is_heart())
            .collect(),
        None => hand.cards().to_vec(),
    }
}

pub fn is_legal_play(
    hand: &Hand,
    card: Card,
    lead_suit: Option<Suit>,
    hearts_broken: bool,
) -> bool {
    if !hand.contains(card) {
        return false;
    }
    match lead_suit {
        Some(suit) => card.suit == suit || !hand.has_suit(suit),
        None => !card.suit.is_heart() || hearts_broken || hand.only_hearts(),
    }
}
