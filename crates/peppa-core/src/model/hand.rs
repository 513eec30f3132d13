use crate::model::card::{Card, CardId};
use crate::model::suit::Suit;
use std::vec::Vec;

/// Cards held by one seat, kept sorted by suit then value for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn find(&self, id: CardId) -> Option<Card> {
        self.cards.iter().copied().find(|card| card.id() == id)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    pub fn only_hearts(&self) -> bool {
        self.cards.iter().all(|card| card.suit.is_heart())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Three, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_suit_then_rank() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::Two, Suit::Clubs),
        ]);
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(
            ordered,
            vec![
                Card::new(Rank::Two, Suit::Clubs),
                Card::new(Rank::Ace, Suit::Clubs),
                Card::new(Rank::King, Suit::Spades),
                Card::new(Rank::Two, Suit::Hearts),
            ]
        );
    }

    #[test]
    fn find_by_id_and_suit_queries() {
        let queen = Card::new(Rank::Queen, Suit::Spades);
        let hand = Hand::with_cards(vec![queen, Card::new(Rank::Four, Suit::Hearts)]);
        assert_eq!(hand.find(queen.id()), Some(queen));
        assert_eq!(hand.find(Card::new(Rank::Ace, Suit::Spades).id()), None);
        assert!(hand.has_suit(Suit::Hearts));
        assert!(!hand.has_suit(Suit::Clubs));
        assert!(!hand.only_hearts());
    }
}
