use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            cards: shuffled(&Self::standard().cards, rng),
        }
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffled_from_thread_rng() -> Self {
        Self::shuffled(&mut rand::thread_rng())
    }

    /// Wraps an arbitrary card order. Returns `None` unless the cards are
    /// exactly the 52 distinct cards of a standard deck.
    pub fn from_cards(cards: Vec<Card>) -> Option<Self> {
        if cards.len() != DECK_SIZE {
            return None;
        }
        let distinct: HashSet<_> = cards.iter().map(|card| card.id()).collect();
        if distinct.len() != DECK_SIZE {
            return None;
        }
        Some(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consecutive 13-card slices, one per seat.
    pub fn hands(&self) -> impl Iterator<Item = &[Card]> {
        self.cards.chunks(DECK_SIZE / 4)
    }
}

/// Fisher–Yates permutation of `items` into a fresh vector; the input is left untouched.
pub fn shuffled<T: Clone, R: rand::Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck, shuffled};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), DECK_SIZE);
        let ids: HashSet<_> = deck.cards().iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn values_are_rank_derived() {
        let deck = Deck::standard();
        let total: u32 = deck.cards().iter().map(|c| c.value() as u32).sum();
        assert_eq!(total, 4 * (2..=14).sum::<u32>());
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffled_leaves_input_untouched() {
        let original: Vec<u32> = (0..20).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let permuted = shuffled(&original, &mut rng);
        assert_eq!(original, (0..20).collect::<Vec<u32>>());
        let mut sorted = permuted.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn from_cards_rejects_duplicates_and_short_decks() {
        let mut cards = Deck::standard().cards().to_vec();
        assert!(Deck::from_cards(cards.clone()).is_some());
        cards[0] = Card::new(Rank::Three, Suit::Clubs);
        assert!(Deck::from_cards(cards.clone()).is_none());
        cards.pop();
        assert!(Deck::from_cards(cards).is_none());
    }

    #[test]
    fn hands_split_into_four_thirteens() {
        let deck = Deck::shuffled_with_seed(3);
        let sizes: Vec<usize> = deck.hands().map(|h| h.len()).collect();
        assert_eq!(sizes, vec![13, 13, 13, 13]);
    }
}
