use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;

pub const PASS_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub hand: Hand,
    /// Cumulative across rounds.
    pub score: i32,
    pub points_this_round: i32,
    pub tricks_won: u8,
    pub selected_to_pass: Vec<Card>,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
            hand: Hand::new(),
            score: 0,
            points_this_round: 0,
            tricks_won: 0,
            selected_to_pass: Vec::with_capacity(PASS_SIZE),
        }
    }

    pub fn is_human(&self) -> bool {
        self.seat.is_human()
    }

    pub fn reset_for_round(&mut self, hand: Hand) {
        self.hand = hand;
        self.points_this_round = 0;
        self.tricks_won = 0;
        self.selected_to_pass.clear();
    }

    pub fn is_selected(&self, card: Card) -> bool {
        self.selected_to_pass.contains(&card)
    }

    /// A pass selection is ready once it names three distinct cards still in hand.
    pub fn pass_ready(&self) -> bool {
        self.selected_to_pass.len() == PASS_SIZE
            && self.selected_to_pass.iter().all(|c| self.hand.contains(*c))
            && !has_duplicates(&self.selected_to_pass)
    }
}

pub(crate) fn has_duplicates(cards: &[Card]) -> bool {
    cards
        .iter()
        .enumerate()
        .any(|(i, card)| cards[i + 1..].contains(card))
}
