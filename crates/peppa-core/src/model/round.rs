use crate::model::card::Card;
use crate::model::passing::PassDirection;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};

/// Round-scoped table state. Hands and scores live on the players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    round_number: u32,
    pass_direction: PassDirection,
    dealer: Seat,
    starting_player: Seat,
    hearts_broken: bool,
    current_trick: Trick,
    tricks_completed: u8,
}

impl RoundState {
    /// Dealer and first leader rotate with the round number, shifted by the
    /// per-game `dealer_offset`.
    pub fn new(round_number: u32, dealer_offset: u8) -> Self {
        let round_number = round_number.max(1);
        let offset = dealer_offset as usize;
        let round = round_number as usize;
        Self {
            round_number,
            pass_direction: PassDirection::for_round(round_number),
            dealer: Seat::wrapping(round - 1 + offset),
            starting_player: Seat::wrapping(round + offset),
            hearts_broken: false,
            current_trick: Trick::new(),
            tricks_completed: 0,
        }
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn pass_direction(&self) -> PassDirection {
        self.pass_direction
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn starting_player(&self) -> Seat {
        self.starting_player
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.current_trick.lead_suit()
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn tricks_completed(&self) -> u8 {
        self.tricks_completed
    }

    /// Appends a play to the current trick; hearts break permanently for the round.
    pub(crate) fn record_play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        self.current_trick.play(seat, card)?;
        if card.suit.is_heart() {
            self.hearts_broken = true;
        }
        Ok(())
    }

    pub(crate) fn take_trick(&mut self) -> Trick {
        self.tricks_completed += 1;
        std::mem::take(&mut self.current_trick)
    }
}
