use crate::model::card::Card;
use crate::model::score::TRICK_BASELINE;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trick {
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    AlreadyPlayed(Seat),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::AlreadyPlayed(seat) => {
                write!(f, "{seat} has already played this trick")
            }
        }
    }
}

impl std::error::Error for TrickError {}

/// Outcome of a resolved trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickResult {
    pub winner: Seat,
    pub points: i32,
}

impl Trick {
    pub fn new() -> Self {
        Self {
            plays: Vec::with_capacity(4),
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn leader(&self) -> Option<Seat> {
        self.plays.first().map(|play| play.seat)
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn has_played(&self, seat: Seat) -> bool {
        self.plays.iter().any(|play| play.seat == seat)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.has_played(seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Highest card of the led suit; off-suit cards never win.
    pub fn winner(&self) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        let lead_suit = self.lead_suit()?;
        self.plays
            .iter()
            .filter(|play| play.card.suit == lead_suit)
            .max_by_key(|play| play.card.value())
            .map(|play| play.seat)
    }

    /// Baseline minus every penalty card on the table. Meaningful for a
    /// partial trick too (the live trick value shown while playing).
    pub fn points(&self) -> i32 {
        TRICK_BASELINE
            - self
                .plays
                .iter()
                .map(|play| play.card.penalty())
                .sum::<i32>()
    }

    pub fn result(&self) -> Option<TrickResult> {
        self.winner().map(|winner| TrickResult {
            winner,
            points: self.points(),
        })
    }
}
