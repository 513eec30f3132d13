//! Boundary to an external move-selection service. The service is optional
//! and untrusted: every call is bounded in time, every proposal is checked
//! against the current hand, and anything unusable falls back to the local
//! heuristic.

mod command;
mod wire;

pub use command::CommandAdvisor;
pub use wire::{MoveRequest, MoveResponse, PassRequest, PassResponse};

use async_trait::async_trait;
use peppa_core::game::GameState;
use peppa_core::model::card::{Card, CardId};
use peppa_core::model::hand::Hand;
use peppa_core::model::player::PASS_SIZE;
use peppa_core::model::seat::Seat;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Card ids (`"Q-spades"`) to pass.
    async fn propose_pass(&self, request: PassRequest) -> Result<Vec<String>, AdvisoryError>;

    /// Card id to play.
    async fn propose_move(&self, request: MoveRequest) -> Result<String, AdvisoryError>;
}

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("no command configured")]
    NoCommand,
    #[error("failed to spawn process: {0}")]
    Spawn(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("process failed: {0}")]
    Status(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Outcome of one bounded advisory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Proposal(T),
    Timeout,
    Failure(String),
}

impl<T> Attempt<T> {
    pub fn proposal(self) -> Option<T> {
        match self {
            Attempt::Proposal(value) => Some(value),
            Attempt::Timeout | Attempt::Failure(_) => None,
        }
    }

    pub fn is_proposal(&self) -> bool {
        matches!(self, Attempt::Proposal(_))
    }

    /// Keeps a proposal only if `check` accepts it; a rejected proposal
    /// becomes a failure.
    pub fn validate<U>(self, check: impl FnOnce(T) -> Option<U>) -> Attempt<U> {
        match self {
            Attempt::Proposal(value) => match check(value) {
                Some(valid) => Attempt::Proposal(valid),
                None => Attempt::Failure("proposal rejected by validation".to_string()),
            },
            Attempt::Timeout => Attempt::Timeout,
            Attempt::Failure(reason) => Attempt::Failure(reason),
        }
    }

    pub fn or_else_fallback(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Attempt::Proposal(value) => value,
            Attempt::Timeout | Attempt::Failure(_) => fallback(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Attempt::Proposal(_) => "proposal",
            Attempt::Timeout => "timeout",
            Attempt::Failure(_) => "failure",
        }
    }
}

/// Runs `call` for at most `budget`.
pub async fn attempt<T, F>(budget: Duration, call: F) -> Attempt<T>
where
    F: Future<Output = Result<T, AdvisoryError>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(Ok(value)) => Attempt::Proposal(value),
        Ok(Err(err)) => Attempt::Failure(err.to_string()),
        Err(_) => Attempt::Timeout,
    }
}

/// Exactly three distinct ids, each naming a card in `hand`.
pub fn validate_pass(hand: &Hand, ids: &[String]) -> Option<[Card; PASS_SIZE]> {
    let cards = ids
        .iter()
        .map(|id| id.parse::<CardId>().ok().and_then(|id| hand.find(id)))
        .collect::<Option<Vec<_>>>()?;
    match cards.as_slice() {
        [a, b, c] if a != b && a != c && b != c => Some([*a, *b, *c]),
        _ => None,
    }
}

/// A card in the seat's hand that is legal to play right now.
pub fn validate_move(state: &GameState, seat: Seat, id: &str) -> Option<Card> {
    let card = state.player(seat).hand.find(id.parse::<CardId>().ok()?)?;
    state.is_legal_play(seat, card).then_some(card)
}
