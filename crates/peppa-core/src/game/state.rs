use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::passing::{self, PassDirection, PassError};
use crate::model::player::{PASS_SIZE, Player};
use crate::model::round::RoundState;
use crate::model::rules;
use crate::model::score::{self, Settlement};
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError, TrickResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{array, fmt};

pub const DEFAULT_TOTAL_ROUNDS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Dealing,
    Passing,
    Receiving,
    Playing,
    Scoring,
    GameOver,
}

impl GameStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Dealing => "dealing",
            GameStatus::Passing => "passing",
            GameStatus::Receiving => "receiving",
            GameStatus::Playing => "playing",
            GameStatus::Scoring => "scoring",
            GameStatus::GameOver => "gameOver",
        }
    }

    /// Round points count towards standings once the round is settled.
    pub const fn is_settled(self) -> bool {
        matches!(self, GameStatus::Scoring | GameStatus::GameOver)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way the game state can move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Deal(Deck),
    TogglePass { seat: Seat, card: Card },
    SelectPass { seat: Seat, cards: [Card; PASS_SIZE] },
    ExecutePass,
    ConfirmReceipt,
    Play { seat: Seat, card: Card },
    ResolveTrick,
    AdvanceRound,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Deal(_) => "deal",
            Action::TogglePass { .. } => "toggle_pass",
            Action::SelectPass { .. } => "select_pass",
            Action::ExecutePass => "execute_pass",
            Action::ConfirmReceipt => "confirm_receipt",
            Action::Play { .. } => "play",
            Action::ResolveTrick => "resolve_trick",
            Action::AdvanceRound => "advance_round",
        }
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    WrongStatus {
        action: &'static str,
        status: GameStatus,
    },
    OutOfTurn {
        expected: Seat,
        actual: Seat,
    },
    CardNotInHand(Card),
    IllegalPlay(Card),
    TrickIncomplete,
    Trick(TrickError),
    Pass(PassError),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::WrongStatus { action, status } => {
                write!(f, "{action} is not allowed while {status}")
            }
            Rejection::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            Rejection::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            Rejection::IllegalPlay(card) => write!(f, "{card} may not be played now"),
            Rejection::TrickIncomplete => write!(f, "trick does not hold four plays"),
            Rejection::Trick(err) => write!(f, "{err}"),
            Rejection::Pass(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Rejection {}

impl From<TrickError> for Rejection {
    fn from(err: TrickError) -> Self {
        Rejection::Trick(err)
    }
}

impl From<PassError> for Rejection {
    fn from(err: PassError) -> Self {
        Rejection::Pass(err)
    }
}

/// The whole table. Every transition is a pure `&self -> Result<Self, _>`
/// transform; an accepted one returns a copy with `version` bumped, a
/// rejected one leaves the caller holding the untouched original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    version: u64,
    status: GameStatus,
    players: [Player; 4],
    round: RoundState,
    turn: Seat,
    total_rounds: u32,
    dealer_offset: u8,
    winning_message: Option<String>,
    received_cards: Vec<Card>,
    last_trick: Option<TrickResult>,
    last_settlement: Option<Settlement>,
}

impl GameState {
    /// Fresh game waiting for the first deal. `names` are indexed by seat.
    pub fn new(names: [String; 4], total_rounds: u32, dealer_offset: u8) -> Self {
        let dealer_offset = dealer_offset % 4;
        let mut names = names.into_iter();
        let players = array::from_fn(|i| {
            Player::new(Seat::wrapping(i), names.next().unwrap_or_default())
        });
        let round = RoundState::new(1, dealer_offset);
        Self {
            version: 0,
            status: GameStatus::Dealing,
            turn: round.starting_player(),
            players,
            round,
            total_rounds: total_rounds.max(1),
            dealer_offset,
            winning_message: None,
            received_cards: Vec::new(),
            last_trick: None,
            last_settlement: None,
        }
    }

    /// Same as [`GameState::new`] with the dealer offset drawn from `rng`.
    pub fn with_random_dealer<R: Rng + ?Sized>(
        names: [String; 4],
        total_rounds: u32,
        rng: &mut R,
    ) -> Self {
        let offset = rng.gen_range(0..4u8);
        Self::new(names, total_rounds, offset)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Player; 4] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn round_number(&self) -> u32 {
        self.round.round_number()
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn dealer_offset(&self) -> u8 {
        self.dealer_offset
    }

    pub fn pass_direction(&self) -> PassDirection {
        self.round.pass_direction()
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn current_trick(&self) -> &Trick {
        self.round.current_trick()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.round.lead_suit()
    }

    pub fn hearts_broken(&self) -> bool {
        self.round.hearts_broken()
    }

    pub fn winning_message(&self) -> Option<&str> {
        self.winning_message.as_deref()
    }

    pub fn received_cards(&self) -> &[Card] {
        &self.received_cards
    }

    pub fn last_trick(&self) -> Option<TrickResult> {
        self.last_trick
    }

    pub fn last_settlement(&self) -> Option<Settlement> {
        self.last_settlement
    }

    /// True while `seat` is the one expected to add a card to the trick.
    pub fn is_awaiting(&self, seat: Seat) -> bool {
        self.status == GameStatus::Playing
            && self.turn == seat
            && !self.current_trick().is_complete()
            && !self.current_trick().has_played(seat)
    }

    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        rules::legal_plays(
            &self.player(seat).hand,
            self.lead_suit(),
            self.hearts_broken(),
        )
    }

    pub fn is_legal_play(&self, seat: Seat, card: Card) -> bool {
        rules::is_legal_play(
            &self.player(seat).hand,
            card,
            self.lead_suit(),
            self.hearts_broken(),
        )
    }

    /// Score plus, once the round is settled, the round points.
    pub fn effective_scores(&self) -> [i32; 4] {
        let settled = self.status.is_settled();
        array::from_fn(|i| {
            let player = &self.players[i];
            player.score + if settled { player.points_this_round } else { 0 }
        })
    }

    pub fn rank_of(&self, seat: Seat) -> u8 {
        score::rank_of(&self.effective_scores(), seat)
    }

    pub fn final_standings(&self) -> [Seat; 4] {
        let scores = array::from_fn(|i| self.players[i].score);
        score::standings(&scores)
    }

    /// Single authoritative transition function. Plays are checked against
    /// the follow-suit and leading rules before reaching the trick engine.
    pub fn apply(&self, action: Action) -> Result<Self, Rejection> {
        match action {
            Action::Deal(deck) => self.deal(&deck),
            Action::TogglePass { seat, card } => self.toggle_pass_selection(seat, card),
            Action::SelectPass { seat, cards } => self.select_pass(seat, cards),
            Action::ExecutePass => self.execute_pass(),
            Action::ConfirmReceipt => self.confirm_receipt(),
            Action::Play { seat, card } => {
                self.require(GameStatus::Playing, "play")?;
                if !self.player(seat).hand.contains(card) {
                    return Err(Rejection::CardNotInHand(card));
                }
                if !self.is_legal_play(seat, card) {
                    return Err(Rejection::IllegalPlay(card));
                }
                self.play_card(seat, card)
            }
            Action::ResolveTrick => self.resolve_trick(),
            Action::AdvanceRound => self.advance_round(),
        }
    }

    pub fn deal(&self, deck: &Deck) -> Result<Self, Rejection> {
        self.require(GameStatus::Dealing, "deal")?;
        let mut next = self.bumped();
        next.round = RoundState::new(self.round.round_number(), self.dealer_offset);
        for (player, cards) in next.players.iter_mut().zip(deck.hands()) {
            player.reset_for_round(Hand::with_cards(cards.to_vec()));
        }
        next.turn = next.round.starting_player();
        next.winning_message = None;
        next.received_cards.clear();
        next.last_trick = None;
        next.last_settlement = None;
        next.status = GameStatus::Passing;
        Ok(next)
    }

    pub fn toggle_pass_selection(&self, seat: Seat, card: Card) -> Result<Self, Rejection> {
        self.require(GameStatus::Passing, "toggle_pass")?;
        if !self.pass_direction().requires_selection() {
            return Err(PassError::DirectionDoesNotPass.into());
        }
        let mut next = self.bumped();
        passing::toggle_selection(&mut next.players[seat.index()], card)?;
        Ok(next)
    }

    pub fn select_pass(&self, seat: Seat, cards: [Card; PASS_SIZE]) -> Result<Self, Rejection> {
        self.require(GameStatus::Passing, "select_pass")?;
        if !self.pass_direction().requires_selection() {
            return Err(PassError::DirectionDoesNotPass.into());
        }
        let mut next = self.bumped();
        passing::set_selection(&mut next.players[seat.index()], cards)?;
        Ok(next)
    }

    /// Swaps every selection at once, or on a hold round just moves on.
    pub fn execute_pass(&self) -> Result<Self, Rejection> {
        self.require(GameStatus::Passing, "execute_pass")?;
        let mut next = self.bumped();
        if self.pass_direction().requires_selection() {
            let received = passing::execute_pass(&mut next.players, self.pass_direction())?;
            next.received_cards = received[Seat::HUMAN.index()].clone();
        } else {
            for player in next.players.iter_mut() {
                player.selected_to_pass.clear();
            }
            next.received_cards.clear();
        }
        next.turn = next.round.starting_player();
        next.status = GameStatus::Receiving;
        Ok(next)
    }

    pub fn confirm_receipt(&self) -> Result<Self, Rejection> {
        self.require(GameStatus::Receiving, "confirm_receipt")?;
        let mut next = self.bumped();
        next.status = GameStatus::Playing;
        Ok(next)
    }

    /// Raw trick-engine play: checks turn order, double plays and hand
    /// ownership only. Suit rules are the caller's job (see [`GameState::apply`]).
    pub fn play_card(&self, seat: Seat, card: Card) -> Result<Self, Rejection> {
        self.require(GameStatus::Playing, "play")?;
        if self.current_trick().is_complete() {
            return Err(TrickError::TrickComplete.into());
        }
        if self.current_trick().has_played(seat) {
            return Err(TrickError::AlreadyPlayed(seat).into());
        }
        if self.turn != seat {
            return Err(Rejection::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }
        if !self.player(seat).hand.contains(card) {
            return Err(Rejection::CardNotInHand(card));
        }

        let mut next = self.bumped();
        next.round.record_play(seat, card)?;
        next.players[seat.index()].hand.remove(card);
        next.turn = seat.next();
        Ok(next)
    }

    /// Scores a full trick. The final trick of a round settles the round.
    pub fn resolve_trick(&self) -> Result<Self, Rejection> {
        self.require(GameStatus::Playing, "resolve_trick")?;
        let result = self
            .current_trick()
            .result()
            .ok_or(Rejection::TrickIncomplete)?;

        let mut next = self.bumped();
        next.round.take_trick();
        let winner = &mut next.players[result.winner.index()];
        winner.points_this_round += result.points;
        winner.tricks_won += 1;
        next.last_trick = Some(result);

        if next.players.iter().all(|p| p.hand.is_empty()) {
            let settlement = score::settle_round(&mut next.players);
            next.winning_message = settlement.slam.map(|seat| {
                format!(
                    "CAPPOTTO DI {}!",
                    next.players[seat.index()].name.to_uppercase()
                )
            });
            next.last_settlement = Some(settlement);
            next.status = if next.round.round_number() >= next.total_rounds {
                GameStatus::GameOver
            } else {
                GameStatus::Scoring
            };
        } else {
            next.turn = result.winner;
        }
        Ok(next)
    }

    pub fn advance_round(&self) -> Result<Self, Rejection> {
        self.require(GameStatus::Scoring, "advance_round")?;
        let mut next = self.bumped();
        next.round = RoundState::new(self.round.round_number() + 1, self.dealer_offset);
        next.turn = next.round.starting_player();
        next.status = GameStatus::Dealing;
        Ok(next)
    }

    fn require(&self, status: GameStatus, action: &'static str) -> Result<(), Rejection> {
        if self.status == status {
            Ok(())
        } else {
            Err(Rejection::WrongStatus {
                action,
                status: self.status,
            })
        }
    }

    fn bumped(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }
}
