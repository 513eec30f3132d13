use std::sync::Arc;
use std::time::Duration;

use peppa_bot::{HeuristicPolicy, Policy, PolicyContext, table_names};
use peppa_core::game::{Action, GameSnapshot, GameState, GameStatus, Rejection};
use peppa_core::model::card::{Card, CardId};
use peppa_core::model::deck::Deck;
use peppa_core::model::passing::PassError;
use peppa_core::model::player::PASS_SIZE;
use peppa_core::model::seat::Seat;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{Level, event};

use crate::advisory::{self, Advisor, Attempt, CommandAdvisor, MoveRequest, PassRequest};
use crate::config::TableConfig;
use crate::scheduler::{ScheduledTask, Scheduler, TaskKind};

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("the pass has already been confirmed")]
    PassConfirmed,
}

/// Advisory results travel back tagged with what they were asked about.
#[derive(Debug)]
enum Advice {
    Pass {
        epoch: u64,
        round: u32,
        seat: Seat,
        attempt: Attempt<Vec<String>>,
    },
    Move {
        epoch: u64,
        version: u64,
        seat: Seat,
        attempt: Attempt<String>,
    },
}

#[derive(Debug)]
struct PendingMove {
    version: u64,
    seat: Seat,
    in_flight: bool,
    pace_elapsed: bool,
    advice: Option<Attempt<Card>>,
}

/// A live game: owns the state, its timers and the advisory plumbing.
///
/// Intents come from the presentation layer. Timed work only happens inside
/// [`Table::pump`] / [`Table::pump_at`] or the async drivers, so the table
/// never mutates behind the caller's back.
pub struct Table {
    config: TableConfig,
    state: GameState,
    scheduler: Scheduler,
    policy: HeuristicPolicy,
    advisor: Option<Arc<dyn Advisor>>,
    advice_tx: UnboundedSender<Advice>,
    advice_rx: UnboundedReceiver<Advice>,
    epoch: u64,
    pass_confirmed: bool,
    pass_advice: [Option<[Card; PASS_SIZE]>; 4],
    pending_move: Option<PendingMove>,
    rng: StdRng,
}

impl Table {
    /// Table with the advisory service described by `config` (if enabled).
    pub fn new(config: TableConfig) -> Self {
        let advisor = CommandAdvisor::from_config(&config.advisory)
            .map(|advisor| Arc::new(advisor) as Arc<dyn Advisor>);
        Self::with_advisor(config, advisor, StdRng::from_entropy())
    }

    pub fn with_advisor(
        config: TableConfig,
        advisor: Option<Arc<dyn Advisor>>,
        mut rng: StdRng,
    ) -> Self {
        let state = fresh_game(&config, &mut rng);
        let (advice_tx, advice_rx) = mpsc::unbounded_channel();
        Self {
            config,
            state,
            scheduler: Scheduler::new(),
            policy: HeuristicPolicy::new(),
            advisor,
            advice_tx,
            advice_rx,
            epoch: 0,
            pass_confirmed: false,
            pass_advice: [None; 4],
            pending_move: None,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn pass_confirmed(&self) -> bool {
        self.pass_confirmed
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state).with_time_left(self.time_left())
    }

    /// Whole seconds left on the active turn clock, rounded up.
    pub fn time_left(&self) -> Option<u64> {
        self.time_left_at(Instant::now())
    }

    pub fn time_left_at(&self, now: Instant) -> Option<u64> {
        if self.state.status() != GameStatus::Playing {
            return None;
        }
        let task = self.scheduler.turn_deadline()?;
        let remaining = task.due.saturating_duration_since(now);
        Some(remaining.as_millis().div_ceil(1_000) as u64)
    }

    /// True when nothing will happen until the human acts.
    pub fn awaiting_input(&self) -> bool {
        match self.state.status() {
            GameStatus::Dealing
            | GameStatus::Receiving
            | GameStatus::Scoring
            | GameStatus::GameOver => true,
            GameStatus::Passing => !self.pass_confirmed,
            GameStatus::Playing => self.state.is_awaiting(Seat::HUMAN),
        }
    }

    pub fn deal(&mut self) -> Result<(), TableError> {
        let deck = Deck::shuffled(&mut self.rng);
        self.transition(Action::Deal(deck))
    }

    pub fn toggle_pass_card(&mut self, card: CardId) -> Result<(), TableError> {
        if self.pass_confirmed {
            return Err(TableError::PassConfirmed);
        }
        self.transition(Action::TogglePass {
            seat: Seat::HUMAN,
            card: card.card(),
        })
    }

    /// Locks in the human selection; the pass itself runs after a short pause.
    pub fn confirm_pass(&mut self) -> Result<(), TableError> {
        if self.state.status() != GameStatus::Passing {
            return Err(Rejection::WrongStatus {
                action: "confirm_pass",
                status: self.state.status(),
            }
            .into());
        }
        if self.pass_confirmed {
            return Err(TableError::PassConfirmed);
        }
        let human = self.state.player(Seat::HUMAN);
        if self.state.pass_direction().requires_selection() && !human.pass_ready() {
            return Err(Rejection::Pass(PassError::WrongCount {
                seat: Seat::HUMAN,
                selected: human.selected_to_pass.len(),
            })
            .into());
        }

        self.pass_confirmed = true;
        self.scheduler.arm(
            TaskKind::ExecutePass,
            Instant::now(),
            self.config.pass_pause(),
            self.state.version(),
        );
        Ok(())
    }

    pub fn play(&mut self, card: CardId) -> Result<(), TableError> {
        self.transition(Action::Play {
            seat: Seat::HUMAN,
            card: card.card(),
        })
    }

    pub fn confirm_receipt(&mut self) -> Result<(), TableError> {
        self.transition(Action::ConfirmReceipt)
    }

    pub fn advance_round(&mut self) -> Result<(), TableError> {
        self.transition(Action::AdvanceRound)
    }

    /// Throws the current game away. Anything still in flight for it is ignored.
    pub fn new_game(&mut self) {
        self.epoch += 1;
        self.state = fresh_game(&self.config, &mut self.rng);
        self.scheduler.clear();
        self.pass_confirmed = false;
        self.pass_advice = [None; 4];
        self.pending_move = None;
        event!(
            target: "peppa_table::table",
            Level::INFO,
            epoch = self.epoch,
            dealer_offset = self.state.dealer_offset(),
            "new game"
        );
    }

    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    /// Applies arrived advice, then fires every task due by `now`. Tasks run
    /// in due order and re-arm relative to their own due time, so one call
    /// catches up on a whole chain of pauses.
    pub fn pump_at(&mut self, now: Instant) {
        self.drain_advice(now);
        loop {
            let due = self.scheduler.take_due(now);
            if due.is_empty() {
                break;
            }
            for task in due {
                self.fire(task);
            }
        }
    }

    /// Waits for the next deadline or advisory result, then pumps once.
    /// Returns immediately when nothing is scheduled.
    pub async fn tick(&mut self) {
        let Some(deadline) = self.scheduler.next_deadline() else {
            self.pump();
            return;
        };
        tokio::select! {
            advice = self.advice_rx.recv() => {
                if let Some(advice) = advice {
                    self.absorb(advice, Instant::now());
                }
            }
            _ = tokio::time::sleep_until(deadline) => {}
        }
        self.pump();
    }

    /// Drives timers and advice until the human has to act.
    pub async fn run_until_input(&mut self) {
        loop {
            self.pump();
            if self.awaiting_input() || self.scheduler.is_empty() {
                return;
            }
            self.tick().await;
        }
    }

    fn transition(&mut self, action: Action) -> Result<(), TableError> {
        self.apply_at(action, Instant::now()).map_err(TableError::from)
    }

    fn apply_at(&mut self, action: Action, now: Instant) -> Result<(), Rejection> {
        let name = action.name();
        match self.state.apply(action) {
            Ok(next) => {
                self.commit(next, now);
                Ok(())
            }
            Err(rejection) => {
                event!(
                    target: "peppa_table::table",
                    Level::DEBUG,
                    action = name,
                    status = %self.state.status(),
                    reason = %rejection,
                    "action rejected"
                );
                Err(rejection)
            }
        }
    }

    /// Timer-driven action. A rejection here means the timers and the state
    /// disagree, which is worth a warning.
    fn drive(&mut self, action: Action, now: Instant) {
        let name = action.name();
        if let Err(rejection) = self.apply_at(action, now) {
            event!(
                target: "peppa_table::table",
                Level::WARN,
                action = name,
                reason = %rejection,
                "scheduled action rejected"
            );
        }
    }

    /// Swaps in `next` and re-arms timers for it.
    fn commit(&mut self, next: GameState, now: Instant) {
        let previous = self.state.status();
        self.state = next;
        self.scheduler.retain_version(self.state.version());
        self.pending_move = None;

        let status = self.state.status();
        if status != previous {
            self.on_enter(status);
        }

        match status {
            GameStatus::Playing if self.state.current_trick().is_complete() => {
                self.arm(TaskKind::ResolveTrick, now, self.config.trick_pause());
            }
            GameStatus::Playing => {
                let seat = self.state.turn();
                let budget = if seat.is_human() {
                    self.config.human_turn()
                } else {
                    self.config.bot_turn()
                };
                self.arm(TaskKind::TurnDeadline(seat), now, budget);
                if !seat.is_human() {
                    self.arm(TaskKind::BotMove(seat), now, self.config.bot_pace());
                    self.request_move_advice(seat);
                }
            }
            _ => {}
        }
    }

    fn on_enter(&mut self, status: GameStatus) {
        match status {
            GameStatus::Passing => {
                self.pass_confirmed = false;
                self.pass_advice = [None; 4];
                if self.state.pass_direction().requires_selection() {
                    for seat in Seat::LOOP.into_iter().filter(|seat| !seat.is_human()) {
                        self.request_pass_advice(seat);
                    }
                }
            }
            GameStatus::Scoring | GameStatus::GameOver => {
                let deltas = self
                    .state
                    .last_settlement()
                    .map(|settlement| settlement.deltas)
                    .unwrap_or_default();
                event!(
                    target: "peppa_table::table",
                    Level::INFO,
                    round = self.state.round_number(),
                    deltas = ?deltas,
                    slam = self.state.winning_message().unwrap_or(""),
                    "round settled"
                );
                if status == GameStatus::GameOver {
                    event!(
                        target: "peppa_table::table",
                        Level::INFO,
                        standings = ?self.state.final_standings(),
                        "game over"
                    );
                }
            }
            _ => {}
        }
    }

    fn arm(&mut self, kind: TaskKind, now: Instant, delay: Duration) {
        self.scheduler.arm(kind, now, delay, self.state.version());
    }

    fn fire(&mut self, task: ScheduledTask) {
        if task.armed_at != self.state.version() {
            event!(
                target: "peppa_table::table",
                Level::TRACE,
                task = ?task.kind,
                armed_at = task.armed_at,
                version = self.state.version(),
                "stale task skipped"
            );
            return;
        }

        let now = task.due;
        match task.kind {
            TaskKind::ResolveTrick => self.drive(Action::ResolveTrick, now),
            TaskKind::BotMove(seat) => {
                if !self.state.is_awaiting(seat) {
                    return;
                }
                if let Some(pending) = self.pending_move.as_mut()
                    && pending.version == task.armed_at
                    && pending.seat == seat
                    && pending.in_flight
                {
                    pending.pace_elapsed = true;
                    return;
                }
                self.play_bot(seat, now);
            }
            TaskKind::TurnDeadline(seat) => {
                if !self.state.is_awaiting(seat) {
                    return;
                }
                let card = self.heuristic_move(seat);
                event!(
                    target: "peppa_table::table",
                    Level::INFO,
                    seat = %seat,
                    card = %card.id(),
                    "turn timed out; forcing heuristic move"
                );
                self.drive(Action::Play { seat, card }, now);
            }
            TaskKind::ExecutePass => self.execute_pass(now),
        }
    }

    fn play_bot(&mut self, seat: Seat, now: Instant) {
        let advice = self
            .pending_move
            .take()
            .filter(|pending| pending.seat == seat && pending.version == self.state.version())
            .and_then(|pending| pending.advice);
        let card = match advice {
            Some(attempt) => attempt.or_else_fallback(|| self.heuristic_move(seat)),
            None => self.heuristic_move(seat),
        };
        self.drive(Action::Play { seat, card }, now);
    }

    fn heuristic_move(&mut self, seat: Seat) -> Card {
        let ctx = PolicyContext::from_state(&self.state, seat);
        self.policy.choose_play(&ctx)
    }

    /// Fills computer selections and swaps all passes at once.
    fn execute_pass(&mut self, now: Instant) {
        let mut next = self.state.clone();
        if next.pass_direction().requires_selection() {
            for seat in Seat::LOOP.into_iter().filter(|seat| !seat.is_human()) {
                let cards = match self.pass_advice[seat.index()].take() {
                    Some(cards) => cards,
                    None => {
                        let ctx = PolicyContext::from_state(&next, seat);
                        self.policy.choose_pass(&ctx)
                    }
                };
                next = match next.apply(Action::SelectPass { seat, cards }) {
                    Ok(next) => next,
                    Err(rejection) => {
                        event!(
                            target: "peppa_table::table",
                            Level::WARN,
                            seat = %seat,
                            reason = %rejection,
                            "computer pass selection rejected"
                        );
                        return;
                    }
                };
            }
        }

        match next.apply(Action::ExecutePass) {
            Ok(next) => {
                self.pass_confirmed = false;
                self.commit(next, now);
            }
            Err(rejection) => event!(
                target: "peppa_table::table",
                Level::WARN,
                reason = %rejection,
                "pass execution rejected"
            ),
        }
    }

    fn request_pass_advice(&mut self, seat: Seat) {
        let Some(advisor) = self.advisor.clone() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            event!(
                target: "peppa_table::advisory",
                Level::DEBUG,
                "no async runtime; skipping advisory pass request"
            );
            return;
        };
        let request = PassRequest::from_state(&self.state, seat);
        let budget = self.config.advisory.timeout();
        let tx = self.advice_tx.clone();
        let (epoch, round) = (self.epoch, self.state.round_number());
        handle.spawn(async move {
            let attempt = advisory::attempt(budget, advisor.propose_pass(request)).await;
            let _ = tx.send(Advice::Pass {
                epoch,
                round,
                seat,
                attempt,
            });
        });
    }

    fn request_move_advice(&mut self, seat: Seat) {
        let Some(advisor) = self.advisor.clone() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            event!(
                target: "peppa_table::advisory",
                Level::DEBUG,
                "no async runtime; skipping advisory move request"
            );
            return;
        };
        let request = MoveRequest::from_state(&self.state, seat);
        // Never wait past the seat's own clock.
        let budget = self.config.advisory.timeout().min(self.config.bot_turn());
        let tx = self.advice_tx.clone();
        let (epoch, version) = (self.epoch, self.state.version());
        handle.spawn(async move {
            let attempt = advisory::attempt(budget, advisor.propose_move(request)).await;
            let _ = tx.send(Advice::Move {
                epoch,
                version,
                seat,
                attempt,
            });
        });
        self.pending_move = Some(PendingMove {
            version,
            seat,
            in_flight: true,
            pace_elapsed: false,
            advice: None,
        });
    }

    fn drain_advice(&mut self, now: Instant) {
        while let Ok(advice) = self.advice_rx.try_recv() {
            self.absorb(advice, now);
        }
    }

    fn absorb(&mut self, advice: Advice, now: Instant) {
        match advice {
            Advice::Pass {
                epoch,
                round,
                seat,
                attempt,
            } => {
                let current = epoch == self.epoch
                    && self.state.status() == GameStatus::Passing
                    && round == self.state.round_number();
                if !current {
                    log_discarded("pass", seat, attempt.label());
                    return;
                }
                let hand = &self.state.player(seat).hand;
                let outcome = attempt.validate(|ids| advisory::validate_pass(hand, &ids));
                log_outcome("pass", seat, outcome.label());
                if let Attempt::Proposal(cards) = outcome {
                    self.pass_advice[seat.index()] = Some(cards);
                }
            }
            Advice::Move {
                epoch,
                version,
                seat,
                attempt,
            } => {
                let current = epoch == self.epoch
                    && version == self.state.version()
                    && self.state.is_awaiting(seat)
                    && self
                        .pending_move
                        .as_ref()
                        .is_some_and(|pending| pending.version == version && pending.seat == seat);
                if !current {
                    log_discarded("move", seat, attempt.label());
                    return;
                }
                let state = &self.state;
                let outcome = attempt.validate(|id| advisory::validate_move(state, seat, &id));
                log_outcome("move", seat, outcome.label());

                let Some(pending) = self.pending_move.as_mut() else {
                    return;
                };
                pending.in_flight = false;
                pending.advice = Some(outcome);
                if pending.pace_elapsed {
                    self.play_bot(seat, now);
                }
            }
        }
    }
}

fn fresh_game(config: &TableConfig, rng: &mut StdRng) -> GameState {
    let names = table_names(&config.human_name, rng);
    GameState::with_random_dealer(names, config.total_rounds, rng)
}

fn log_discarded(kind: &str, seat: Seat, outcome: &str) {
    event!(
        target: "peppa_table::advisory",
        Level::DEBUG,
        kind,
        seat = %seat,
        outcome,
        "late advisory result discarded"
    );
}

fn log_outcome(kind: &str, seat: Seat, outcome: &str) {
    if outcome != "proposal" {
        event!(
            target: "peppa_table::advisory",
            Level::WARN,
            kind,
            seat = %seat,
            outcome,
            "advisory result unusable; falling back to heuristic"
        );
    } else {
        event!(
            target: "peppa_table::advisory",
            Level::DEBUG,
            kind,
            seat = %seat,
            "advisory proposal accepted"
        );
    }
}
