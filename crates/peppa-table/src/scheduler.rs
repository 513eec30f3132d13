//! Delayed table work. Every task remembers the state version that armed it
//! and is dropped once that version is superseded, so a stale timer can never
//! act on a newer state.

use peppa_core::model::seat::Seat;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// The seat ran out of time; a heuristic move is forced.
    TurnDeadline(Seat),
    /// Pacing delay before a computer seat plays.
    BotMove(Seat),
    /// Pause with four cards on the table before scoring the trick.
    ResolveTrick,
    /// Pause after the human confirmed a pass.
    ExecutePass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub due: Instant,
    pub armed_at: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: TaskKind, now: Instant, delay: Duration, version: u64) {
        self.tasks.push(ScheduledTask {
            kind,
            due: now + delay,
            armed_at: version,
        });
    }

    /// Drops every task armed before `version`.
    pub fn retain_version(&mut self, version: u64) {
        self.tasks.retain(|task| task.armed_at >= version);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Removes and returns the tasks due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduledTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| task.due);
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|task| task.due).min()
    }

    pub fn find(&self, kind: TaskKind) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.kind == kind)
    }

    pub fn turn_deadline(&self) -> Option<&ScheduledTask> {
        self.tasks
            .iter()
            .find(|task| matches!(task.kind, TaskKind::TurnDeadline(_)))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
