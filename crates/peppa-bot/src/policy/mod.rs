mod heuristic;

pub use heuristic::HeuristicPolicy;

use peppa_core::game::GameState;
use peppa_core::model::card::Card;
use peppa_core::model::hand::Hand;
use peppa_core::model::passing::PassDirection;
use peppa_core::model::player::PASS_SIZE;
use peppa_core::model::seat::Seat;
use peppa_core::model::suit::Suit;
use peppa_core::model::trick::Trick;

/// What a seat can see when it has to decide.
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub lead_suit: Option<Suit>,
    pub hearts_broken: bool,
    pub trick: &'a Trick,
    pub pass_direction: PassDirection,
}

impl<'a> PolicyContext<'a> {
    pub fn from_state(state: &'a GameState, seat: Seat) -> Self {
        Self {
            seat,
            hand: &state.player(seat).hand,
            lead_suit: state.lead_suit(),
            hearts_broken: state.hearts_broken(),
            trick: state.current_trick(),
            pass_direction: state.pass_direction(),
        }
    }
}

/// Local decision-making for computer seats. Also used as the fallback
/// whenever the advisory service has nothing usable.
pub trait Policy: Send {
    /// Choose 3 cards to pass (called during Passing phase)
    fn choose_pass(&mut self, ctx: &PolicyContext) -> [Card; PASS_SIZE];

    /// Choose 1 card to play (called during Playing phase)
    fn choose_play(&mut self, ctx: &PolicyContext) -> Card;
}
