use peppa_core::game::GameState;
use peppa_core::game::snapshot::{CardView, PlayView};
use peppa_core::model::passing::PassDirection;
use peppa_core::model::seat::Seat;
use peppa_core::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Asks for three cards to pass out of `hand`.
#[derive(Debug, Clone, Serialize)]
pub struct PassRequest {
    pub action: &'static str,
    pub seat: Seat,
    pub direction: PassDirection,
    pub hand: Vec<CardView>,
}

impl PassRequest {
    pub fn from_state(state: &GameState, seat: Seat) -> Self {
        PassRequest {
            action: "pass",
            seat,
            direction: state.pass_direction(),
            hand: state
                .player(seat)
                .hand
                .iter()
                .copied()
                .map(CardView::from)
                .collect(),
        }
    }
}

/// Asks for one card to play. Only the playable cards are sent.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest {
    pub action: &'static str,
    pub seat: Seat,
    pub lead_suit: Option<Suit>,
    pub hearts_broken: bool,
    pub trick: Vec<PlayView>,
    pub playable: Vec<CardView>,
}

impl MoveRequest {
    pub fn from_state(state: &GameState, seat: Seat) -> Self {
        MoveRequest {
            action: "play",
            seat,
            lead_suit: state.lead_suit(),
            hearts_broken: state.hearts_broken(),
            trick: state
                .current_trick()
                .plays()
                .iter()
                .map(|play| PlayView {
                    seat: play.seat,
                    card: play.card.into(),
                })
                .collect(),
            playable: state
                .legal_plays(seat)
                .into_iter()
                .map(CardView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PassResponse {
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MoveResponse {
    pub card: String,
}

#[cfg(test)]
mod tests {
    use super::{MoveRequest, PassRequest};
    use peppa_core::game::{Action, GameState};
    use peppa_core::model::deck::Deck;
    use peppa_core::model::seat::Seat;

    fn names() -> [String; 4] {
        ["Charlie Bartom", "Robbie", "SAM 104", "Nexus 7"].map(String::from)
    }

    #[test]
    fn pass_request_carries_the_whole_hand() {
        let state = GameState::new(names(), 4, 0)
            .apply(Action::Deal(Deck::standard()))
            .unwrap();
        let request = PassRequest::from_state(&state, Seat::West);
        assert_eq!(request.hand.len(), 13);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action"], "pass");
        assert_eq!(json["direction"], "right");
        assert_eq!(json["hand"][0]["id"], "2-diamonds");
        assert_eq!(json["hand"][0]["value"], 2);
    }

    #[test]
    fn move_request_only_lists_playable_cards() {
        // Unshuffled deal: South holds every club, West every diamond.
        let mut state = GameState::new(names(), 4, 3)
            .apply(Action::Deal(Deck::standard()))
            .unwrap();
        for seat in Seat::LOOP {
            let cards = state.player(seat).hand.cards();
            let pick = [cards[0], cards[1], cards[2]];
            state = state.apply(Action::SelectPass { seat, cards: pick }).unwrap();
        }
        state = state
            .apply(Action::ExecutePass)
            .unwrap()
            .apply(Action::ConfirmReceipt)
            .unwrap();
        let leader = state.turn();
        let request = MoveRequest::from_state(&state, leader);
        assert_eq!(request.playable.len(), state.legal_plays(leader).len());
        assert!(request.trick.is_empty());
        assert_eq!(request.lead_suit, None);

        let card = state.legal_plays(leader)[0];
        let state = state.apply(Action::Play { seat: leader, card }).unwrap();
        let next = state.turn();
        let request = MoveRequest::from_state(&state, next);
        assert_eq!(request.trick.len(), 1);
        assert_eq!(request.lead_suit, Some(card.suit));
        assert!(request.playable.len() <= state.player(next).hand.len());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action"], "play");
    }
}
