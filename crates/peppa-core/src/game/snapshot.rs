use super::state::{GameState, GameStatus};
use crate::model::card::{Card, CardId};
use crate::model::passing::PassDirection;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    pub value: u8,
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        CardView {
            id: card.id(),
            suit: card.suit,
            rank: card.rank,
            value: card.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayView {
    pub seat: Seat,
    pub card: CardView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub name: String,
    pub is_human: bool,
    pub score: i32,
    pub points_this_round: i32,
    pub tricks_won: u8,
    pub rank: u8,
    pub hand_size: usize,
    /// Only the human's own cards are revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<CardView>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_to_pass: Vec<CardView>,
}

/// Read-only view of a [`GameState`] for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub version: u64,
    pub status: GameStatus,
    pub round_number: u32,
    pub total_rounds: u32,
    pub pass_direction: PassDirection,
    pub dealer: Seat,
    pub starting_player: Seat,
    pub turn: Seat,
    pub lead_suit: Option<Suit>,
    pub hearts_broken: bool,
    pub trick: Vec<PlayView>,
    /// Points the current trick would award if it ended now.
    pub trick_value: i32,
    pub players: Vec<PlayerView>,
    pub winning_message: Option<String>,
    pub received_cards: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_standings: Option<[Seat; 4]>,
    /// Seconds left on the active turn clock. Filled in by the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let trick = state.current_trick();
        let players = state
            .players()
            .iter()
            .map(|player| {
                let human = player.is_human();
                PlayerView {
                    seat: player.seat,
                    name: player.name.clone(),
                    is_human: human,
                    score: player.score,
                    points_this_round: player.points_this_round,
                    tricks_won: player.tricks_won,
                    rank: state.rank_of(player.seat),
                    hand_size: player.hand.len(),
                    hand: human.then(|| player.hand.iter().copied().map(CardView::from).collect()),
                    selected_to_pass: if human {
                        player
                            .selected_to_pass
                            .iter()
                            .copied()
                            .map(CardView::from)
                            .collect()
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect();

        GameSnapshot {
            version: state.version(),
            status: state.status(),
            round_number: state.round_number(),
            total_rounds: state.total_rounds(),
            pass_direction: state.pass_direction(),
            dealer: state.round().dealer(),
            starting_player: state.round().starting_player(),
            turn: state.turn(),
            lead_suit: state.lead_suit(),
            hearts_broken: state.hearts_broken(),
            trick: trick
                .plays()
                .iter()
                .map(|play| PlayView {
                    seat: play.seat,
                    card: play.card.into(),
                })
                .collect(),
            trick_value: trick.points(),
            players,
            winning_message: state.winning_message().map(str::to_string),
            received_cards: state
                .received_cards()
                .iter()
                .copied()
                .map(CardView::from)
                .collect(),
            final_standings: (state.status() == GameStatus::GameOver)
                .then(|| state.final_standings()),
            time_left: None,
        }
    }

    pub fn with_time_left(mut self, seconds: Option<u64>) -> Self {
        self.time_left = seconds;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;
    use crate::game::state::tests::{names, play_full_round, to_playing};
    use crate::game::state::{GameState, GameStatus};
    use crate::model::deck::Deck;
    use crate::model::seat::Seat;

    #[test]
    fn only_the_human_hand_is_revealed() {
        let state = GameState::new(names(), 4, 0)
            .deal(&Deck::shuffled_with_seed(5))
            .unwrap();
        let snapshot = GameSnapshot::capture(&state);
        assert_eq!(snapshot.status, GameStatus::Passing);
        assert_eq!(snapshot.players.len(), 4);
        let human = &snapshot.players[Seat::HUMAN.index()];
        assert!(human.is_human);
        assert_eq!(human.hand.as_ref().map(Vec::len), Some(13));
        for bot in snapshot.players.iter().filter(|p| !p.is_human) {
            assert!(bot.hand.is_none());
            assert_eq!(bot.hand_size, 13);
        }
        assert!(snapshot.final_standings.is_none());
    }

    #[test]
    fn json_uses_card_ids_and_lowercase_names() {
        let state = to_playing(GameState::new(names(), 4, 0), 8);
        let json = GameSnapshot::capture(&state)
            .with_time_left(Some(40))
            .to_json()
            .unwrap();
        assert!(json.contains("\"status\": \"playing\""));
        assert!(json.contains("\"pass_direction\": \"right\""));
        assert!(json.contains("\"time_left\": 40"));
        assert!(json.contains("\"Charlie Bartom\""));
        assert!(json.contains("-clubs\"") || json.contains("-spades\""));
    }

    #[test]
    fn game_over_lists_final_standings() {
        let state = play_full_round(GameState::new(names(), 1, 2));
        let snapshot = GameSnapshot::capture(&state);
        assert_eq!(snapshot.status, GameStatus::GameOver);
        let standings = snapshot.final_standings.unwrap();
        assert_eq!(standings, state.final_standings());
        assert!(snapshot.to_json().unwrap().contains("\"final_standings\""));
    }
}
