use crate::model::card::Card;
use crate::model::player::{PASS_SIZE, Player, has_duplicates};
use crate::model::seat::Seat;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::array;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassDirection {
    Right,
    Left,
    Across,
    #[serde(rename = "none")]
    Hold,
}

impl PassDirection {
    /// Rotation used by consecutive rounds, starting with round 1.
    pub const CYCLE: [PassDirection; 4] = [
        PassDirection::Right,
        PassDirection::Left,
        PassDirection::Across,
        PassDirection::Hold,
    ];

    /// Direction for a 1-based round number; round 0 is treated as round 1.
    pub const fn for_round(round_number: u32) -> PassDirection {
        let round = if round_number == 0 { 1 } else { round_number };
        Self::CYCLE[((round - 1) % 4) as usize]
    }

    pub const fn next(self) -> PassDirection {
        match self {
            PassDirection::Right => PassDirection::Left,
            PassDirection::Left => PassDirection::Across,
            PassDirection::Across => PassDirection::Hold,
            PassDirection::Hold => PassDirection::Right,
        }
    }

    pub const fn requires_selection(self) -> bool {
        !matches!(self, PassDirection::Hold)
    }

    /// Seat whose cards `seat` receives.
    pub const fn donor(self, seat: Seat) -> Seat {
        match self {
            PassDirection::Left => seat.next(),
            PassDirection::Right => seat.previous(),
            PassDirection::Across => seat.opposite(),
            PassDirection::Hold => seat,
        }
    }

    /// Seat that receives the cards `seat` passes.
    pub const fn recipient(self, seat: Seat) -> Seat {
        match self {
            PassDirection::Left => seat.previous(),
            PassDirection::Right => seat.next(),
            PassDirection::Across => seat.opposite(),
            PassDirection::Hold => seat,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PassDirection::Right => "right",
            PassDirection::Left => "left",
            PassDirection::Across => "across",
            PassDirection::Hold => "none",
        }
    }
}

impl fmt::Display for PassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassDirection {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(PassDirection::Right),
            "left" => Ok(PassDirection::Left),
            "across" => Ok(PassDirection::Across),
            "none" | "hold" => Ok(PassDirection::Hold),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassError {
    DirectionDoesNotPass,
    CardNotInHand(Card),
    DuplicateCard(Card),
    SelectionFull,
    WrongCount { seat: Seat, selected: usize },
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassError::DirectionDoesNotPass => write!(f, "no cards are passed this round"),
            PassError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            PassError::DuplicateCard(card) => write!(f, "{card} selected twice"),
            PassError::SelectionFull => write!(f, "three cards are already selected"),
            PassError::WrongCount { seat, selected } => {
                write!(f, "{seat} selected {selected} cards instead of {PASS_SIZE}")
            }
        }
    }
}

impl std::error::Error for PassError {}

/// Flips `card` in or out of the player's pending selection. A fourth card
/// is refused; deselecting always succeeds.
pub fn toggle_selection(player: &mut Player, card: Card) -> Result<(), PassError> {
    if let Some(index) = player.selected_to_pass.iter().position(|&c| c == card) {
        player.selected_to_pass.remove(index);
        return Ok(());
    }
    if !player.hand.contains(card) {
        return Err(PassError::CardNotInHand(card));
    }
    if player.selected_to_pass.len() >= PASS_SIZE {
        return Err(PassError::SelectionFull);
    }
    player.selected_to_pass.push(card);
    Ok(())
}

/// Replaces the player's selection with exactly three held cards.
pub fn set_selection(player: &mut Player, cards: [Card; PASS_SIZE]) -> Result<(), PassError> {
    if let Some(card) = cards.iter().copied().find(|c| !player.hand.contains(*c)) {
        return Err(PassError::CardNotInHand(card));
    }
    if has_duplicates(&cards) {
        return Err(PassError::DuplicateCard(cards[0]));
    }
    player.selected_to_pass = cards.to_vec();
    Ok(())
}

/// Moves every seat's selection to its recipient at once. Either all four
/// transfers happen or, on error, no hand is touched.
///
/// Returns the cards each seat received, indexed by seat.
pub fn execute_pass(
    players: &mut [Player; 4],
    direction: PassDirection,
) -> Result<[Vec<Card>; 4], PassError> {
    if !direction.requires_selection() {
        return Err(PassError::DirectionDoesNotPass);
    }

    for player in players.iter() {
        if player.selected_to_pass.len() != PASS_SIZE {
            return Err(PassError::WrongCount {
                seat: player.seat,
                selected: player.selected_to_pass.len(),
            });
        }
        if let Some(card) = player
            .selected_to_pass
            .iter()
            .copied()
            .find(|c| !player.hand.contains(*c))
        {
            return Err(PassError::CardNotInHand(card));
        }
        if has_duplicates(&player.selected_to_pass) {
            return Err(PassError::DuplicateCard(player.selected_to_pass[0]));
        }
    }

    let outgoing: [Vec<Card>; 4] = array::from_fn(|i| players[i].selected_to_pass.clone());
    let received: [Vec<Card>; 4] = array::from_fn(|i| {
        let donor = direction.donor(Seat::wrapping(i));
        outgoing[donor.index()].clone()
    });

    for (player, incoming) in players.iter_mut().zip(received.iter()) {
        for card in outgoing[player.seat.index()].iter() {
            player.hand.remove(*card);
        }
        player.hand.extend(incoming.iter().copied());
        player.selected_to_pass.clear();
    }

    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::{PassDirection, PassError, execute_pass, set_selection, toggle_selection};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::player::Player;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use std::array;

    fn dealt_players(seed: u64) -> [Player; 4] {
        let deck = Deck::shuffled_with_seed(seed);
        let mut players = array::from_fn(|i| Player::new(Seat::wrapping(i), format!("p{i}")));
        for (player, cards) in players.iter_mut().zip(deck.hands()) {
            player.reset_for_round(Hand::with_cards(cards.to_vec()));
        }
        players
    }

    fn sorted_ids(players: &[Player; 4]) -> Vec<u8> {
        let mut ids: Vec<u8> = players
            .iter()
            .flat_map(|p| p.hand.iter().map(|c| c.id().raw()))
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn direction_cycle_over_eight_rounds() {
        let directions: Vec<_> = (1..=8).map(PassDirection::for_round).collect();
        assert_eq!(
            directions,
            vec![
                PassDirection::Right,
                PassDirection::Left,
                PassDirection::Across,
                PassDirection::Hold,
                PassDirection::Right,
                PassDirection::Left,
                PassDirection::Across,
                PassDirection::Hold,
            ]
        );
        assert_eq!(PassDirection::for_round(0), PassDirection::Right);
    }

    #[test]
    fn next_follows_the_round_cycle() {
        for round in 1..=8 {
            assert_eq!(
                PassDirection::for_round(round).next(),
                PassDirection::for_round(round + 1)
            );
        }
    }

    #[test]
    fn donor_mapping_matches_seat_offsets() {
        assert_eq!(PassDirection::Left.donor(Seat::South), Seat::West);
        assert_eq!(PassDirection::Right.donor(Seat::South), Seat::East);
        assert_eq!(PassDirection::Across.donor(Seat::South), Seat::North);
        for direction in PassDirection::CYCLE {
            for seat in Seat::LOOP {
                assert_eq!(direction.recipient(direction.donor(seat)), seat);
            }
        }
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for direction in PassDirection::CYCLE {
            assert_eq!(direction.as_str().parse::<PassDirection>(), Ok(direction));
        }
        assert_eq!(PassDirection::Hold.as_str(), "none");
        assert!("sideways".parse::<PassDirection>().is_err());
    }

    #[test]
    fn toggle_refuses_fourth_card_and_allows_deselect() {
        let mut players = dealt_players(5);
        let player = &mut players[0];
        let cards: Vec<Card> = player.hand.cards()[..4].to_vec();

        for card in &cards[..3] {
            toggle_selection(player, *card).unwrap();
        }
        assert_eq!(
            toggle_selection(player, cards[3]),
            Err(PassError::SelectionFull)
        );
        assert_eq!(player.selected_to_pass.len(), 3);

        toggle_selection(player, cards[1]).unwrap();
        assert_eq!(player.selected_to_pass, vec![cards[0], cards[2]]);
        toggle_selection(player, cards[3]).unwrap();
        assert_eq!(player.selected_to_pass.len(), 3);
    }

    #[test]
    fn toggle_rejects_foreign_card() {
        let mut players = dealt_players(6);
        let foreign = players[1].hand.cards()[0];
        assert_eq!(
            toggle_selection(&mut players[0], foreign),
            Err(PassError::CardNotInHand(foreign))
        );
    }

    #[test]
    fn pass_preserves_hand_sizes_and_card_multiset() {
        for direction in [PassDirection::Left, PassDirection::Right, PassDirection::Across] {
            let mut players = dealt_players(11);
            let before = sorted_ids(&players);
            for player in players.iter_mut() {
                let pick = [
                    player.hand.cards()[0],
                    player.hand.cards()[5],
                    player.hand.cards()[12],
                ];
                set_selection(player, pick).unwrap();
            }
            execute_pass(&mut players, direction).unwrap();

            for player in players.iter() {
                assert_eq!(player.hand.len(), 13);
                assert!(player.selected_to_pass.is_empty());
            }
            assert_eq!(sorted_ids(&players), before);
        }
    }

    #[test]
    fn cards_arrive_from_the_donor_seat() {
        let mut players = dealt_players(12);
        let mut picks = Vec::new();
        for player in players.iter_mut() {
            let pick = [
                player.hand.cards()[0],
                player.hand.cards()[1],
                player.hand.cards()[2],
            ];
            set_selection(player, pick).unwrap();
            picks.push(pick);
        }

        let received = execute_pass(&mut players, PassDirection::Left).unwrap();

        // Left: seat i receives from seat i + 1.
        for seat in Seat::LOOP {
            let donor = seat.next();
            assert_eq!(received[seat.index()], picks[donor.index()].to_vec());
            for card in picks[donor.index()] {
                assert!(players[seat.index()].hand.contains(card));
            }
            for card in picks[seat.index()] {
                assert!(!players[seat.index()].hand.contains(card));
            }
        }
    }

    #[test]
    fn incomplete_selection_moves_nothing() {
        let mut players = dealt_players(13);
        for player in players.iter_mut().take(3) {
            let pick = [
                player.hand.cards()[0],
                player.hand.cards()[1],
                player.hand.cards()[2],
            ];
            set_selection(player, pick).unwrap();
        }
        let snapshot = players.clone();

        assert_eq!(
            execute_pass(&mut players, PassDirection::Across),
            Err(PassError::WrongCount {
                seat: Seat::East,
                selected: 0
            })
        );
        assert_eq!(players, snapshot);
    }

    #[test]
    fn hold_direction_does_not_pass() {
        let mut players = dealt_players(14);
        assert_eq!(
            execute_pass(&mut players, PassDirection::Hold),
            Err(PassError::DirectionDoesNotPass)
        );
    }

    #[test]
    fn set_selection_rejects_duplicates() {
        let mut players = dealt_players(15);
        let card = players[2].hand.cards()[0];
        assert!(matches!(
            set_selection(&mut players[2], [card, card, card]),
            Err(PassError::DuplicateCard(_))
        ));
        assert!(matches!(
            set_selection(
                &mut players[2],
                [Card::new(Rank::Two, Suit::Clubs); 3]
            ),
            Err(_)
        ));
    }
}
