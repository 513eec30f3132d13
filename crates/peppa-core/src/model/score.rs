use crate::model::card::QUEEN_OF_SPADES_PENALTY;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::seat::Seat;

/// Points credited to the winner of every trick before penalties.
pub const TRICK_BASELINE: i32 = 10;
pub const TRICKS_PER_ROUND: i32 = 13;
/// Sum of the heart values 2..=14.
pub const HEARTS_TOTAL: i32 = 104;
/// Every penalty point in the deck. Equals `TRICK_BASELINE * TRICKS_PER_ROUND`,
/// which is what keeps an ordinary round zero-sum.
pub const TOTAL_PENALTY: i32 = HEARTS_TOTAL + QUEEN_OF_SPADES_PENALTY;
pub const SLAM_BONUS: i32 = 45;
pub const SLAM_PENALTY: i32 = -15;

/// Round deltas after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub slam: Option<Seat>,
    pub deltas: [i32; 4],
}

/// Seat that took every penalty point this round, if any.
///
/// A seat's round points are `TRICK_BASELINE * tricks - penalties taken`, so
/// the identity below only holds while the baseline, the heart values and the
/// queen penalty keep their current values.
pub fn slam_shooter(players: &[Player; 4]) -> Option<Seat> {
    players
        .iter()
        .find(|p| i32::from(p.tricks_won) * TRICK_BASELINE - p.points_this_round == TOTAL_PENALTY)
        .map(|p| p.seat)
}

/// Applies the slam override when it triggers, folds round points into the
/// cumulative scores and clears the trick counters.
pub fn settle_round(players: &mut [Player; 4]) -> Settlement {
    let slam = slam_shooter(players);
    if let Some(shooter) = slam {
        for player in players.iter_mut() {
            player.points_this_round = if player.seat == shooter {
                SLAM_BONUS
            } else {
                SLAM_PENALTY
            };
        }
    }

    let mut deltas = [0; 4];
    for player in players.iter_mut() {
        player.score += player.points_this_round;
        player.tricks_won = 0;
        deltas[player.seat.index()] = player.points_this_round;
    }

    Settlement { slam, deltas }
}

/// 1 + the number of seats with a strictly greater score. Ties share a rank
/// and the following rank is skipped.
pub fn rank_of(scores: &[i32; 4], seat: Seat) -> u8 {
    let own = scores[seat.index()];
    1 + scores.iter().filter(|&&other| other > own).count() as u8
}

/// Seats ordered by descending score; equal scores keep seat order.
pub fn standings(scores: &[i32; 4]) -> [Seat; 4] {
    let mut seats = Seat::LOOP;
    seats.sort_by(|a, b| scores[b.index()].cmp(&scores[a.index()]));
    seats
}

const fn hearts_total() -> i32 {
    let mut total = 0;
    let mut i = 0;
    while i < Rank::ORDERED.len() {
        total += Rank::ORDERED[i].value() as i32;
        i += 1;
    }
    total
}

const _: () = assert!(hearts_total() == HEARTS_TOTAL);
const _: () = assert!(TOTAL_PENALTY == TRICK_BASELINE * TRICKS_PER_ROUND);

#[cfg(test)]
mod tests {
    use super::{SLAM_BONUS, SLAM_PENALTY, rank_of, settle_round, slam_shooter, standings};
    use crate::model::player::Player;
    use crate::model::seat::Seat;
    use std::array;

    fn players_with(round: [(u8, i32); 4]) -> [Player; 4] {
        array::from_fn(|i| {
            let mut p = Player::new(Seat::wrapping(i), format!("p{i}"));
            p.tricks_won = round[i].0;
            p.points_this_round = round[i].1;
            p
        })
    }

    #[test]
    fn ordinary_round_adds_points_and_resets_tricks() {
        let mut players = players_with([(4, 12), (3, -20), (5, 3), (1, 5)]);
        players[1].score = 50;
        let settlement = settle_round(&mut players);

        assert_eq!(settlement.slam, None);
        assert_eq!(settlement.deltas, [12, -20, 3, 5]);
        assert_eq!(players[1].score, 30);
        assert!(players.iter().all(|p| p.tricks_won == 0));
    }

    #[test]
    fn taking_every_trick_and_point_is_a_slam() {
        let mut players = players_with([(0, 0), (0, 0), (13, 0), (0, 0)]);
        assert_eq!(slam_shooter(&players), Some(Seat::North));

        let settlement = settle_round(&mut players);
        assert_eq!(settlement.slam, Some(Seat::North));
        assert_eq!(settlement.deltas, [-15, -15, 45, -15]);
        assert_eq!(settlement.deltas.iter().sum::<i32>(), 0);
        assert_eq!(players[2].score, SLAM_BONUS);
        assert_eq!(players[0].score, SLAM_PENALTY);
    }

    #[test]
    fn slam_with_fewer_tricks_still_counts() {
        // 9 tricks holding all 130 penalty points: 90 - 130 = -40.
        let players = players_with([(9, -40), (2, 20), (1, 10), (1, 10)]);
        assert_eq!(slam_shooter(&players), Some(Seat::South));
    }

    #[test]
    fn near_slam_is_not_a_slam() {
        let players = players_with([(13, 2), (0, 0), (0, 0), (0, -2)]);
        assert_eq!(slam_shooter(&players), None);
    }

    #[test]
    fn ranks_share_ties_and_skip() {
        let scores = [10, 10, -5, 20];
        let ranks: Vec<u8> = Seat::LOOP.iter().map(|&s| rank_of(&scores, s)).collect();
        assert_eq!(ranks, vec![2, 2, 4, 1]);
    }

    #[test]
    fn standings_order_by_descending_score() {
        assert_eq!(
            standings(&[10, 10, -5, 20]),
            [Seat::East, Seat::South, Seat::West, Seat::North]
        );
    }
}
