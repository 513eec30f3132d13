use super::{Policy, PolicyContext};
use peppa_core::model::card::Card;
use peppa_core::model::player::PASS_SIZE;
use peppa_core::model::rules;
use tracing::{Level, event};

/// Plays the lowest legal card and passes the three highest.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Three highest-value cards; equal values keep hand order.
    pub fn pass_selection(cards: &[Card]) -> Option<[Card; PASS_SIZE]> {
        let mut ordered = cards.to_vec();
        ordered.sort_by(|a, b| b.value().cmp(&a.value()));
        match ordered.as_slice() {
            [a, b, c, ..] => Some([*a, *b, *c]),
            _ => None,
        }
    }

    /// Lowest-value card; the first one wins a tie.
    pub fn lowest(cards: &[Card]) -> Option<Card> {
        cards.iter().copied().reduce(|best, card| {
            if card.value() < best.value() {
                card
            } else {
                best
            }
        })
    }
}

impl Policy for HeuristicPolicy {
    fn choose_pass(&mut self, ctx: &PolicyContext) -> [Card; PASS_SIZE] {
        match Self::pass_selection(ctx.hand.cards()) {
            Some(selection) => {
                log_pass_decision(ctx, &selection, "highest_three");
                selection
            }
            None => panic!("heuristic policy asked to pass from a hand under three cards"),
        }
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Card {
        let legal_moves = rules::legal_plays(ctx.hand, ctx.lead_suit, ctx.hearts_broken);
        let chosen = match Self::lowest(&legal_moves) {
            Some(card) => card,
            None => panic!("heuristic policy expected at least one legal card"),
        };
        log_play_decision(ctx, &legal_moves, chosen, "lowest_legal");
        chosen
    }
}

fn log_pass_decision(ctx: &PolicyContext, selection: &[Card; PASS_SIZE], reason: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let cards = selection
        .iter()
        .map(|card| card.id().to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "peppa_bot::pass",
        Level::DEBUG,
        seat = %ctx.seat,
        direction = %ctx.pass_direction,
        hand_size = ctx.hand.len(),
        reason,
        cards = %cards
    );
}

fn log_play_decision(ctx: &PolicyContext, legal_moves: &[Card], chosen: Card, reason: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if legal_moves.len() <= 6 {
        legal_moves
            .iter()
            .map(|card| card.id().to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal_moves.len())
    };

    event!(
        target: "peppa_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        legal_count = legal_moves.len(),
        legal_moves = %legal_preview,
        chosen = %chosen.id(),
        hearts_broken = ctx.hearts_broken,
        trick_cards = ctx.trick.len(),
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use peppa_core::model::hand::Hand;
    use peppa_core::model::passing::PassDirection;
    use peppa_core::model::rank::Rank;
    use peppa_core::model::seat::Seat;
    use peppa_core::model::suit::Suit;
    use peppa_core::model::trick::Trick;

    fn ctx<'a>(hand: &'a Hand, trick: &'a Trick, hearts_broken: bool) -> PolicyContext<'a> {
        PolicyContext {
            seat: Seat::West,
            hand,
            lead_suit: trick.lead_suit(),
            hearts_broken,
            trick,
            pass_direction: PassDirection::Left,
        }
    }

    #[test]
    fn passes_the_three_highest_values() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Queen, Suit::Spades),
            Card::new(Rank::Nine, Suit::Diamonds),
            Card::new(Rank::King, Suit::Clubs),
        ]);
        let trick = Trick::new();
        let mut policy = HeuristicPolicy::new();
        let mut picked = policy.choose_pass(&ctx(&hand, &trick, false)).to_vec();
        picked.sort_by_key(|c| c.value());
        assert_eq!(
            picked,
            vec![
                Card::new(Rank::Queen, Suit::Spades),
                Card::new(Rank::King, Suit::Clubs),
                Card::new(Rank::Ace, Suit::Hearts),
            ]
        );
    }

    #[test]
    fn equal_values_keep_hand_order() {
        let cards = [
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Diamonds),
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Ace, Suit::Hearts),
        ];
        assert_eq!(
            HeuristicPolicy::pass_selection(&cards),
            Some([cards[0], cards[1], cards[2]])
        );
        assert_eq!(HeuristicPolicy::pass_selection(&cards[..2]), None);
    }

    #[test]
    fn plays_lowest_card_of_the_lead_suit() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Two, Suit::Clubs),
            Card::new(Rank::Five, Suit::Spades),
            Card::new(Rank::Jack, Suit::Spades),
        ]);
        let mut trick = Trick::new();
        trick
            .play(Seat::South, Card::new(Rank::Nine, Suit::Spades))
            .unwrap();
        let mut policy = HeuristicPolicy::new();
        assert_eq!(
            policy.choose_play(&ctx(&hand, &trick, false)),
            Card::new(Rank::Five, Suit::Spades)
        );
    }

    #[test]
    fn avoids_leading_unbroken_hearts() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::Ten, Suit::Diamonds),
        ]);
        let trick = Trick::new();
        let mut policy = HeuristicPolicy::new();
        assert_eq!(
            policy.choose_play(&ctx(&hand, &trick, false)),
            Card::new(Rank::Ten, Suit::Diamonds)
        );
        assert_eq!(
            policy.choose_play(&ctx(&hand, &trick, true)),
            Card::new(Rank::Two, Suit::Hearts)
        );
    }

    #[test]
    fn random_positions_always_get_a_legal_card() {
        use peppa_core::model::deck::Deck;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x9e77a);
        let mut policy = HeuristicPolicy::new();
        for _ in 0..500 {
            let deck = Deck::shuffled(&mut rng);
            let size = rng.gen_range(1..=13);
            let hand = Hand::with_cards(deck.cards()[..size].to_vec());
            let mut trick = Trick::new();
            if rng.gen_bool(0.5) {
                trick.play(Seat::South, deck.cards()[size]).unwrap();
            }
            let hearts_broken = rng.gen_bool(0.5);
            let legal = rules::legal_plays(&hand, trick.lead_suit(), hearts_broken);
            let chosen = policy.choose_play(&ctx(&hand, &trick, hearts_broken));
            assert!(legal.contains(&chosen));
        }
    }

    #[test]
    fn lowest_prefers_the_first_of_equal_values() {
        let cards = [
            Card::new(Rank::Three, Suit::Diamonds),
            Card::new(Rank::Three, Suit::Clubs),
        ];
        assert_eq!(HeuristicPolicy::lowest(&cards), Some(cards[0]));
        assert_eq!(HeuristicPolicy::lowest(&[]), None);
    }
}
