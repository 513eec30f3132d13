use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Points deducted from a trick holding the queen of spades.
pub const QUEEN_OF_SPADES_PENALTY: i32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    pub const fn id(self) -> CardId {
        CardId((self.suit as u8) * 13 + (self.rank.value() - 2))
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub const fn is_penalty(self) -> bool {
        self.suit.is_heart() || self.is_queen_of_spades()
    }

    /// Points this card takes away from whoever wins the trick holding it.
    /// Hearts cost their own value, the queen of spades a flat 26.
    pub const fn penalty(self) -> i32 {
        if self.is_queen_of_spades() {
            QUEEN_OF_SPADES_PENALTY
        } else if self.suit.is_heart() {
            self.rank.value() as i32
        } else {
            0
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Identity of a card inside a deck, rendered as `"<rank>-<suit>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u8);

impl CardId {
    pub fn card(self) -> Card {
        let suit = Suit::from_index((self.0 / 13) as usize).unwrap_or(Suit::Clubs);
        let rank = Rank::from_value(self.0 % 13 + 2).unwrap_or(Rank::Two);
        Card::new(rank, suit)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<Card> for CardId {
    fn from(card: Card) -> Self {
        card.id()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.card();
        write!(f, "{}-{}", card.rank.label(), card.suit.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardIdError(pub String);

impl fmt::Display for ParseCardIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card id '{}'", self.0)
    }
}

impl std::error::Error for ParseCardIdError {}

impl FromStr for CardId {
    type Err = ParseCardIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (rank, suit) = trimmed
            .split_once('-')
            .ok_or_else(|| ParseCardIdError(trimmed.to_string()))?;
        let rank = rank
            .parse::<Rank>()
            .map_err(|_| ParseCardIdError(trimmed.to_string()))?;
        let suit = suit
            .parse::<Suit>()
            .map_err(|_| ParseCardIdError(trimmed.to_string()))?;
        Ok(Card::new(rank, suit).id())
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
