use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Spades = 2,
    Hearts = 3,
}

impl Suit {
    /// Deck construction order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Clubs),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Spades),
            3 => Some(Suit::Hearts),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_heart(self) -> bool {
        matches!(self, Suit::Hearts)
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// Lower-case name used inside card ids and on the advisory wire.
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Spades => "S",
            Suit::Hearts => "H",
        };
        f.write_str(symbol)
    }
}

impl FromStr for Suit {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clubs" | "c" => Ok(Suit::Clubs),
            "diamonds" | "d" => Ok(Suit::Diamonds),
            "spades" | "s" => Ok(Suit::Spades),
            "hearts" | "h" => Ok(Suit::Hearts),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Clubs.to_string(), "C");
        assert_eq!(Suit::Hearts.to_string(), "H");
    }

    #[test]
    fn names_parse_back() {
        for suit in Suit::ALL {
            assert_eq!(suit.name().parse::<Suit>(), Ok(suit));
        }
        assert!("stars".parse::<Suit>().is_err());
    }

    #[test]
    fn only_hearts_and_diamonds_are_red() {
        let red: Vec<_> = Suit::ALL.into_iter().filter(|s| s.is_red()).collect();
        assert_eq!(red, vec![Suit::Diamonds, Suit::Hearts]);
    }
}
