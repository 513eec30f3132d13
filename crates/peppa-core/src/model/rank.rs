use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Card rank. The discriminant is the card's playing value (2..=14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    #[serde(rename = "2")]
    Two = 2,
    #[serde(rename = "3")]
    Three = 3,
    #[serde(rename = "4")]
    Four = 4,
    #[serde(rename = "5")]
    Five = 5,
    #[serde(rename = "6")]
    Six = 6,
    #[serde(rename = "7")]
    Seven = 7,
    #[serde(rename = "8")]
    Eight = 8,
    #[serde(rename = "9")]
    Nine = 9,
    #[serde(rename = "10")]
    Ten = 10,
    #[serde(rename = "J")]
    Jack = 11,
    #[serde(rename = "Q")]
    Queen = 12,
    #[serde(rename = "K")]
    King = 13,
    #[serde(rename = "A")]
    Ace = 14,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            2..=14 => Some(Self::ORDERED[(value - 2) as usize]),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Rank::ORDERED
            .iter()
            .copied()
            .find(|rank| rank.label().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn from_value_maps() {
        assert_eq!(Rank::from_value(11), Some(Rank::Jack));
        assert_eq!(Rank::from_value(14), Some(Rank::Ace));
        assert_eq!(Rank::from_value(1), None);
        assert_eq!(Rank::from_value(15), None);
    }

    #[test]
    fn values_follow_court_order() {
        let values: Vec<u8> = Rank::ORDERED.iter().map(|r| r.value()).collect();
        assert_eq!(values, (2..=14).collect::<Vec<u8>>());
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!("q".parse::<Rank>(), Ok(Rank::Queen));
        assert_eq!("10".parse::<Rank>(), Ok(Rank::Ten));
        assert!("1".parse::<Rank>().is_err());
    }
}
