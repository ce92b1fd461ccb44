use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the 48 playing cards used in a game.
///
/// The deck is a standard deck without the tens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

/// The suit of a [card](Card).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    #[serde(rename = "♥")]
    Heart,
    #[serde(rename = "♦")]
    Diamond,
    #[serde(rename = "♣")]
    Club,
    #[serde(rename = "♠")]
    Spade,
}

/// The rank of a [card](Card). There is no ten.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

/// The color of a card, which also identifies the two players.
///
/// Red owns the hearts and diamonds and always moves first, Black owns the
/// clubs and spades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

pub const NUM_CARDS: usize = 48;

const NUM_RANKS: u8 = 12;

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];

    pub const fn color(self) -> Color {
        match self {
            Suit::Heart | Suit::Diamond => Color::Red,
            Suit::Club | Suit::Spade => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
            Suit::Spade => '♠',
        }
    }
}

impl Rank {
    pub const ALL: [Rank; 12] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// The face value, with the ace counting as 1 and J/Q/K as 11/12/13.
    pub const fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Court cards may slide over face-down cards.
    pub const fn is_court(self) -> bool {
        self.value() > 10
    }

    pub fn symbol(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

impl Color {
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

impl Card {
    pub const fn color(self) -> Color {
        self.suit.color()
    }

    /// A dense index in `0..48`, suit-major.
    pub const fn to_index(self) -> u8 {
        self.suit as u8 * NUM_RANKS + self.rank as u8
    }
}

/// Inverse of [`Card::to_index()`]. Panics for indices outside of `0..48`.
pub(crate) const fn card_from_index(idx: u8) -> Card {
    Card {
        suit: Suit::ALL[(idx / NUM_RANKS) as usize],
        rank: Rank::ALL[(idx % NUM_RANKS) as usize],
    }
}

/// All 48 cards, ordered by suit (♥ ♦ ♣ ♠) and then by rank.
pub static DECK: [Card; NUM_CARDS] = {
    let mut deck = [card_from_index(0); NUM_CARDS];
    let mut idx = 0;
    while idx < NUM_CARDS {
        deck[idx] = card_from_index(idx as u8);
        idx += 1;
    }
    deck
};

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// The error type for the [`FromStr`] instance of [`Card`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardFromStrErr {
    LessThanTwoChars,
    MoreThanTwoChars,
    InvalidRank,
    InvalidSuit,
}

impl std::error::Error for CardFromStrErr {}

impl std::fmt::Display for CardFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardFromStrErr::LessThanTwoChars => {
                write!(f, "Card code has fewer than two characters")
            }
            CardFromStrErr::MoreThanTwoChars => {
                write!(f, "Card code has more than two characters")
            }
            CardFromStrErr::InvalidRank => write!(f, "Card code starts with an unknown rank"),
            CardFromStrErr::InvalidSuit => write!(f, "Card code ends with an unknown suit"),
        }
    }
}

impl FromStr for Card {
    type Err = CardFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let rank_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        let suit_char = chars.next().ok_or(CardFromStrErr::LessThanTwoChars)?;
        if chars.next().is_some() {
            return Err(CardFromStrErr::MoreThanTwoChars);
        }
        let rank = Rank::ALL
            .into_iter()
            .find(|rank| rank.symbol() == rank_char)
            .ok_or(CardFromStrErr::InvalidRank)?;
        let suit = Suit::ALL
            .into_iter()
            .find(|suit| suit.symbol() == suit_char)
            .ok_or(CardFromStrErr::InvalidSuit)?;
        Ok(Card { rank, suit })
    }
}

/// Shorthand for creating cards from a two-character string.
///
/// The first character is the [rank](Rank), the second is the [suit](Suit)
/// as a unicode character (♥, ♦, ♣, or ♠).
///
/// This macro is just calling the [`FromStr`] instance of [`Card`].
/// ```
/// # use getstuck::{card, Card, Rank, Suit};
/// assert_eq!(
///     card!("Q♥"),
///     Card { rank: Rank::Queen, suit: Suit::Heart }
/// );
/// ```
#[macro_export]
macro_rules! card {
    ($rs:literal) => {
        <$crate::Card as std::str::FromStr>::from_str($rs)
            .expect("Invalid card code given to card! macro")
    };
}
// The import is for using the macro in other modules
// See https://stackoverflow.com/a/31749071/1726797
#[allow(unused_imports)]
pub(crate) use card;
