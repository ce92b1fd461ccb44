use crate::cards::card_from_index;
use crate::PlacedCard;

const EMPTY_BITS: u8 = 0xff;
const FACE_DOWN_BIT: u8 = 0x40;
const CARD_MASK: u8 = 0x3f;

/// A single cell of the board packed into one byte.
///
/// Either the empty marker, or the [card index](crate::Card::to_index) plus a
/// face-down flag. These bytes double as the board part of search cache keys.
///
/// Note that its "mutating" methods return a new object instead of really mutating.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CompactCell {
    /// The low 6 bits are the card index, the next bit is set for a face-down
    /// card. All bits set means there is no card.
    bits: u8,
}

impl CompactCell {
    pub(crate) const EMPTY: Self = Self { bits: EMPTY_BITS };

    pub(crate) fn new(placed: PlacedCard) -> Self {
        let face_down = if placed.face_up { 0 } else { FACE_DOWN_BIT };
        Self {
            bits: placed.card.to_index() | face_down,
        }
    }

    pub(crate) fn is_empty(self) -> bool {
        self.bits == EMPTY_BITS
    }

    pub(crate) fn placed_card(self) -> Option<PlacedCard> {
        if self.is_empty() {
            None
        } else {
            Some(PlacedCard {
                card: card_from_index(self.bits & CARD_MASK),
                face_up: self.bits & FACE_DOWN_BIT == 0,
            })
        }
    }

    /// Has no effect on the empty cell.
    #[must_use] // Because users might expect this to be a mutating method
    pub(crate) fn turn_face_down(self) -> Self {
        if self.is_empty() {
            self
        } else {
            Self {
                bits: self.bits | FACE_DOWN_BIT,
            }
        }
    }

    pub(crate) fn bits(self) -> u8 {
        self.bits
    }
}
