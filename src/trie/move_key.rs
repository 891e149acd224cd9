//! Canonical move keys used as trie edge labels.
//!
//! A move is canonicalized to its origin and destination squares packed into
//! a single integer. Two moves compare equal exactly when both squares match;
//! a promotion choice is not part of the key because catalog lines that
//! promote all promote identically.

use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Board square index (`0..=63`).
pub type Square = u8;

/// Packed edge label: origin square in the low bits, destination above it.
pub type MoveKey = u16;

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const SQUARE_MASK: u16 = 0x3F;

/// One move as the board reports it: origin and destination squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMove {
    pub from: Square,
    pub to: Square,
}

#[inline]
pub fn encode_move(board_move: BoardMove) -> MoveKey {
    ((board_move.from as MoveKey) << FROM_SHIFT) | ((board_move.to as MoveKey) << TO_SHIFT)
}

#[inline]
pub fn decode_move(key: MoveKey) -> BoardMove {
    BoardMove {
        from: ((key >> FROM_SHIFT) & SQUARE_MASK) as Square,
        to: ((key >> TO_SHIFT) & SQUARE_MASK) as Square,
    }
}

impl BoardMove {
    /// Parse a coordinate move string (for example: "e2e4", "e7e8q").
    ///
    /// A trailing promotion character is accepted and discarded: the key space
    /// identifies moves by squares alone.
    pub fn from_coordinate(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
            return Err(format!("Invalid coordinate move: {text}"));
        }

        if text.len() == 5 {
            let promotion = text.as_bytes()[4].to_ascii_lowercase() as char;
            if !matches!(promotion, 'q' | 'r' | 'b' | 'n') {
                return Err(format!("Invalid promotion piece character: {promotion}"));
            }
        }

        let from = algebraic_to_square(&text[0..2])?;
        let to = algebraic_to_square(&text[2..4])?;
        Ok(BoardMove { from, to })
    }

    /// Render as a coordinate move string (for example: "e2e4").
    pub fn to_coordinate(&self) -> Result<String, String> {
        Ok(format!(
            "{}{}",
            square_to_algebraic(self.from)?,
            square_to_algebraic(self.to)?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_move, encode_move, BoardMove};

    #[test]
    fn round_trip_move_codec() {
        for from in 0..64u8 {
            for to in 0..64u8 {
                let board_move = BoardMove { from, to };
                assert_eq!(decode_move(encode_move(board_move)), board_move);
            }
        }
    }

    #[test]
    fn coordinate_parse_and_render() {
        let board_move = BoardMove::from_coordinate("e2e4").expect("e2e4 should parse");
        assert_eq!(board_move, BoardMove { from: 12, to: 28 });
        assert_eq!(
            board_move.to_coordinate().expect("squares are in range"),
            "e2e4"
        );
    }

    #[test]
    fn promotion_suffix_is_ignored_for_keying() {
        let plain = BoardMove::from_coordinate("e7e8").expect("e7e8 should parse");
        let promoting = BoardMove::from_coordinate("e7e8q").expect("e7e8q should parse");
        assert_eq!(encode_move(plain), encode_move(promoting));
        assert!(BoardMove::from_coordinate("e7e8x").is_err());
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(BoardMove::from_coordinate("e2").is_err());
        assert!(BoardMove::from_coordinate("e2e9").is_err());
        assert!(BoardMove::from_coordinate("z2e4").is_err());
    }
}
