//! The opening catalog entity.
//!
//! One named line from the reference catalog: a fixed move sequence from a
//! starting position plus the user-facing `enabled` flag. Records are parsed
//! from lichess-style tab-separated rows: eco code, name, starting FEN, and
//! a space-separated coordinate move list.

use crate::errors::OpeningsError;
use crate::trie::move_key::{encode_move, BoardMove, MoveKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    /// Display label. Not unique on its own; see [`Opening::is_same_opening`].
    pub name: String,

    /// Catalog classification code (ECO).
    pub eco_code: String,

    /// Position descriptor from the catalog record. Opaque to the index,
    /// which only uses it as part of the identity key.
    pub starting_position: String,

    /// Encoded move sequence from the initial position. Never empty.
    pub move_sequence: Vec<MoveKey>,

    /// Whether this line currently participates in validation and selection.
    pub enabled: bool,
}

impl Opening {
    /// Parse one tab-separated catalog record.
    ///
    /// `line_number` is 1-based and only used for error reporting; `enabled`
    /// is the caller's load-time activation policy.
    pub fn from_tsv_record(
        record: &str,
        line_number: usize,
        enabled: bool,
    ) -> Result<Self, OpeningsError> {
        let malformed = |reason: String| OpeningsError::MalformedRecord {
            line_number,
            record: record.to_owned(),
            reason,
        };

        let fields: Vec<&str> = record.split('\t').collect();
        if fields.len() != 4 {
            return Err(malformed(format!(
                "expected 4 tab-separated fields, found {}",
                fields.len()
            )));
        }

        let eco_code = fields[0].trim();
        let name = fields[1].trim();
        let starting_position = fields[2].trim();

        if name.is_empty() {
            return Err(malformed("empty opening name".to_owned()));
        }

        let mut move_sequence = Vec::new();
        for token in fields[3].split_whitespace() {
            let board_move = BoardMove::from_coordinate(token)
                .map_err(|reason| malformed(format!("move '{token}': {reason}")))?;
            move_sequence.push(encode_move(board_move));
        }

        if move_sequence.is_empty() {
            return Err(malformed("record has no moves".to_owned()));
        }

        Ok(Self {
            name: name.to_owned(),
            eco_code: eco_code.to_owned(),
            starting_position: starting_position.to_owned(),
            move_sequence,
            enabled,
        })
    }

    /// Identity check. Two records describe the same opening only when both
    /// the name and the starting position match; names alone repeat across
    /// transpositions.
    pub fn is_same_opening(&self, name: &str, starting_position: &str) -> bool {
        self.name == name && self.starting_position == starting_position
    }
}

#[cfg(test)]
mod tests {
    use super::Opening;
    use crate::errors::OpeningsError;

    #[test]
    fn parses_a_well_formed_record() {
        let opening = Opening::from_tsv_record(
            "B10\tCaro-Kann Defense\trnbqkbnr/pp1ppppp/2p5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2\te2e4 c7c6",
            1,
            true,
        )
        .expect("record should parse");

        assert_eq!(opening.eco_code, "B10");
        assert_eq!(opening.name, "Caro-Kann Defense");
        assert_eq!(opening.move_sequence.len(), 2);
        assert!(opening.enabled);
    }

    #[test]
    fn rejects_wrong_field_count_with_line_context() {
        let err = Opening::from_tsv_record("B10\tCaro-Kann Defense\te2e4 c7c6", 7, true)
            .expect_err("three fields should be rejected");
        match err {
            OpeningsError::MalformedRecord { line_number, .. } => assert_eq!(line_number, 7),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_move_token_and_empty_sequence() {
        assert!(Opening::from_tsv_record("C20\tKing's Pawn\tfen\te2e4 e7x5", 1, true).is_err());
        assert!(Opening::from_tsv_record("C20\tKing's Pawn\tfen\t ", 1, true).is_err());
    }

    #[test]
    fn identity_requires_name_and_position() {
        let opening = Opening::from_tsv_record("C20\tKing's Pawn\tsome-fen\te2e4", 1, true)
            .expect("record should parse");
        assert!(opening.is_same_opening("King's Pawn", "some-fen"));
        assert!(!opening.is_same_opening("King's Pawn", "other-fen"));
        assert!(!opening.is_same_opening("Other", "some-fen"));
    }
}
