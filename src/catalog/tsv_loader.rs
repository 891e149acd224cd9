//! Catalog loading from tab-separated opening files.
//!
//! This module can load opening lines from a lichess-style tab-separated
//! export (eco, name, fen, coordinate moves) from disk or from the small
//! embedded default table, producing validated `Opening` values for the
//! index to build from.

use std::fs;
use std::path::Path;

use crate::catalog::opening::Opening;
use crate::errors::OpeningsError;

/// Load the catalog from `catalog/openings.tsv` when present, otherwise fall
/// back to the small embedded default table.
///
/// A candidate file that exists but fails to parse is fatal: the embedded
/// table never silently replaces a catalog the user put on disk.
///
/// `default_enabled` is the load-time activation policy applied to every
/// record; both all-enabled and all-disabled starting states are valid.
pub fn load_default(default_enabled: bool) -> Result<Vec<Opening>, OpeningsError> {
    let candidates = ["catalog/openings.tsv", "catalog/eco_openings.tsv"];
    load_first_present(&candidates, default_enabled)
}

fn load_first_present(
    candidates: &[&str],
    default_enabled: bool,
) -> Result<Vec<Opening>, OpeningsError> {
    for path in candidates {
        if Path::new(path).exists() {
            return load_tsv_path(path, default_enabled);
        }
    }

    load_tsv_str(include_str!("data/openings_minimal.tsv"), default_enabled)
}

pub fn load_tsv_path(path: &str, default_enabled: bool) -> Result<Vec<Opening>, OpeningsError> {
    let data = fs::read_to_string(path).map_err(|e| OpeningsError::CatalogUnreadable {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    load_tsv_str(&data, default_enabled)
}

/// Parse every record of a tab-separated catalog. The first malformed record
/// aborts the load; there is no partial catalog.
pub fn load_tsv_str(tsv: &str, default_enabled: bool) -> Result<Vec<Opening>, OpeningsError> {
    let mut openings = Vec::new();

    for (index, line) in tsv.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        openings.push(Opening::from_tsv_record(line, index + 1, default_enabled)?);
    }

    Ok(openings)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_default, load_first_present, load_tsv_str};
    use crate::errors::OpeningsError;

    #[test]
    fn embedded_default_table_parses() {
        let openings = load_default(true).expect("embedded catalog should parse");
        assert!(!openings.is_empty());
        assert!(openings.iter().all(|o| o.enabled));
        assert!(openings.iter().all(|o| !o.move_sequence.is_empty()));
    }

    #[test]
    fn load_policy_is_applied_to_every_record() {
        let tsv = "C20\tKing's Pawn Game\tfen-a\te2e4 e7e5\nB20\tSicilian Defense\tfen-b\te2e4 c7c5\n";
        let openings = load_tsv_str(tsv, false).expect("catalog should parse");
        assert_eq!(openings.len(), 2);
        assert!(openings.iter().all(|o| !o.enabled));
    }

    #[test]
    fn blank_lines_are_skipped_but_line_numbers_are_preserved() {
        let tsv = "C20\tKing's Pawn Game\tfen-a\te2e4 e7e5\n\nbad-record\n";
        let err = load_tsv_str(tsv, true).expect_err("bad record should abort the load");
        match err {
            OpeningsError::MalformedRecord { line_number, .. } => assert_eq!(line_number, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn a_present_but_malformed_catalog_file_is_fatal() {
        let path = std::env::temp_dir().join("opening_trainer_malformed_catalog.tsv");
        fs::write(&path, "this row has no tabs at all\n").expect("temp file should be writable");
        let path_str = path.to_str().expect("temp path is UTF-8");

        let err = load_first_present(&[path_str], true)
            .expect_err("a malformed on-disk catalog must not fall back to the embedded table");
        assert!(matches!(err, OpeningsError::MalformedRecord { .. }));

        fs::remove_file(&path).expect("temp file should be removable");
    }

    #[test]
    fn missing_candidates_fall_back_to_the_embedded_table() {
        let openings = load_first_present(&["catalog/does-not-exist.tsv"], true)
            .expect("embedded catalog should parse");
        assert!(!openings.is_empty());
    }
}
