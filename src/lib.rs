//! Crate root module declarations for the Opening Trainer project.
//!
//! This file exposes all top-level subsystems (opening catalog, move-prefix
//! trie index, and utility helpers) so binaries, tests, and external tooling
//! can import stable module paths.

pub mod catalog {
    pub mod opening;
    pub mod tsv_loader;
}

pub mod trie {
    pub mod move_key;
    pub mod openings_trie;
    pub mod trie_node;
}

pub mod utils {
    pub mod algebraic;
}

pub mod errors;
