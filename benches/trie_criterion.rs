use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use opening_trainer::catalog::opening::Opening;
use opening_trainer::trie::move_key::BoardMove;
use opening_trainer::trie::openings_trie::{OpeningsTrie, SearchMode};

/// Synthetic catalog: every length-4 line over a fixed move alphabet, named
/// so searches partition it. Large enough that full-tree versus path-local
/// costs are visible.
fn synthetic_catalog() -> Vec<Opening> {
    let alphabet = ["e2e4", "d2d4", "c2c4", "g1f3"];
    let replies = ["e7e5", "d7d5", "c7c5", "g8f6"];

    let mut openings = Vec::new();
    for (i, first) in alphabet.iter().enumerate() {
        for (j, second) in replies.iter().enumerate() {
            for (k, third) in alphabet.iter().enumerate() {
                for (l, fourth) in replies.iter().enumerate() {
                    if i == k && l == j {
                        continue;
                    }
                    let name = format!("Synthetic Line {i}{j}{k}{l}");
                    let record = format!(
                        "Z{i}{j}\t{name}\tfen-{i}{j}{k}{l}\t{first} {second} {third} {fourth}"
                    );
                    openings.push(
                        Opening::from_tsv_record(&record, 1, true)
                            .expect("synthetic record should parse"),
                    );
                }
            }
        }
    }
    openings
}

fn bench_build(c: &mut Criterion) {
    let catalog = synthetic_catalog();
    c.bench_function("trie_build", |b| {
        b.iter(|| OpeningsTrie::build(black_box(catalog.clone())))
    });
}

fn bench_toggle_path_locality(c: &mut Criterion) {
    let mut trie = OpeningsTrie::build(synthetic_catalog());
    let identities: Vec<(String, String)> = trie
        .openings()
        .iter()
        .map(|o| (o.name.clone(), o.starting_position.clone()))
        .collect();

    c.bench_function("toggle_single_opening", |b| {
        let mut which = 0usize;
        b.iter(|| {
            let (name, fen) = &identities[which % identities.len()];
            which += 1;
            trie.toggle(black_box(name), black_box(fen))
                .expect("identity came from the catalog");
        })
    });

    c.bench_function("filter_by_search_full_tree", |b| {
        b.iter(|| {
            trie.filter_by_search(black_box("Synthetic Line 1"), SearchMode::StartsWith, None)
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let trie = OpeningsTrie::build(synthetic_catalog());
    let played = [BoardMove::from_coordinate("e2e4").expect("e2e4 should parse")];

    c.bench_function("possible_openings_after_one_move", |b| {
        b.iter(|| trie.possible_openings(black_box(&played)).len())
    });

    c.bench_function("next_move_seeded", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| {
            trie.next_move_with(black_box(&played), &mut rng)
                .expect("active continuations exist")
        })
    });
}

criterion_group!(
    trie_benches,
    bench_build,
    bench_toggle_path_locality,
    bench_queries
);
criterion_main!(trie_benches);
