//! Microbenchmark that isolates the per-candidate scoring pipeline from
//! I/O and collection overhead.

use criterion::{Criterion, criterion_group, criterion_main};

use tern::{Algorithm, MatchConfig, SmithWatermanConfig, prepare, prepare_with};

/// Deterministic synthetic catalog mixing identifiers, paths and tickers
/// so every prefilter stage and both engines see work.
fn synthetic_catalog() -> Vec<String> {
    let verbs = ["get", "set", "fetch", "load", "store", "update", "delete", "find"];
    let nouns = ["User", "Account", "Order", "Session", "Token", "Profile", "Index", "Cache"];
    let suffixes = ["ById", "ByName", "Async", "Batch", "V2", ""];
    let mut lines = Vec::with_capacity(verbs.len() * nouns.len() * suffixes.len() * 3);
    for verb in verbs {
        for noun in nouns {
            for suffix in suffixes {
                lines.push(format!("{verb}{noun}{suffix}"));
                lines.push(format!("src/{verb}/{}{suffix}.rs", noun.to_lowercase()));
                lines.push(format!("{}_{}{suffix}", verb.to_uppercase(), noun.to_uppercase()));
            }
        }
    }
    lines
}

fn bench_score(c: &mut Criterion) {
    let lines = synthetic_catalog();

    c.bench_function("micro_edit_distance", |b| {
        let query = prepare("getUser");
        let mut buffer = tern::make_buffer();
        b.iter(|| {
            let mut count = 0u64;
            for line in &lines {
                if tern::score(line, &query, &mut buffer).is_some() {
                    count += 1;
                }
            }
            count
        });
    });

    c.bench_function("micro_edit_distance_short", |b| {
        let query = prepare("gu");
        let mut buffer = tern::make_buffer();
        b.iter(|| {
            let mut count = 0u64;
            for line in &lines {
                if tern::score(line, &query, &mut buffer).is_some() {
                    count += 1;
                }
            }
            count
        });
    });

    c.bench_function("micro_smith_waterman", |b| {
        let query = prepare_with(
            "getUser",
            MatchConfig::new(
                Algorithm::SmithWaterman(SmithWatermanConfig::default()),
                0.0,
            ),
        );
        let mut buffer = tern::make_buffer();
        b.iter(|| {
            let mut count = 0u64;
            for line in &lines {
                if tern::score(line, &query, &mut buffer).is_some() {
                    count += 1;
                }
            }
            count
        });
    });

    c.bench_function("micro_smith_waterman_split", |b| {
        let query = prepare_with(
            "get user",
            MatchConfig::new(
                Algorithm::SmithWaterman(SmithWatermanConfig::default()),
                0.0,
            ),
        );
        let mut buffer = tern::make_buffer();
        b.iter(|| {
            let mut count = 0u64;
            for line in &lines {
                if tern::score(line, &query, &mut buffer).is_some() {
                    count += 1;
                }
            }
            count
        });
    });

    c.bench_function("micro_top_matches", |b| {
        let query = prepare("getUser");
        b.iter(|| tern::top_matches(lines.iter(), &query, 10).len());
    });
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
