use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use kkomantle_engine::embedding::{EmbeddingIndex, Word2VecIndex};
use kkomantle_engine::rank_cache::DailyRankCache;
use kkomantle_engine::{Config, GuessEngine};

/// Hangul syllable at the given offset, so synthetic words pass the
/// alphabetic candidate filter.
fn syllable(offset: usize) -> char {
    char::from_u32(0xAC00 + (offset % 2000) as u32).unwrap_or('가')
}

fn synthetic_index(words: usize, dims: usize) -> Word2VecIndex {
    let mut rng = SmallRng::seed_from_u64(7);
    let entries = (0..words)
        .map(|i| {
            let word = format!("{}{}", syllable(i / 2000 * 31 + i), syllable(i * 7 + 3));
            let vector = (0..dims).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
            (word, vector)
        })
        .collect();
    Word2VecIndex::from_vectors(entries).unwrap()
}

fn bench_rank_table_fill(c: &mut Criterion) {
    let index = synthetic_index(5_000, 50);
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let secret = index.words()[0].clone();

    c.bench_function("rank_table_fill_5k", |b| {
        b.iter(|| {
            let cache = DailyRankCache::new();
            black_box(cache.neighbors(date, &secret, &index, 1_000));
        })
    });
}

fn bench_guess_warm_cache(c: &mut Criterion) {
    let index = Arc::new(synthetic_index(5_000, 50));
    let config = Config {
        candidate_pool: 100,
        neighbor_horizon: 1_000,
        ..Config::default()
    };
    let guess = index.words()[42].clone();
    let engine = GuessEngine::new(Some(index), &config).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    // first call fills the daily table
    engine.guess(&guess, date).unwrap();

    c.bench_function("guess_warm_cache", |b| {
        b.iter(|| black_box(engine.guess(&guess, date).unwrap()))
    });
}

criterion_group!(benches, bench_rank_table_fill, bench_guess_warm_cache);
criterion_main!(benches);
