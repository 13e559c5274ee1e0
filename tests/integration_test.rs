use std::sync::Arc;

use chrono::NaiveDate;
use kkomantle_engine::embedding::{EmbeddingIndex, Word2VecIndex};
use kkomantle_engine::leaderboard::{GameKind, LeaderboardStore, SqliteLeaderboard};
use kkomantle_engine::{Classification, Config, GuessEngine, Rank};

fn sample_index() -> Arc<dyn EmbeddingIndex> {
    Arc::new(
        Word2VecIndex::from_vectors(vec![
            ("세포".to_string(), vec![1.0, 0.0, 0.0]),
            ("조직".to_string(), vec![0.9, 0.1, 0.0]),
            ("단백질".to_string(), vec![0.8, 0.2, 0.0]),
            ("사랑".to_string(), vec![0.0, 1.0, 0.0]),
            ("바다".to_string(), vec![0.0, 0.0, 1.0]),
        ])
        .unwrap(),
    )
}

fn engine_with(config: Config) -> GuessEngine {
    let config = Config {
        candidate_pool: 1,
        ..config
    };
    GuessEngine::new(Some(sample_index()), &config).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

#[test]
fn test_full_guess_session() {
    let engine = engine_with(Config::default());

    // a warm-up miss, then a near miss, then the secret
    let miss = engine.guess("바다", day(1)).unwrap();
    assert_eq!(miss.result, Classification::Success);
    assert!(miss.score.unwrap() < 50.0);

    let near = engine.guess("조직", day(1)).unwrap();
    assert_eq!(near.result, Classification::Success);
    assert_eq!(near.rank, Some(Rank::Ranked(2)));
    assert!(near.score.unwrap() > miss.score.unwrap());

    let hit = engine.guess("세포", day(1)).unwrap();
    assert_eq!(hit.result, Classification::Correct);
    assert_eq!(hit.rank, Some(Rank::Ranked(1)));
    assert_eq!(hit.score, Some(100.0));
}

#[test]
fn test_secret_stable_across_engine_instances() {
    let first = engine_with(Config::default());
    let second = engine_with(Config::default());

    for d in 1..=10 {
        assert_eq!(first.secret_for(day(d)), second.secret_for(day(d)));
    }
}

#[test]
fn test_rank_beyond_cached_horizon() {
    let engine = engine_with(Config {
        neighbor_horizon: 2,
        ..Config::default()
    });

    // in vocabulary but past the two cached neighbors
    let outcome = engine.guess("바다", day(1)).unwrap();
    assert_eq!(outcome.result, Classification::Success);
    assert_eq!(outcome.rank, Some(Rank::Beyond(2)));
}

#[test]
fn test_repeat_guesses_are_consistent() {
    let engine = engine_with(Config::default());

    let first = engine.guess("조직", day(1)).unwrap();
    let second = engine.guess("조직", day(1)).unwrap();

    assert_eq!(first.score, second.score);
    assert_eq!(first.rank, second.rank);
}

#[tokio::test]
async fn test_leaderboard_end_to_end() {
    let store = SqliteLeaderboard::new(":memory:").await.unwrap();
    let today = chrono::Local::now().date_naive();

    store.submit(GameKind::Wordle, "첫째", 2).await.unwrap();
    store.submit(GameKind::Wordle, "둘째", 5).await.unwrap();
    store.submit(GameKind::Wordle, "셋째", 3).await.unwrap();

    let top = store.top_today(GameKind::Wordle, today).await.unwrap();
    let scores: Vec<i64> = top.iter().map(|entry| entry.score).collect();
    assert_eq!(scores, vec![2, 3, 5]);
}

#[test]
fn test_degraded_engine_still_answers() {
    let engine = GuessEngine::new(None, &Config::default()).unwrap();

    let outcome = engine.guess("아무거나", day(1)).unwrap();
    assert_eq!(outcome.result, Classification::Success);
    assert_eq!(outcome.score, Some(0.0));
    assert_eq!(outcome.rank, Some(Rank::Unknown));
}
