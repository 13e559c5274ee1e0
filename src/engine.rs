use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::{round2, CandidateSet, GuessOutcome, Rank};
use crate::daily;
use crate::embedding::EmbeddingIndex;
use crate::error::{EngineError, Result};
use crate::rank_cache::DailyRankCache;

/// Literal guess that discloses the secret, kept from the original
/// deployment as a developer backdoor. Only honored while
/// `Config::reveal_enabled` is set.
pub const REVEAL_TOKEN: &str = "!정답";

/// Orchestrates guess evaluation: validation short-circuits, then
/// similarity scoring and ranking against the daily secret.
pub struct GuessEngine {
    index: Option<Arc<dyn EmbeddingIndex>>,
    candidates: CandidateSet,
    rank_cache: DailyRankCache,
    pattern: Regex,
    max_guess_len: usize,
    neighbor_horizon: usize,
    reveal_enabled: bool,
}

impl GuessEngine {
    /// Build the engine from an optional embedding index. `None` puts
    /// the engine in degraded mode: guesses are accepted but score 0
    /// with no ranking.
    pub fn new(index: Option<Arc<dyn EmbeddingIndex>>, config: &Config) -> Result<Self> {
        let pattern = Regex::new(&config.guess_pattern)
            .map_err(|e| EngineError::Internal(format!("invalid guess pattern: {e}")))?;

        let candidates = match &index {
            Some(index) => {
                let set = CandidateSet::from_vocabulary(
                    index.words().iter().map(String::as_str),
                    config.candidate_pool,
                );
                info!(
                    "Candidate pool: {} of top {} vocabulary entries",
                    set.len(),
                    config.candidate_pool
                );
                set
            }
            None => {
                warn!("No embedding index loaded, running degraded");
                CandidateSet::empty()
            }
        };

        Ok(Self {
            index,
            candidates,
            rank_cache: DailyRankCache::new(),
            pattern,
            max_guess_len: config.max_guess_len,
            neighbor_horizon: config.neighbor_horizon,
            reveal_enabled: config.reveal_enabled,
        })
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// The secret word for a calendar date. Pure; see [`daily::secret_for`].
    pub fn secret_for(&self, date: NaiveDate) -> String {
        daily::secret_for(date, &self.candidates)
    }

    /// Evaluate a guess against today's secret (server-local calendar day).
    pub fn guess_today(&self, raw: &str) -> Result<GuessOutcome> {
        self.guess(raw, Local::now().date_naive())
    }

    /// Evaluate a guess against the secret of the given date.
    pub fn guess(&self, raw: &str, date: NaiveDate) -> Result<GuessOutcome> {
        let guess = raw.trim();

        if guess.is_empty() {
            return Err(EngineError::Validation("단어를 입력해주세요.".to_string()));
        }
        if guess.chars().count() > self.max_guess_len {
            return Err(EngineError::Validation(format!(
                "단어는 {}자 이하로 입력해주세요.",
                self.max_guess_len
            )));
        }

        let secret = self.secret_for(date);

        // Checked before the character-set test: the token itself would
        // never pass it.
        if self.reveal_enabled && guess == REVEAL_TOKEN {
            return Ok(GuessOutcome::fail(format!(
                "오늘의 정답은 '{secret}' 입니다."
            )));
        }

        if !self.pattern.is_match(guess) {
            return Err(EngineError::Validation(
                "단어는 한글, 영문, 숫자만 사용할 수 있습니다.".to_string(),
            ));
        }

        // Last-resort safety net: a panic in scoring must surface as a
        // generic server error, never kill the request task.
        match catch_unwind(AssertUnwindSafe(|| self.score(date, &secret, guess))) {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Scoring panicked for guess of {} chars", guess.chars().count());
                Err(EngineError::Internal(
                    "점수 계산 중 오류가 발생했습니다.".to_string(),
                ))
            }
        }
    }

    fn score(&self, date: NaiveDate, secret: &str, guess: &str) -> Result<GuessOutcome> {
        let Some(index) = &self.index else {
            return Ok(GuessOutcome::degraded());
        };

        if !index.contains(guess) {
            return Ok(GuessOutcome::fail("사전에 없는 단어입니다."));
        }

        let similarity = index.similarity(secret, guess)?;
        let score = round2(f64::from(similarity) * 100.0);

        if guess == secret {
            return Ok(GuessOutcome::correct(score));
        }

        let neighbors =
            self.rank_cache
                .neighbors(date, secret, index.as_ref(), self.neighbor_horizon);

        let rank = if neighbors.is_empty() {
            Rank::Unknown
        } else {
            match neighbors.iter().position(|word| word == guess) {
                // the secret itself occupies rank 1
                Some(position) => Rank::Ranked(position + 2),
                None => Rank::Beyond(self.neighbor_horizon),
            }
        };

        Ok(GuessOutcome::success(score, rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Classification;
    use crate::embedding::Word2VecIndex;

    fn test_config() -> Config {
        Config {
            candidate_pool: 1,
            neighbor_horizon: 3000,
            ..Config::default()
        }
    }

    /// Vocabulary whose single candidate-pool entry is "세포", so every
    /// date resolves to the same secret.
    fn test_index() -> Arc<dyn EmbeddingIndex> {
        Arc::new(
            Word2VecIndex::from_vectors(vec![
                ("세포".to_string(), vec![1.0, 0.0, 0.0]),
                ("조직".to_string(), vec![0.9, 0.1, 0.0]),
                ("단백질".to_string(), vec![0.8, 0.2, 0.0]),
                ("사랑".to_string(), vec![0.0, 1.0, 0.0]),
            ])
            .unwrap(),
        )
    }

    fn test_engine() -> GuessEngine {
        GuessEngine::new(Some(test_index()), &test_config()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_correct_guess() {
        let engine = test_engine();
        let outcome = engine.guess("세포", today()).unwrap();
        assert_eq!(outcome.result, Classification::Correct);
        assert_eq!(outcome.rank, Some(Rank::Ranked(1)));
        assert_eq!(outcome.score, Some(100.0));
    }

    #[test]
    fn test_ranked_guess() {
        let engine = test_engine();
        let outcome = engine.guess("조직", today()).unwrap();
        assert_eq!(outcome.result, Classification::Success);
        // "조직" is the nearest neighbor, and the secret holds rank 1
        assert_eq!(outcome.rank, Some(Rank::Ranked(2)));
    }

    #[test]
    fn test_beyond_horizon_guess() {
        let config = Config {
            neighbor_horizon: 2,
            ..test_config()
        };
        let engine = GuessEngine::new(Some(test_index()), &config).unwrap();
        let outcome = engine.guess("사랑", today()).unwrap();
        assert_eq!(outcome.result, Classification::Success);
        assert_eq!(outcome.rank, Some(Rank::Beyond(2)));
        assert!(outcome.score.is_some());
    }

    #[test]
    fn test_unknown_word_fails() {
        let engine = test_engine();
        let outcome = engine.guess("없는단어", today()).unwrap();
        assert_eq!(outcome.result, Classification::Fail);
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.rank, None);
    }

    #[test]
    fn test_empty_guess_is_validation_error() {
        let engine = test_engine();
        let err = engine.guess("   ", today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_overlong_guess_is_validation_error() {
        let engine = test_engine();
        let long = "가".repeat(31);
        let err = engine.guess(&long, today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_charset_violation_is_validation_error() {
        let engine = test_engine();
        let err = engine.guess("세포!", today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_reveal_token_discloses_secret() {
        let engine = test_engine();
        let outcome = engine.guess(REVEAL_TOKEN, today()).unwrap();
        assert_eq!(outcome.result, Classification::Fail);
        assert!(outcome.message.unwrap().contains("세포"));
    }

    #[test]
    fn test_reveal_token_respects_flag() {
        let config = Config {
            reveal_enabled: false,
            ..test_config()
        };
        let engine = GuessEngine::new(Some(test_index()), &config).unwrap();
        // with the flag off the token falls through to charset validation
        let err = engine.guess(REVEAL_TOKEN, today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_degraded_mode_keeps_serving() {
        let engine = GuessEngine::new(None, &test_config()).unwrap();
        let outcome = engine.guess("아무단어", today()).unwrap();
        assert_eq!(outcome.result, Classification::Success);
        assert_eq!(outcome.score, Some(0.0));
        assert_eq!(outcome.rank, Some(Rank::Unknown));
    }

    #[test]
    fn test_degraded_secret_is_fallback() {
        let engine = GuessEngine::new(None, &test_config()).unwrap();
        assert_eq!(engine.secret_for(today()), daily::FALLBACK_SECRET);
    }

    #[test]
    fn test_secret_deterministic_across_engines() {
        let first = test_engine().secret_for(today());
        let second = test_engine().secret_for(today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_guess_trims_whitespace() {
        let engine = test_engine();
        let outcome = engine.guess("  세포  ", today()).unwrap();
        assert_eq!(outcome.result, Classification::Correct);
    }
}
