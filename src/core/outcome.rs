use serde::ser::Serializer;
use serde::Serialize;

/// How a scored guess is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// The guess is today's secret word
    Correct,
    /// A valid, scored guess that is not the secret
    Success,
    /// A rejected guess (unknown word, reveal token)
    Fail,
}

/// Position of a guess relative to the secret's nearest-neighbor table.
///
/// Serialized the way the game client expects it: a plain integer for a
/// ranked guess, `"{horizon}+"` for anything past the cached table, and
/// the literal `"Unknown"` when no table is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    /// 1-based position; the secret itself is rank 1
    Ranked(usize),
    /// Worse than every entry in the cached table of the given size
    Beyond(usize),
    /// No ranking information available (degraded mode)
    Unknown,
}

impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Rank::Ranked(n) => serializer.serialize_u64(*n as u64),
            Rank::Beyond(horizon) => serializer.serialize_str(&format!("{horizon}+")),
            Rank::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

/// Outcome of evaluating a single guess
#[derive(Debug, Clone, Serialize)]
pub struct GuessOutcome {
    pub result: Classification,
    /// Similarity score on a 0-100 scale, two-decimal precision
    pub score: Option<f64>,
    pub rank: Option<Rank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GuessOutcome {
    /// The guess equals the secret
    pub fn correct(score: f64) -> Self {
        Self {
            result: Classification::Correct,
            score: Some(score),
            rank: Some(Rank::Ranked(1)),
            message: None,
        }
    }

    /// A valid scored guess that missed
    pub fn success(score: f64, rank: Rank) -> Self {
        Self {
            result: Classification::Success,
            score: Some(score),
            rank: Some(rank),
            message: None,
        }
    }

    /// A rejected guess with an explanation for the player
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            result: Classification::Fail,
            score: None,
            rank: None,
            message: Some(message.into()),
        }
    }

    /// Served while no embedding index is loaded; keeps the endpoint
    /// alive with a zero score and no ranking information.
    pub fn degraded() -> Self {
        Self {
            result: Classification::Success,
            score: Some(0.0),
            rank: Some(Rank::Unknown),
            message: None,
        }
    }
}

/// Round to two decimals, the precision the score is reported at
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_serialization() {
        assert_eq!(serde_json::to_value(Rank::Ranked(1)).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(Rank::Ranked(42)).unwrap(), json!(42));
        assert_eq!(
            serde_json::to_value(Rank::Beyond(3000)).unwrap(),
            json!("3000+")
        );
        assert_eq!(
            serde_json::to_value(Rank::Unknown).unwrap(),
            json!("Unknown")
        );
    }

    #[test]
    fn test_correct_outcome_shape() {
        let value = serde_json::to_value(GuessOutcome::correct(100.0)).unwrap();
        assert_eq!(value["result"], json!("correct"));
        assert_eq!(value["rank"], json!(1));
        assert_eq!(value["score"], json!(100.0));
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_fail_outcome_shape() {
        let value = serde_json::to_value(GuessOutcome::fail("사전에 없는 단어입니다.")).unwrap();
        assert_eq!(value["result"], json!("fail"));
        assert_eq!(value["score"], json!(null));
        assert_eq!(value["rank"], json!(null));
        assert_eq!(value["message"], json!("사전에 없는 단어입니다."));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(43.21499), 43.21);
        assert_eq!(round2(43.215), 43.22);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(-12.3456), -12.35);
    }
}
