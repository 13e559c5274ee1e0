/// Words eligible to become a daily secret.
///
/// Built once at startup from the head of the embedding vocabulary
/// (load order is frequency order in word2vec files) and immutable
/// afterwards. Empty when no embedding index could be loaded.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    words: Vec<String>,
}

impl CandidateSet {
    /// Build from the `pool_size` most frequent vocabulary entries,
    /// keeping only clean dictionary words: at least two characters and
    /// entirely alphabetic once embedding-internal boundary markers are
    /// stripped.
    pub fn from_vocabulary<'a, I>(vocab: I, pool_size: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let words = vocab
            .into_iter()
            .take(pool_size)
            .filter_map(|entry| {
                let word = strip_boundary_markers(entry);
                let eligible =
                    word.chars().count() >= 2 && word.chars().all(char::is_alphabetic);
                eligible.then(|| word.to_string())
            })
            .collect();
        Self { words }
    }

    /// Degraded mode: no vocabulary available
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Subword tokenizers mark word boundaries with `▁` or underscores;
/// those markers are not part of the word itself.
fn strip_boundary_markers(entry: &str) -> &str {
    entry.trim_matches(|c| c == '▁' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_short_and_non_alphabetic() {
        let vocab = ["사랑", "a", "b2", "hello", "과학", "12", "it's"];
        let set = CandidateSet::from_vocabulary(vocab, 10);
        assert_eq!(set.words(), &["사랑", "hello", "과학"]);
    }

    #[test]
    fn test_respects_pool_size() {
        let vocab = ["하나", "둘째", "셋째", "넷째"];
        let set = CandidateSet::from_vocabulary(vocab, 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.words(), &["하나", "둘째"]);
    }

    #[test]
    fn test_strips_boundary_markers() {
        let vocab = ["▁단어", "_test_", "__ab"];
        let set = CandidateSet::from_vocabulary(vocab, 10);
        assert_eq!(set.words(), &["단어", "test", "ab"]);
    }

    #[test]
    fn test_empty_is_degraded() {
        assert!(CandidateSet::empty().is_empty());
    }
}
