pub mod word2vec;

pub use word2vec::Word2VecIndex;

use crate::error::Result;

/// Read-only view over a precomputed word-embedding space.
///
/// Loaded once at startup and safe for unsynchronized concurrent reads;
/// nothing here mutates after construction.
pub trait EmbeddingIndex: Send + Sync {
    /// Whether the word exists in the loaded vocabulary
    fn contains(&self, word: &str) -> bool;

    /// Cosine similarity between two in-vocabulary words, range [-1, 1]
    fn similarity(&self, a: &str, b: &str) -> Result<f32>;

    /// Up to `k` nearest in-vocabulary neighbors of `word` by descending
    /// cosine similarity, excluding `word` itself.
    fn nearest(&self, word: &str, k: usize) -> Result<Vec<String>>;

    /// Vocabulary in load order (most frequent first)
    fn words(&self) -> &[String];

    fn len(&self) -> usize {
        self.words().len()
    }

    fn is_empty(&self) -> bool {
        self.words().is_empty()
    }
}
