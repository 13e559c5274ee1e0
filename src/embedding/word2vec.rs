use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::embedding::EmbeddingIndex;
use crate::error::{EngineError, Result};

/// In-memory embedding index over the word2vec text format.
///
/// Vectors are unit-normalized at load time, so cosine similarity
/// reduces to a dot product.
pub struct Word2VecIndex {
    words: Vec<String>,
    positions: HashMap<String, usize>,
    vectors: Vec<f32>,
    dims: usize,
}

impl Word2VecIndex {
    /// Load at most `limit` entries from a `.vec` file.
    ///
    /// The first line is the `"<count> <dims>"` header; files without one
    /// (GloVe-style) are accepted by treating the first line as data.
    pub fn load(path: impl AsRef<Path>, limit: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut words = Vec::new();
        let mut positions = HashMap::new();
        let mut vectors = Vec::new();
        let mut dims = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            if words.len() >= limit {
                break;
            }
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let values: Vec<f32> = parts.filter_map(|v| v.parse().ok()).collect();

            if line_no == 0 && values.len() == 1 && word.parse::<usize>().is_ok() {
                // header line: "<count> <dims>"
                continue;
            }
            if values.is_empty() {
                continue;
            }
            if dims == 0 {
                dims = values.len();
            } else if values.len() != dims {
                return Err(EngineError::Embedding(format!(
                    "line {}: expected {} dimensions, found {}",
                    line_no + 1,
                    dims,
                    values.len()
                )));
            }
            if positions.contains_key(word) {
                continue;
            }
            positions.insert(word.to_string(), words.len());
            words.push(word.to_string());
            vectors.extend(normalized(&values));
        }

        if words.is_empty() {
            return Err(EngineError::Embedding(format!(
                "no vectors loaded from {}",
                path.display()
            )));
        }

        info!(
            "Loaded {} vectors ({} dims) from {}",
            words.len(),
            dims,
            path.display()
        );

        Ok(Self {
            words,
            positions,
            vectors,
            dims,
        })
    }

    /// Build directly from (word, vector) pairs. Used by tests and tools
    /// that synthesize small embedding spaces.
    pub fn from_vectors(entries: Vec<(String, Vec<f32>)>) -> Result<Self> {
        let mut words = Vec::new();
        let mut positions = HashMap::new();
        let mut vectors = Vec::new();
        let mut dims = 0usize;

        for (word, values) in entries {
            if dims == 0 {
                dims = values.len();
            } else if values.len() != dims {
                return Err(EngineError::Embedding(format!(
                    "'{}': expected {} dimensions, found {}",
                    word,
                    dims,
                    values.len()
                )));
            }
            if positions.contains_key(&word) {
                continue;
            }
            positions.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend(normalized(&values));
        }

        if words.is_empty() {
            return Err(EngineError::Embedding("no vectors supplied".to_string()));
        }

        Ok(Self {
            words,
            positions,
            vectors,
            dims,
        })
    }

    fn vector(&self, position: usize) -> &[f32] {
        &self.vectors[position * self.dims..(position + 1) * self.dims]
    }

    fn position(&self, word: &str) -> Result<usize> {
        self.positions
            .get(word)
            .copied()
            .ok_or_else(|| EngineError::Embedding(format!("'{word}' not in vocabulary")))
    }
}

impl EmbeddingIndex for Word2VecIndex {
    fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let va = self.vector(self.position(a)?);
        let vb = self.vector(self.position(b)?);
        Ok(dot(va, vb))
    }

    fn nearest(&self, word: &str, k: usize) -> Result<Vec<String>> {
        let target = self.vector(self.position(word)?);

        let mut scored: Vec<(f32, usize)> = (0..self.words.len())
            .filter(|&i| self.words[i] != word)
            .map(|i| (dot(target, self.vector(i)), i))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, i)| self.words[i].clone())
            .collect())
    }

    fn words(&self) -> &[String] {
        &self.words
    }
}

fn normalized(values: &[f32]) -> Vec<f32> {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / norm).collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
