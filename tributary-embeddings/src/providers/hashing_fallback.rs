//! Feature-hashing fallback provider.
//!
//! Deterministic dense vectors from hashed term frequencies. Not semantic,
//! but always available and good enough for lexical-overlap similarity.

use std::collections::HashMap;

use async_trait::async_trait;

use tributary_core::errors::TributaryResult;
use tributary_core::traits::IEmbeddingProvider;

pub struct HashingFallback {
    dimensions: usize,
}

impl HashingFallback {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// FNV-1a bucket for a term.
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        if self.dimensions == 0 {
            return vec;
        }
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }
        let total = tokens.len() as f32;
        for (term, count) in tf {
            // Longer terms carry more signal than short function words.
            let weight = 1.0 + (term.len() as f32).ln();
            vec[Self::bucket(term, self.dimensions)] += (count / total) * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

#[async_trait]
impl IEmbeddingProvider for HashingFallback {
    async fn embed(&self, text: &str) -> TributaryResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "feature-hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_text_returns_zero_vector() {
        let p = HashingFallback::new(128);
        let v = p.embed("").await.unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn output_is_normalized() {
        let p = HashingFallback::new(256);
        let v = p.embed("rust programming language systems").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[tokio::test]
    async fn deterministic() {
        let p = HashingFallback::new(256);
        assert_eq!(
            p.embed("deterministic test").await.unwrap(),
            p.embed("deterministic test").await.unwrap()
        );
    }

    #[tokio::test]
    async fn overlapping_texts_are_closer() {
        let p = HashingFallback::new(256);
        let a = p.embed("rust programming language").await.unwrap();
        let b = p.embed("rust programming systems").await.unwrap();
        let c = p.embed("cooking recipes pasta").await.unwrap();
        let cos_ab: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let cos_ac: f32 = a.iter().zip(&c).map(|(x, y)| x * y).sum();
        assert!(cos_ab > cos_ac);
    }
}
