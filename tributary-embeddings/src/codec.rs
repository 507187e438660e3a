//! Text form of a stored vector: `[a,b,...]`, also accepting `(a,b,...)`
//! and arbitrary whitespace.

use tributary_core::errors::{EmbeddingError, TributaryResult};

/// Render a vector as `[a,b,...]`. `f32`'s `Display` is shortest
/// round-trip, so [`parse_vector`] returns the exact same values.
pub fn format_vector(vector: &[f32]) -> String {
    let mut out = String::with_capacity(vector.len() * 10 + 2);
    out.push('[');
    for (i, v) in vector.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

/// Parse a stored vector. Fails on a bad number, a non-finite value, an
/// empty vector, or (when `expected_dims` is given) a length mismatch.
pub fn parse_vector(text: &str, expected_dims: Option<usize>) -> TributaryResult<Vec<f32>> {
    let corrupt = |reason: String| EmbeddingError::CorruptCacheEntry {
        hash: String::new(),
        reason,
    };

    let trimmed = text.trim();
    let inner = strip_delimiters(trimmed, '[', ']')
        .or_else(|| strip_delimiters(trimmed, '(', ')'))
        .unwrap_or(trimmed);

    let mut vector = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(corrupt("empty component".to_string()).into());
        }
        let value: f32 = part
            .parse()
            .map_err(|_| corrupt(format!("not a number: {part:?}")))?;
        if !value.is_finite() {
            return Err(corrupt(format!("non-finite component: {part}")).into());
        }
        vector.push(value);
    }

    if let Some(expected) = expected_dims {
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
    }
    Ok(vector)
}

fn strip_delimiters(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_and_whitespace() {
        assert_eq!(
            parse_vector(" [ 0.5, -1 ,2e-3 ] ", None).unwrap(),
            vec![0.5, -1.0, 0.002]
        );
    }

    #[test]
    fn parentheses() {
        assert_eq!(parse_vector("(1,2,3)", Some(3)).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn bare_list() {
        assert_eq!(parse_vector("1,2", None).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn formatted_vector_reads_back_exactly() {
        let v = vec![0.1f32, -0.333_333_34, 1e-7, 12345.678];
        assert_eq!(parse_vector(&format_vector(&v), Some(4)).unwrap(), v);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_vector("[1,abc]", None).is_err());
        assert!(parse_vector("[]", None).is_err());
        assert!(parse_vector("", None).is_err());
        assert!(parse_vector("[1,,2]", None).is_err());
        assert!(parse_vector("[1,NaN]", None).is_err());
        assert!(parse_vector("[1,inf]", None).is_err());
        assert!(parse_vector("[1,2)", None).is_err());
    }

    #[test]
    fn rejects_wrong_dimensions() {
        assert!(parse_vector("[1,2]", Some(3)).is_err());
    }
}
