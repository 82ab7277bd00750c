//! Bounded approximate-match scoring.
//!
//! Scores are `1 - levenshtein / longest`, measured in Unicode scalar values
//! so that "jalapeño" and "jalapeno" differ by one edit, not two.

/// Levenshtein edit distance over `char`s.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Confidence in `[0, 1]` that `a` and `b` name the same thing.
///
/// Identical inputs score 1.0, including two empty strings.
///
/// # Examples
///
/// ```
/// use pantry_canon::similarity;
///
/// let score = similarity("garlc", "garlic");
/// assert!((score - 5.0 / 6.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let score = 1.0 - edit_distance(a, b) as f64 / longest as f64;
    score.clamp(0.0, 1.0)
}
