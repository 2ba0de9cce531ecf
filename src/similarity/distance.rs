use strsim::levenshtein;

/// Levenshtein distance between two canonical strings.
///
/// Inputs are expected to be canonicalized already; no Unicode handling here.
#[inline]
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}
