//! Set comparison of extracted tokens.

use std::collections::HashSet;

/// Lower-case a token and drop every non-word character.
///
/// `"1.500,00 €"` → `"150000"`, `"Art. 24"` → `"art24"`.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// True iff both lists hold the same set of normalized tokens.
///
/// Order and multiplicity are ignored; a single missing or added token fails.
pub fn equivalent<A, B>(a: &[A], b: &[B]) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    normalized_set(a) == normalized_set(b)
}

fn normalized_set<T: AsRef<str>>(tokens: &[T]) -> HashSet<String> {
    tokens.iter().map(|t| normalize_token(t.as_ref())).collect()
}
