//! Exact comparison with optional normalization.

/// Trim, collapse internal whitespace runs, and case-fold.
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 1.0 on equality, 0.0 otherwise.
pub fn score(a: &str, b: &str, normalized: bool) -> f64 {
    let equal = if normalized {
        normalize(a) == normalize(b)
    } else {
        a == b
    };
    if equal {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_score_one() {
        assert_eq!(score("alice@corp.io", "alice@corp.io", false), 1.0);
    }

    #[test]
    fn different_strings_score_zero() {
        assert_eq!(score("alice@corp.io", "bob@corp.io", false), 0.0);
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(score("  Alice  Smith ", "alice smith", true), 1.0);
        assert_eq!(score("  Alice  Smith ", "alice smith", false), 0.0);
    }
}
