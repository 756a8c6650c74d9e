//! Best-effort coercion of raw label tokens.
//!
//! A label line may contain placeholders for positions that carry no
//! annotation. Those never fail the line: any token that is not an integer
//! literal becomes [`NEUTRAL_LABEL`].

/// Value given to labels that cannot be parsed.
pub const NEUTRAL_LABEL: i64 = 0;

/// Parses `raw` as an integer, surrounding whitespace ignored, falling back to
/// [`NEUTRAL_LABEL`].
pub fn coerce(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(NEUTRAL_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_parse() {
        assert_eq!(coerce("3"), 3);
        assert_eq!(coerce("-1"), -1);
        assert_eq!(coerce("+2"), 2);
        assert_eq!(coerce(" 4\n"), 4);
    }

    #[test]
    fn placeholders_default() {
        assert_eq!(coerce("NONE"), 0);
        assert_eq!(coerce(""), 0);
        assert_eq!(coerce("   "), 0);
        assert_eq!(coerce("1.5"), 0);
        assert_eq!(coerce("99999999999999999999999"), 0);
    }
}
