/// Result of a best-effort stage.
///
/// A stage that cannot process its input hands the original input back as
/// `Fallback` instead of failing, so the pipeline always keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Parsed(T),
    Fallback(String),
}

impl<T> Outcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }
}

impl Outcome<String> {
    /// Collapse to a string: the parsed value, or the untouched input.
    pub fn into_inner(self) -> String {
        match self {
            Outcome::Parsed(value) | Outcome::Fallback(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_inner() {
        assert_eq!(Outcome::Parsed("a".to_string()).into_inner(), "a");
        assert_eq!(Outcome::<String>::Fallback("b".to_string()).into_inner(), "b");
    }

    #[test]
    fn test_is_fallback() {
        assert!(!Outcome::Parsed(3).is_fallback());
        let fallback: Outcome<i32> = Outcome::Fallback("raw".to_string());
        assert!(fallback.is_fallback());
    }
}
