//! Policy section - minimum length and required character classes.

use std::fmt;

use super::CharClasses;

/// A named failure to meet the password policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TooShort { min_length: usize },
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSymbol,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooShort { min_length } => write!(f, "length<{min_length}"),
            Violation::MissingLowercase => f.write_str("missing-lowercase"),
            Violation::MissingUppercase => f.write_str("missing-uppercase"),
            Violation::MissingDigit => f.write_str("missing-digit"),
            Violation::MissingSymbol => f.write_str("missing-symbol"),
        }
    }
}

/// Lists every policy violation, length first, then classes in a fixed order.
pub fn policy_violations(password: &str, min_length: usize) -> Vec<Violation> {
    let classes = CharClasses::of(password);
    let mut violations = Vec::new();
    if password.chars().count() < min_length {
        violations.push(Violation::TooShort { min_length });
    }
    if !classes.lowercase {
        violations.push(Violation::MissingLowercase);
    }
    if !classes.uppercase {
        violations.push(Violation::MissingUppercase);
    }
    if !classes.digit {
        violations.push(Violation::MissingDigit);
    }
    if !classes.symbol {
        violations.push(Violation::MissingSymbol);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_too_short() {
        let violations = policy_violations("Short1!", 8);
        assert_eq!(violations, vec![Violation::TooShort { min_length: 8 }]);
        assert_eq!(violations[0].to_string(), "length<8");
    }

    #[test]
    fn test_policy_exactly_minimum() {
        assert!(policy_violations("Abcdef1!", 8).is_empty());
    }

    #[test]
    fn test_policy_empty_password_violates_everything() {
        let names: Vec<String> = policy_violations("", 12)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            names,
            vec![
                "length<12",
                "missing-lowercase",
                "missing-uppercase",
                "missing-digit",
                "missing-symbol"
            ]
        );
    }
}
