//! Character variety - class detection and entropy estimate.

/// Which character classes a password draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub symbol: bool,
}

impl CharClasses {
    pub fn of(password: &str) -> Self {
        Self {
            lowercase: password.chars().any(char::is_lowercase),
            uppercase: password.chars().any(char::is_uppercase),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            symbol: password.chars().any(|c| !c.is_alphanumeric()),
        }
    }

    /// Number of classes present, in `0..=4`.
    pub fn count(&self) -> usize {
        [self.lowercase, self.uppercase, self.digit, self.symbol]
            .iter()
            .filter(|&&present| present)
            .count()
    }

    /// Size of the alphabet an attacker would brute-force.
    pub fn pool_size(&self) -> u32 {
        let mut pool = 0;
        if self.lowercase {
            pool += 26;
        }
        if self.uppercase {
            pool += 26;
        }
        if self.digit {
            pool += 10;
        }
        if self.symbol {
            pool += 33;
        }
        pool
    }
}

/// `length × log2(pool_size)`; zero for an empty password or empty pool.
pub fn estimate_entropy_bits(password: &str) -> f64 {
    let pool = CharClasses::of(password).pool_size();
    let length = password.chars().count();
    if pool == 0 || length == 0 {
        return 0.0;
    }
    length as f64 * f64::from(pool).log2()
}
