//! Candidate generator - expands subject tokens into personalized weak passwords.
//!
//! Expansion runs in tiers so that, when `max_candidates` binds, the most
//! likely patterns survive:
//!
//! 1. bare variants (case forms and leet substitutions)
//! 2. variants with a year appended or prepended
//! 3. variants with a symbol appended or prepended
//! 4. ordered pairs of two distinct variants, from a capped prefix only
//!
//! Every tier feeds the same bounded [`CandidateSet`].

use chrono::Datelike;
use std::collections::{BTreeSet, HashSet};

use crate::config::ConfigError;

/// Leet substitutions, applied one pattern at a time.
pub const LEET_MAP: &[(char, &[char])] = &[
    ('a', &['4', '@']),
    ('e', &['3']),
    ('i', &['1', '!']),
    ('o', &['0']),
    ('s', &['5', '$']),
    ('t', &['7']),
];

pub const SYMBOLS: [char; 8] = ['!', '@', '#', '$', '%', '&', '*', '?'];

/// Validated length and count bounds for candidate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateLimits {
    min_length: usize,
    max_length: usize,
    max_candidates: usize,
}

impl CandidateLimits {
    /// # Errors
    ///
    /// Fails unless `max_length >= min_length >= 1` and `max_candidates >= 1`.
    pub fn new(
        min_length: usize,
        max_length: usize,
        max_candidates: usize,
    ) -> Result<Self, ConfigError> {
        if min_length < 1 {
            return Err(ConfigError::MinLengthTooSmall);
        }
        if max_length < min_length {
            return Err(ConfigError::InvertedLengthBounds {
                min: min_length,
                max: max_length,
            });
        }
        if max_candidates < 1 {
            return Err(ConfigError::NoCandidates);
        }
        Ok(Self {
            min_length,
            max_length,
            max_candidates,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}

/// The time-dependent input of generation, made explicit for reproducibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearContext {
    pub current_year: i32,
    pub birth_year: Option<i32>,
}

impl YearContext {
    pub fn new(current_year: i32, birth_year: Option<i32>) -> Self {
        Self {
            current_year,
            birth_year,
        }
    }

    /// Uses the current UTC year.
    pub fn now(birth_year: Option<i32>) -> Self {
        Self::new(chrono::Utc::now().year(), birth_year)
    }

    /// Full and two-digit forms of the current and birth years, deduplicated.
    fn affixes(&self) -> Vec<String> {
        let mut affixes = Vec::with_capacity(4);
        for year in std::iter::once(self.current_year).chain(self.birth_year) {
            let full = year.to_string();
            let short = full[full.len().saturating_sub(2)..].to_string();
            for affix in [full, short] {
                if !affixes.contains(&affix) {
                    affixes.push(affix);
                }
            }
        }
        affixes
    }
}

/// Size of the variant prefix used for pairing.
///
/// Pairing is quadratic in this number, so it is clamped to `[60, 220]`.
pub fn pair_source_limit(max_candidates: usize) -> usize {
    (max_candidates / 180).max(60).min(220)
}

/// Deduplicating candidate accumulator with a hard size ceiling.
#[derive(Debug)]
pub struct CandidateSet {
    limits: CandidateLimits,
    items: HashSet<String>,
}

impl CandidateSet {
    pub fn new(limits: CandidateLimits) -> Self {
        Self {
            limits,
            items: HashSet::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limits.max_candidates
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `value` when it fits the length bounds and the set is not full.
    /// Returns whether the set grew.
    pub fn offer(&mut self, value: String) -> bool {
        if self.is_full() {
            return false;
        }
        let len = char_len(&value);
        if len < self.limits.min_length || len > self.limits.max_length {
            return false;
        }
        self.items.insert(value)
    }

    pub fn into_sorted(self) -> Vec<String> {
        sort_passwords(self.items)
    }
}

/// Sorts by length, then lowercase form, then raw form.
pub fn sort_passwords<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut sorted: Vec<String> = values.into_iter().collect();
    sorted.sort_by_cached_key(|word| (char_len(word), word.to_lowercase(), word.clone()));
    sorted
}

/// Case forms and single-pattern leet substitutions of one token.
pub fn expand_token(token: &str) -> BTreeSet<String> {
    let base = token.trim();
    if base.is_empty() {
        return BTreeSet::new();
    }

    let lowered = base.to_lowercase();
    let mut variants = BTreeSet::new();
    variants.insert(base.to_string());
    variants.insert(capitalize(&lowered));
    variants.insert(lowered.to_uppercase());

    for (source, replacements) in LEET_MAP {
        for replacement in *replacements {
            variants.insert(lowered.replace(*source, &replacement.to_string()));
        }
    }
    variants.insert(lowered);
    variants
}

/// Generates candidates for the current UTC year.
pub fn generate_candidates<I, S>(
    tokens: I,
    limits: &CandidateLimits,
    birth_year: Option<i32>,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    generate_candidates_at(tokens, limits, &YearContext::now(birth_year))
}

/// Generates candidates for an explicit year context.
///
/// Pure: identical inputs always produce the identical sorted output, of at
/// most `max_candidates` entries, each within the length bounds.
pub fn generate_candidates_at<I, S>(
    tokens: I,
    limits: &CandidateLimits,
    years: &YearContext,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let token_cap = limits.max_length * 2;
    let mut expanded = BTreeSet::new();
    for token in tokens {
        let token = token.as_ref();
        let len = char_len(token);
        if len == 0 || len > token_cap {
            continue;
        }
        let truncated: String = token.chars().take(token_cap).collect();
        expanded.extend(expand_token(&truncated));
    }

    let variants: Vec<String> = expanded
        .into_iter()
        .filter(|variant| char_len(variant) <= limits.max_length + 4)
        .collect();

    let mut candidates = CandidateSet::new(*limits);

    for variant in &variants {
        if candidates.is_full() {
            return candidates.into_sorted();
        }
        candidates.offer(variant.clone());
    }

    let affixes = years.affixes();
    for variant in &variants {
        if candidates.is_full() {
            return candidates.into_sorted();
        }
        for year in &affixes {
            candidates.offer(format!("{variant}{year}"));
            candidates.offer(format!("{year}{variant}"));
        }
    }

    for variant in &variants {
        if candidates.is_full() {
            return candidates.into_sorted();
        }
        for symbol in SYMBOLS {
            candidates.offer(format!("{variant}{symbol}"));
            candidates.offer(format!("{symbol}{variant}"));
        }
    }

    let sources: Vec<&String> = variants
        .iter()
        .take(pair_source_limit(limits.max_candidates))
        .filter(|variant| char_len(variant) < limits.max_length)
        .collect();

    'pairs: for left in &sources {
        for right in &sources {
            if candidates.is_full() {
                break 'pairs;
            }
            if left != right {
                candidates.offer(format!("{left}{right}"));
            }
        }
    }

    candidates.into_sorted()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn capitalize(lowered: &str) -> String {
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
