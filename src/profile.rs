//! Subject profile: the biographical context an audit is seeded from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const BIRTH_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub name: String,
    pub aliases: Vec<String>,
    pub keywords: Vec<String>,
    pub favorite_numbers: Vec<String>,
    pub birth_year: Option<i32>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub email_hint: Option<String>,
    pub phone_hint: Option<String>,
    pub mfa_enabled: Option<bool>,
    pub password_manager_used: Option<bool>,
    pub last_rotation_days: Option<i64>,
    pub risk_notes: Vec<String>,
}

/// Outcome of [`SubjectProfile::validate`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProfileReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl SubjectProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Every raw token this profile contributes to candidate seeding.
    ///
    /// Tokens are trimmed but keep their original case; lowercasing and
    /// length filtering happen in [`crate::tokens::normalize_tokens`].
    pub fn all_tokens(&self) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();

        let seeds = std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .chain(self.keywords.iter().map(String::as_str))
            .chain(self.favorite_numbers.iter().map(String::as_str))
            .chain(self.organization.as_deref())
            .chain(self.role.as_deref())
            .chain(self.risk_notes.iter().map(String::as_str));

        for value in seeds {
            let token = value.trim();
            if !token.is_empty() {
                tokens.insert(token.to_string());
            }
        }

        if let Some(year) = self.birth_year {
            let full = year.to_string();
            tokens.insert(two_digit(&full).to_string());
            tokens.insert(full);
        }

        if let Some(hint) = &self.email_hint {
            let hint = hint.trim().to_lowercase();
            match hint.split_once('@') {
                Some((local, domain)) => {
                    if !local.is_empty() {
                        tokens.insert(local.to_string());
                    }
                    tokens.extend(
                        domain
                            .split('.')
                            .filter(|part| !part.is_empty())
                            .map(str::to_string),
                    );
                }
                None if !hint.is_empty() => {
                    tokens.insert(hint);
                }
                None => {}
            }
        }

        if let Some(phone) = &self.phone_hint {
            let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
            if digits.len() >= 4 {
                tokens.insert(digits[digits.len() - 4..].iter().collect());
            }
        }

        tokens
    }

    /// Collapses whitespace, caps field lengths and drops blank list entries.
    pub fn sanitize(mut self) -> Self {
        self.name = normalize_text(&self.name, 80).unwrap_or_else(|| "unknown-subject".to_string());
        self.organization = self.organization.and_then(|v| normalize_text(&v, 80));
        self.role = self.role.and_then(|v| normalize_text(&v, 80));
        self.email_hint = self.email_hint.and_then(|v| normalize_text(&v, 120));
        self.phone_hint = self.phone_hint.and_then(|v| normalize_text(&v, 32));
        self.aliases = sanitize_list(self.aliases, 64);
        self.keywords = sanitize_list(self.keywords, 64);
        self.favorite_numbers = sanitize_list(self.favorite_numbers, 24);
        self.risk_notes = sanitize_list(self.risk_notes, 80);
        self
    }

    pub fn validate(&self) -> ProfileReport {
        let mut report = ProfileReport::default();

        if self.name.trim().is_empty() {
            report.errors.push("subject name is required".to_string());
        }

        if let Some(email) = &self.email_hint {
            if !looks_like_email(email) {
                report.errors.push("email hint format is invalid".to_string());
            }
        }

        if let Some(phone) = &self.phone_hint {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if !(7..=15).contains(&digits) {
                report.errors.push("phone hint should contain 7-15 digits".to_string());
            }
        }

        if let Some(year) = self.birth_year {
            if !BIRTH_YEAR_RANGE.contains(&year) {
                report.errors.push("birth year must be between 1900 and 2100".to_string());
            }
        }

        match self.last_rotation_days {
            Some(days) if days < 0 => {
                report.errors.push("last rotation days cannot be negative".to_string());
            }
            Some(days) if days > 365 => {
                report.warnings.push("password rotation is older than 365 days".to_string());
            }
            _ => {}
        }

        if self.all_tokens().len() < 3 {
            report.warnings.push(
                "very little profile context provided; weak-pattern detection may be limited"
                    .to_string(),
            );
        }

        report
    }
}

/// Lowercase, dash-separated form of a subject name, safe for paths.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "unknown-subject".to_string()
    } else {
        slug
    }
}

/// Splits a comma-separated list, trimming entries and dropping
/// case-insensitive duplicates while keeping first-seen order.
pub fn parse_csv(value: Option<&str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| seen.insert(part.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// `yes`/`no` style answers; anything else is unknown.
pub fn parse_tristate(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "y" => Some(true),
        "no" | "false" | "0" | "n" => Some(false),
        _ => None,
    }
}

fn two_digit(year: &str) -> &str {
    let start = year.len().saturating_sub(2);
    &year[start..]
}

fn normalize_text(value: &str, max_len: usize) -> Option<String> {
    let cleaned = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(max_len).collect())
}

fn sanitize_list(values: Vec<String>, max_len: usize) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|item| normalize_text(&item, max_len))
        .collect()
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SubjectProfile {
        SubjectProfile {
            name: "Jane Doe".to_string(),
            aliases: vec!["jdoe".to_string()],
            keywords: vec!["river".to_string(), "  ".to_string()],
            favorite_numbers: vec!["77".to_string()],
            birth_year: Some(1991),
            organization: Some("AcmeCorp".to_string()),
            email_hint: Some("Jane.Doe@Example.co.uk".to_string()),
            phone_hint: Some("+1 (555) 010-4477".to_string()),
            ..SubjectProfile::default()
        }
    }

    #[test]
    fn test_all_tokens_collects_every_source() {
        let tokens = sample().all_tokens();
        for expected in [
            "Jane Doe", "jdoe", "river", "77", "AcmeCorp", "1991", "91", "jane.doe", "example",
            "co", "uk", "4477",
        ] {
            assert!(tokens.contains(expected), "missing token {expected}");
        }
        assert!(!tokens.iter().any(|t| t.trim().is_empty()));
    }

    #[test]
    fn test_email_hint_without_at_is_kept_whole() {
        let mut profile = SubjectProfile::new("x");
        profile.email_hint = Some("JaneD".to_string());
        assert!(profile.all_tokens().contains("janed"));
    }

    #[test]
    fn test_short_phone_is_ignored() {
        let mut profile = SubjectProfile::new("x");
        profile.phone_hint = Some("12-3".to_string());
        assert_eq!(profile.all_tokens().len(), 1);
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_caps_length() {
        let mut profile = SubjectProfile::new("   Jane    Doe  ");
        profile.organization = Some("   ".to_string());
        profile.aliases = vec!["  a  b ".to_string(), " ".to_string()];
        profile.role = Some("r".repeat(100));

        let profile = profile.sanitize();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.organization, None);
        assert_eq!(profile.aliases, vec!["a b".to_string()]);
        assert_eq!(profile.role.map(|r| r.len()), Some(80));
    }

    #[test]
    fn test_sanitize_blank_name_becomes_placeholder() {
        let profile = SubjectProfile::new("  ").sanitize();
        assert_eq!(profile.name, "unknown-subject");
    }

    #[test]
    fn test_validate_accepts_sample() {
        let report = sample().validate();
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut profile = sample();
        profile.email_hint = Some("not-an-email".to_string());
        profile.phone_hint = Some("123".to_string());
        profile.birth_year = Some(1850);
        profile.last_rotation_days = Some(-1);

        let report = profile.validate();
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_validate_warnings() {
        let mut profile = SubjectProfile::new("solo");
        profile.last_rotation_days = Some(400);
        let report = profile.validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Jane   Doe! "), "jane-doe");
        assert_eq!(slugify("***"), "unknown-subject");
        assert_eq!(slugify("ACME Corp 2"), "acme-corp-2");
    }

    #[test]
    fn test_parse_csv_dedups_case_insensitively() {
        assert_eq!(
            parse_csv(Some("River, river ,, Lake")),
            vec!["River".to_string(), "Lake".to_string()]
        );
        assert!(parse_csv(None).is_empty());
    }

    #[test]
    fn test_parse_tristate() {
        assert_eq!(parse_tristate("YES"), Some(true));
        assert_eq!(parse_tristate("n"), Some(false));
        assert_eq!(parse_tristate("unknown"), None);
    }
}
