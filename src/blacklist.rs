//! Common weak-password list.
//!
//! A fixed built-in list, optionally extended from an external file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an extra blacklist file.
pub const BLACKLIST_PATH_ENV: &str = "VICTIMATOR_BLACKLIST_PATH";

pub const BUILTIN_COMMON_PASSWORDS: [&str; 30] = [
    "123456",
    "12345678",
    "123456789",
    "1234567890",
    "password",
    "qwerty",
    "abc123",
    "111111",
    "123123",
    "iloveyou",
    "admin",
    "welcome",
    "monkey",
    "dragon",
    "football",
    "letmein",
    "master",
    "sunshine",
    "ashley",
    "bailey",
    "shadow",
    "password1",
    "passw0rd",
    "qwerty123",
    "trustno1",
    "freedom",
    "whatever",
    "654321",
    "superman",
    "hello123",
];

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Blacklist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read blacklist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Blacklist file is empty")]
    EmptyFile,
}

/// Lowercase set of passwords that are always classified weak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommonPasswords(BTreeSet<String>);

impl Default for CommonPasswords {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommonPasswords {
    pub fn builtin() -> Self {
        Self(BUILTIN_COMMON_PASSWORDS.iter().map(|p| p.to_string()).collect())
    }

    /// Built-in list, extended from [`BLACKLIST_PATH_ENV`] when it is set.
    ///
    /// # Errors
    ///
    /// Same as [`CommonPasswords::extend_from_path`].
    pub fn from_env() -> Result<Self, BlacklistError> {
        let mut list = Self::builtin();
        if let Some(path) = blacklist_path_from_env() {
            list.extend_from_path(path)?;
        }
        Ok(list)
    }

    /// Adds every non-blank line of `path`, lowercased.
    ///
    /// Returns how many new entries were added.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    pub fn extend_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, BlacklistError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::error!("Blacklist load FAILED: FileNotFound {}", path.display());
            return Err(BlacklistError::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);

        if content.trim().is_empty() {
            tracing::error!("Blacklist load FAILED: Empty file {}", path.display());
            return Err(BlacklistError::EmptyFile);
        }

        let before = self.0.len();
        self.0.extend(
            content
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty()),
        );
        let added = self.0.len() - before;

        tracing::info!("Blacklist extended: {} passwords from {:?}", added, path);

        Ok(added)
    }

    /// Case-insensitive membership.
    pub fn contains(&self, password: &str) -> bool {
        self.0.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extra blacklist file named by [`BLACKLIST_PATH_ENV`], if any.
pub fn blacklist_path_from_env() -> Option<PathBuf> {
    std::env::var_os(BLACKLIST_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: serialized tests, no other thread reads the environment
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: serialized tests, no other thread reads the environment
        unsafe { std::env::remove_var(key); }
    }

    fn setup_with_tempfile(passwords: &[&str]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        for pwd in passwords {
            writeln!(temp_file, "{}", pwd).expect("Failed to write");
        }
        temp_file
    }

    #[test]
    fn test_builtin_contains_password() {
        let list = CommonPasswords::builtin();
        assert_eq!(list.len(), 30);
        assert!(list.contains("password"));
        assert!(list.contains("PassW0rd"));
        assert!(!list.contains("veryuncommonpassword987"));
    }

    #[test]
    fn test_extend_file_not_found() {
        let mut list = CommonPasswords::builtin();
        let result = list.extend_from_path("/nonexistent/path/blacklist.txt");
        match result {
            Err(BlacklistError::FileNotFound(_)) => {}
            _ => panic!("Expected FileNotFound error"),
        }
    }

    #[test]
    fn test_extend_empty_file() {
        let temp_file = setup_with_tempfile(&["   "]);
        let mut list = CommonPasswords::builtin();
        let result = list.extend_from_path(temp_file.path());
        assert!(matches!(result, Err(BlacklistError::EmptyFile)));
    }

    #[test]
    fn test_extend_counts_only_new_entries() {
        let temp_file = setup_with_tempfile(&["Hunter2", "password", "", "correcthorse"]);
        let mut list = CommonPasswords::builtin();

        let added = list.extend_from_path(temp_file.path()).unwrap();
        assert_eq!(added, 2);
        assert!(list.contains("HUNTER2"));
    }

    #[test]
    #[serial]
    fn test_from_env_without_variable() {
        remove_env(BLACKLIST_PATH_ENV);
        let list = CommonPasswords::from_env().unwrap();
        assert_eq!(list, CommonPasswords::builtin());
    }

    #[test]
    #[serial]
    fn test_from_env_with_variable() {
        let temp_file = setup_with_tempfile(&["zebra-stripes"]);
        set_env(BLACKLIST_PATH_ENV, temp_file.path().to_str().unwrap());

        let list = CommonPasswords::from_env().unwrap();
        assert!(list.contains("zebra-stripes"));
        assert_eq!(list.len(), 31);

        remove_env(BLACKLIST_PATH_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_bad_path() {
        set_env(BLACKLIST_PATH_ENV, "/nonexistent/blacklist.txt");
        assert!(CommonPasswords::from_env().is_err());
        remove_env(BLACKLIST_PATH_ENV);
    }
}
