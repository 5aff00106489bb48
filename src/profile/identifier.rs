//! Canonical player identifiers

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}$")
        .expect("identifier pattern is valid")
});

/// A player identifier: 32 lower-case hex digits, no dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// Recognise an identifier written as 32 hex digits, optionally in
    /// 8-4-4-4-12 groups, in any case. Anything else (a player name) is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        if !UUID_PATTERN.is_match(input) {
            return None;
        }
        Some(Self(input.chars().filter(|c| *c != '-').map(|c| c.to_ascii_lowercase()).collect()))
    }

    /// Accept an id reported by the profile service, which is already
    /// undashed but may not be lower case.
    pub fn from_service(id: &str) -> Option<Self> {
        Self::parse(id.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
