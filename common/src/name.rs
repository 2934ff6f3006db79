//! # DNS Name Model
//!
//! Defines the two validated name types every source funnels into:
//!
//! * [`Domain`]: the root target of a run.
//! * [`Subdomain`]: a canonical name at or below the root.
//!
//! Raw strings coming from passive sources or wordlists are turned into
//! [`Subdomain`]s exclusively through [`normalize`], which is the only place
//! the containment and charset rules are enforced.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// The root target, lower-cased, without leading or trailing dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a wordlist label onto the root: `api` becomes `api.example.com`.
    pub fn qualify(&self, label: &str) -> String {
        format!("{}.{}", label.trim().trim_end_matches('.'), self.0)
    }

    /// True when `name` is the root itself or a child of it.
    pub fn contains(&self, name: &str) -> bool {
        name == self.0
            || name
                .strip_suffix(self.0.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    /// Parses a user supplied target such as `Example.COM.` into `example.com`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let stripped = lower.trim_matches('.');

        if !is_valid_name(stripped) {
            return Err(ConfigError::InvalidDomain(s.to_string()));
        }

        Ok(Self(stripped.to_string()))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated member of a result set.
///
/// Equal to its [`Domain`] or ending in `.` + domain, lower-case, with no
/// wildcard label and no trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Subdomain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a raw candidate into a [`Subdomain`] of `domain`.
///
/// Lower-cases, then strips one leading `*.` and one trailing `.`. Returns
/// `None` for empty strings, characters outside `[a-z0-9-.]`, empty or
/// oversized labels, and names that fall outside `domain`.
pub fn normalize(raw: &str, domain: &Domain) -> Option<Subdomain> {
    let lower = raw.trim().to_ascii_lowercase();
    let unwildcarded = lower.strip_prefix("*.").unwrap_or(&lower);
    let name = unwildcarded.strip_suffix('.').unwrap_or(unwildcarded);

    if !is_valid_name(name) || !domain.contains(name) {
        return None;
    }

    Some(Subdomain(name.to_string()))
}

fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}
