/*!
 * Wildcard pattern matching for ignore rules
 *
 * Patterns without `*` or `?` compare by exact equality. Anything else is
 * compiled into an anchored regular expression where `*` matches any run of
 * characters and `?` matches exactly one. Matching is always against the
 * whole candidate, never a substring of it.
 */

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::Result;

/// Compiled wildcard patterns, keyed by their source text. `None` marks a
/// pattern that failed to compile so the warning is only emitted once.
static COMPILED: Lazy<RwLock<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns true if the pattern contains wildcard metacharacters
pub fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// A single ignore pattern
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Compared by string equality
    Exact(String),
    /// Anchored regex compiled from a wildcard pattern
    Wildcard(Regex),
}

impl Pattern {
    /// Parse a pattern, reporting a malformed wildcard as an error
    pub fn parse(pattern: &str) -> Result<Self> {
        if has_wildcards(pattern) {
            Ok(Self::Wildcard(Regex::new(&wildcard_to_regex(pattern))?))
        } else {
            Ok(Self::Exact(pattern.to_string()))
        }
    }

    /// Check a candidate against this pattern
    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(text) => text == candidate,
            Self::Wildcard(re) => re.is_match(candidate),
        }
    }
}

/// Translate a wildcard pattern into an anchored regular expression source
fn wildcard_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');

    let mut literal = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(ch.encode_utf8(&mut literal))),
        }
    }

    source.push('$');
    source
}

/// Check whether `candidate` matches `pattern` as a whole.
///
/// Wildcard patterns are compiled once and cached for the lifetime of the
/// process. A pattern that cannot be compiled matches nothing.
pub fn matches(candidate: &str, pattern: &str) -> bool {
    if !has_wildcards(pattern) {
        return candidate == pattern;
    }

    if let Ok(cache) = COMPILED.read() {
        if let Some(compiled) = cache.get(pattern) {
            return compiled.as_ref().is_some_and(|re| re.is_match(candidate));
        }
    }

    let compiled = match Regex::new(&wildcard_to_regex(pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Ignoring malformed pattern {:?}: {}", pattern, e);
            None
        }
    };
    let result = compiled.as_ref().is_some_and(|re| re.is_match(candidate));

    if let Ok(mut cache) = COMPILED.write() {
        cache.insert(pattern.to_string(), compiled);
    }

    result
}

/// Check whether `candidate` matches any pattern in the list
pub fn matches_any<I, S>(candidate: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .any(|pattern| matches(candidate, pattern.as_ref()))
}
