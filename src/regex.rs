//! Compiled `pattern` regexes and synthesis of strings that match them.
use crate::ecma;
use ahash::AHashMap;
use fancy_regex::Regex;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex_syntax::hir::{Class, Hir, HirKind};
use std::{collections::VecDeque, sync::Arc};

static REGEX_CACHE: Lazy<Mutex<LruCache>> = Lazy::new(|| Mutex::new(LruCache::new(64)));

// Upper bound for repetitions when synthesizing a sample
const MAX_SAMPLE_REPETITIONS: u32 = 256;

// Tried in order when looking for a string outside a pattern's language
const NON_MATCH_CANDIDATES: &[&str] = &["", " ", "-", "0", "a", "~", "\u{3000}", "\n"];

struct LruCache {
    map: AHashMap<String, Arc<Regex>>,
    queue: VecDeque<String>,
    capacity: usize,
}

impl LruCache {
    fn new(capacity: usize) -> Self {
        LruCache {
            map: AHashMap::new(),
            queue: VecDeque::new(),
            capacity,
        }
    }

    fn get(&mut self, key: &str) -> Option<Arc<Regex>> {
        let value = self.map.get(key)?.clone();
        if let Some(index) = self.queue.iter().position(|x| x == key) {
            if let Some(recent) = self.queue.remove(index) {
                self.queue.push_back(recent);
            }
        }
        Some(value)
    }

    fn insert(&mut self, key: String, value: Arc<Regex>) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            if let Some(lru_key) = self.queue.pop_front() {
                self.map.remove(&lru_key);
            }
        }
        if self.map.insert(key.clone(), value).is_some() {
            self.queue.retain(|x| x != &key);
        }
        self.queue.push_back(key);
    }
}

/// Compile an ECMA 262 pattern, reusing recently compiled ones.
pub(crate) fn compile(pattern: &str) -> Result<Arc<Regex>, String> {
    let mut cache = REGEX_CACHE.lock();
    if let Some(regex) = cache.get(pattern) {
        return Ok(regex);
    }
    let translated = ecma::to_rust_regex(pattern).map_err(|()| {
        format!("{pattern:?} contains an escape sequence that is not valid in ECMA 262")
    })?;
    let regex = Arc::new(Regex::new(&translated).map_err(|error| error.to_string())?);
    cache.insert(pattern.to_string(), Arc::clone(&regex));
    Ok(regex)
}

/// Whether `pattern` matches anywhere in `text`.
///
/// # Panics
///
/// If `pattern` does not compile. Callers only match against validated schemas.
pub(crate) fn is_match(pattern: &str, text: &str) -> Result<bool, fancy_regex::Error> {
    let regex = compile(pattern)
        .unwrap_or_else(|error| panic!("pattern {pattern:?} was not validated: {error}"));
    regex.is_match(text)
}

/// A short string matched by `pattern`, if one can be derived from its structure.
pub(crate) fn sample(pattern: &str) -> Option<String> {
    let translated = ecma::to_rust_regex(pattern).ok()?;
    let hir = regex_syntax::Parser::new().parse(&translated).ok()?;
    let mut output = String::new();
    if !synthesize(&hir, &mut output) {
        return None;
    }
    match is_match(pattern, &output) {
        Ok(true) => Some(output),
        _ => None,
    }
}

/// A short string that `pattern` does not match.
pub(crate) fn non_matching(pattern: &str) -> Option<String> {
    NON_MATCH_CANDIDATES
        .iter()
        .find(|candidate| matches!(is_match(pattern, candidate), Ok(false)))
        .map(|candidate| (*candidate).to_string())
}

fn synthesize(hir: &Hir, output: &mut String) -> bool {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => true,
        HirKind::Literal(literal) => match std::str::from_utf8(&literal.0) {
            Ok(text) => {
                output.push_str(text);
                true
            }
            Err(_) => false,
        },
        HirKind::Class(Class::Unicode(class)) => {
            let printable = class
                .ranges()
                .iter()
                .find(|range| range.end() >= ' ')
                .map(|range| range.start().max(' '));
            match printable.or_else(|| class.ranges().first().map(|range| range.start())) {
                Some(ch) => {
                    output.push(ch);
                    true
                }
                None => false,
            }
        }
        HirKind::Class(Class::Bytes(class)) => match class
            .ranges()
            .iter()
            .map(|range| range.start().max(b' '))
            .find(u8::is_ascii)
        {
            Some(byte) => {
                output.push(char::from(byte));
                true
            }
            None => false,
        },
        HirKind::Repetition(repetition) => {
            if repetition.min > MAX_SAMPLE_REPETITIONS {
                return false;
            }
            (0..repetition.min).all(|_| synthesize(&repetition.sub, output))
        }
        HirKind::Capture(capture) => synthesize(&capture.sub, output),
        HirKind::Concat(items) => items.iter().all(|item| synthesize(item, output)),
        HirKind::Alternation(branches) => {
            let checkpoint = output.len();
            for branch in branches {
                if synthesize(branch, output) {
                    return true;
                }
                output.truncate(checkpoint);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("^a+$", "a")]
    #[test_case("^[0-9]{3}$", "000")]
    #[test_case(r"^\d{2}-\w$", "00-0")]
    #[test_case("^(foo|bar)baz$", "foobaz")]
    #[test_case("x", "x")]
    #[test_case("^$", "")]
    fn samples_match(pattern: &str, expected: &str) {
        assert_eq!(sample(pattern).as_deref(), Some(expected));
    }

    #[test]
    fn sample_with_look_around_is_verified() {
        // Look arounds are not supported by `regex_syntax`
        assert_eq!(sample("^(?=a)a$"), None);
    }

    #[test_case("^a+$", "")]
    #[test_case("^$", " ")]
    #[test_case("^[^-]", "")]
    fn non_matches(pattern: &str, expected: &str) {
        assert_eq!(non_matching(pattern).as_deref(), Some(expected));
    }

    #[test]
    fn matches_everything() {
        assert_eq!(non_matching(""), None);
    }

    #[test]
    fn invalid_patterns() {
        assert!(compile("(abc").is_err());
        assert!(compile(r"\c?").is_err());
        assert!(compile("^[a-z]$").is_ok());
    }

    #[test]
    fn unanchored_search() {
        assert!(is_match("b", "abc").expect("No backtracking"));
        assert!(!is_match("^b", "abc").expect("No backtracking"));
    }
}
