//! Immutable sets of property names.
use crate::value::hasher;
use serde_json::{Map, Value};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// An immutable, sorted set of strings with a precomputed hash.
///
/// Every operation returns a new set; a set that has been handed out never changes. Clones are
/// cheap and share storage.
///
/// ```rust
/// use jsonschema_testgen::StringSet;
///
/// let set = StringSet::singleton("a").union(&StringSet::singleton("a"));
/// assert_eq!(set.len(), 1);
/// assert!(set.contains("a"));
/// ```
#[derive(Clone)]
pub struct StringSet {
    members: Arc<[String]>,
    hash: u64,
}

fn member_hash(member: &str) -> u64 {
    let mut state = hasher();
    member.hash(&mut state);
    state.finish()
}

impl StringSet {
    /// Seal sorted, deduplicated members into a set.
    fn publish(members: Vec<String>) -> StringSet {
        debug_assert!(members.windows(2).all(|pair| pair[0] < pair[1]));
        let hash = members
            .iter()
            .fold(0, |hash, member| hash ^ member_hash(member));
        StringSet {
            members: members.into(),
            hash,
        }
    }

    fn from_unsorted(mut members: Vec<String>) -> StringSet {
        members.sort_unstable();
        members.dedup();
        StringSet::publish(members)
    }

    /// The empty set.
    #[must_use]
    pub fn empty() -> StringSet {
        StringSet::publish(Vec::new())
    }

    /// A set with exactly one member.
    #[must_use]
    pub fn singleton(member: impl Into<String>) -> StringSet {
        StringSet::publish(vec![member.into()])
    }

    /// The member names of a JSON object.
    #[must_use]
    pub fn from_object_keys(object: &Map<String, Value>) -> StringSet {
        StringSet::from_unsorted(object.keys().cloned().collect())
    }

    /// The elements of an array of strings.
    ///
    /// # Panics
    ///
    /// If any element is not a string.
    #[must_use]
    pub fn from_array_of_strings(array: &[Value]) -> StringSet {
        StringSet::from_unsorted(
            array
                .iter()
                .map(|item| match item {
                    Value::String(member) => member.clone(),
                    _ => panic!("expected an array of strings, found {item}"),
                })
                .collect(),
        )
    }

    /// All members of both sets.
    #[must_use]
    pub fn union(&self, other: &StringSet) -> StringSet {
        if other.is_empty() || Arc::ptr_eq(&self.members, &other.members) {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let mut left = self.members.iter().peekable();
        let mut right = other.members.iter().peekable();
        loop {
            match (left.peek(), right.peek()) {
                (Some(a), Some(b)) => match a.cmp(b) {
                    std::cmp::Ordering::Less => merged.extend(left.next().cloned()),
                    std::cmp::Ordering::Greater => merged.extend(right.next().cloned()),
                    std::cmp::Ordering::Equal => {
                        merged.extend(left.next().cloned());
                        right.next();
                    }
                },
                (Some(_), None) => merged.extend(left.by_ref().cloned()),
                (None, Some(_)) => merged.extend(right.by_ref().cloned()),
                (None, None) => break,
            }
        }
        StringSet::publish(merged)
    }

    /// The smallest superset of `seed` that contains every property dependency of its members.
    ///
    /// Only array-valued entries of `dependencies` contribute; schema dependencies are ignored.
    #[must_use]
    pub fn dependency_closure(seed: &StringSet, dependencies: &Map<String, Value>) -> StringSet {
        let mut closure = seed.clone();
        loop {
            let mut grown = closure.clone();
            for (property, dependency) in dependencies {
                if let Value::Array(required) = dependency {
                    if closure.contains(property) {
                        grown = grown.union(&StringSet::from_array_of_strings(required));
                    }
                }
            }
            if grown.len() == closure.len() {
                return closure;
            }
            closure = grown;
        }
    }

    /// Whether `member` belongs to the set.
    #[must_use]
    pub fn contains(&self, member: &str) -> bool {
        self.members
            .binary_search_by(|probe| probe.as_str().cmp(member))
            .is_ok()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}

impl PartialEq for StringSet {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.members == other.members
    }
}

impl Eq for StringSet {}

impl Hash for StringSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Default for StringSet {
    fn default() -> Self {
        StringSet::empty()
    }
}

impl fmt::Debug for StringSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.members.iter()).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StringSet::from_unsorted(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.members
            .iter()
            .map(String::as_str as fn(&'a String) -> &'a str)
    }
}
