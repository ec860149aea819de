//! A single point version: a non-empty, ordered sequence of integer or
//! alphabetic segments, separated by `.`, `-` or `_`.

mod infinity;
mod parse;

use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

pub use parse::{ParseVersionError, ParseVersionErrorKind};

use infinity::infinity_rank;

pub(crate) type SegmentVec = SmallVec<[Segment; 4]>;
pub(crate) type SeparatorVec = SmallVec<[Box<str>; 3]>;

/// Either an integer or an alphabetic run. `text` retains the exact source
/// spelling (e.g. leading zeroes) for display, but equality, ordering and
/// hashing only ever look at the semantic value.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Number { value: u64, text: Box<str> },
    Word(Box<str>),
}

impl Segment {
    fn text(&self) -> &str {
        match self {
            Segment::Number { text, .. } => text,
            Segment::Word(word) => word,
        }
    }

    fn as_word(&self) -> Option<&str> {
        match self {
            Segment::Word(word) => Some(word),
            Segment::Number { .. } => None,
        }
    }

    fn as_number(&self) -> Option<u64> {
        match self {
            Segment::Number { value, .. } => Some(*value),
            Segment::Word(_) => None,
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Segment::Number { value: a, .. }, Segment::Number { value: b, .. }) => a == b,
            (Segment::Word(a), Segment::Word(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Segment::Number { value, .. } => {
                0u8.hash(state);
                value.hash(state);
            }
            Segment::Word(word) => {
                1u8.hash(state);
                word.hash(state);
            }
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Compares two segments under the rules of §4.1: infinity tokens outrank
/// everything, numbers outrank plain identifiers, and otherwise segments of
/// the same kind compare naturally.
fn compare_segments(a: &Segment, b: &Segment) -> Ordering {
    let a_rank = a.as_word().and_then(infinity_rank);
    let b_rank = b.as_word().and_then(infinity_rank);
    match (a_rank, b_rank) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => match (a, b) {
            (Segment::Number { value: a, .. }, Segment::Number { value: b, .. }) => a.cmp(b),
            (Segment::Word(a), Segment::Word(b)) => a.cmp(b),
            (Segment::Number { .. }, Segment::Word(_)) => Ordering::Greater,
            (Segment::Word(_), Segment::Number { .. }) => Ordering::Less,
        },
    }
}

/// A single point version, e.g. `4.7.3` or `1.0rc1` or `develop`.
///
/// `Version` implements two distinct relations that must not be confused:
/// the strict order `<` (by which `4.7 < 4.7.3`, because a longer sequence
/// that agrees on every common segment is considered greater), and prefix
/// containment (by which `4.7.3` is a member of the `4.7` family). See
/// [`Version::contains`] and [`Version::satisfies`].
#[derive(Clone)]
pub struct Version {
    /// The exact string this version was parsed from (minus a dropped
    /// trailing separator), used for display and round-tripping.
    source: Box<str>,
    segments: SegmentVec,
    separators: SeparatorVec,
}

impl Version {
    /// Builds a `Version` directly from already-parsed segments, used by the
    /// range parser for star-expansion (§4.2) where the bumped endpoint
    /// doesn't come from re-parsing a string.
    pub(crate) fn from_segments(segments: SegmentVec, separators: SeparatorVec) -> Self {
        let source = render(&segments, &separators);
        Version {
            source: source.into_boxed_str(),
            segments,
            separators,
        }
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if `other` is contained in the family named by `self`,
    /// i.e. `self`'s segments are a (possibly-equal) prefix of `other`'s.
    /// `4.7.3 ∈ 4.7` is `4.7.contains(4.7.3)`.
    pub fn contains(&self, other: &Version) -> bool {
        is_prefix(&self.segments, &other.segments)
    }

    /// Asymmetric: true iff `other`'s segments are a prefix of `self`'s,
    /// i.e. `self ∈ other`. `4.7.3.satisfies(4.7)` is `true`.
    pub fn satisfies(&self, other: &Version) -> bool {
        is_prefix(&other.segments, &self.segments)
    }

    /// Returns a `Version` built from the first `k` segments (`k >= 0`) or
    /// from all but the last `-k` segments (`k < 0`), reassembled with the
    /// original separators.
    pub fn up_to(&self, k: isize) -> Version {
        let len = self.segments.len() as isize;
        let take = if k >= 0 { k.min(len) } else { (len + k).max(0) } as usize;
        let segments: SegmentVec = self.segments[..take].iter().cloned().collect();
        let separators: SeparatorVec = if take == 0 {
            SeparatorVec::new()
        } else {
            self.separators[..take - 1].iter().cloned().collect()
        };
        Version::from_segments(segments, separators)
    }

    /// True iff `self` and `other` have identical length, both end in an
    /// integer segment, and `other`'s last segment is exactly one greater
    /// than `self`'s. This is the only adjacency relation consulted when
    /// merging ranges (§4.1).
    pub(crate) fn is_predecessor(&self, other: &Version) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        match (self.segments.last().and_then(Segment::as_number), other.segments.last().and_then(Segment::as_number)) {
            (Some(a), Some(b)) => b.checked_sub(a) == Some(1),
            _ => false,
        }
    }

    /// True if this version contains an infinity token anywhere in its
    /// segments (`develop`, `main`, `master`, `head`, `trunk`).
    pub(crate) fn is_infinite(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.as_word().is_some_and(|w| infinity_rank(w).is_some()))
    }

    /// Bumps the trailing integer segment by one, producing the version that
    /// immediately follows `self` under [`Version::is_predecessor`]. Used by
    /// star expansion (`1.2.*` ⇒ `[1.2, 1.3)`).
    pub(crate) fn bump_last(&self) -> Option<Version> {
        let last = self.segments.last()?.as_number()?;
        let mut segments = self.segments.clone();
        let bumped = last.checked_add(1)?;
        let text = bumped.to_string().into_boxed_str();
        *segments.last_mut().expect("non-empty") = Segment::Number { value: bumped, text };
        Some(Version::from_segments(segments, self.separators.clone()))
    }
}

fn is_prefix(shorter: &[Segment], longer: &[Segment]) -> bool {
    shorter.len() <= longer.len() && shorter.iter().zip(longer.iter()).all(|(a, b)| a == b)
}

fn render(segments: &[Segment], separators: &[Box<str>]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push_str(&separators[i - 1]);
        }
        out.push_str(segment.text());
    }
    out
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments[..].hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for pair in self.segments.iter().zip_longest(other.segments.iter()) {
            match pair {
                EitherOrBoth::Both(a, b) => match compare_segments(a, b) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                },
                // The longer sequence is greater when all common segments agree.
                EitherOrBoth::Left(_) => return Ordering::Greater,
                EitherOrBoth::Right(_) => return Ordering::Less,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Debug for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Version")
            .field("source", &self.source)
            .field("segments", &self.segments)
            .finish()
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        source.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::Version;

    #[test]
    fn prefix_containment_is_not_order() {
        let short = Version::from_str("4.7").unwrap();
        let long = Version::from_str("4.7.3").unwrap();
        assert!(short < long);
        assert!(short.contains(&long));
        assert!(long.satisfies(&short));
        assert!(!long.contains(&short));
        assert!(!short.satisfies(&long));
    }

    #[test]
    fn infinity_tokens_outrank_numbers() {
        let develop = Version::from_str("develop").unwrap();
        let numeric = Version::from_str("99.99.99").unwrap();
        assert!(develop > numeric);

        let main = Version::from_str("main").unwrap();
        assert!(main > develop);
    }

    #[test]
    fn numbers_outrank_identifiers() {
        assert!(Version::from_str("1.0").unwrap() > Version::from_str("1.a").unwrap());
    }

    #[test]
    fn is_predecessor() {
        let a = Version::from_str("1.5").unwrap();
        let b = Version::from_str("1.6").unwrap();
        assert!(a.is_predecessor(&b));
        assert!(!b.is_predecessor(&a));
        assert!(!a.is_predecessor(&Version::from_str("2.6").unwrap()));
    }

    #[test]
    fn up_to_trims_and_reassembles() {
        let v = Version::from_str("1.2.3").unwrap();
        assert_eq!(v.up_to(2).to_string(), "1.2");
        assert_eq!(v.up_to(-1).to_string(), "1.2");
        assert_eq!(v.up_to(0).to_string(), "");
    }

    #[test]
    fn equality_ignores_separators() {
        assert_eq!(Version::from_str("1-2").unwrap(), Version::from_str("1.2").unwrap());
    }

    #[test]
    fn hash_matches_eq() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(v: &Version) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }

        let a = Version::from_str("1.2.0").unwrap();
        let b = Version::from_str("1-2-0").unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
