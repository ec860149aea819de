//! The public value type: a closed lattice of `Version < Range < List`,
//! with coercion applied uniformly across every binary operation.

mod serde_shape;

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

pub use serde_shape::SerializedForm;

use crate::error::Error;
use crate::list::{Element, VersionList};
use crate::range::{parse_range_token, Range, RangeIntersection, RangeToken, RangeUnion};
use crate::version::Version;

/// A version, a range, or a disjoint list of either, coerced together for
/// every binary operation. This is the crate's single public value type.
#[derive(Debug, Clone)]
pub enum VersionValue {
    /// A single point version.
    Version(Version),
    /// A contiguous interval.
    Range(Range),
    /// A canonical, sorted, disjoint union.
    List(VersionList),
}

enum CoercedPair<'a> {
    Versions(&'a Version, &'a Version),
    Ranges(Range, Range),
    Lists(VersionList, VersionList),
}

impl VersionValue {
    /// Parses `input` into the narrowest value that losslessly represents it.
    pub fn parse(input: &str) -> Result<VersionValue, Error> {
        input.parse()
    }

    fn as_range(&self) -> Range {
        match self {
            VersionValue::Version(v) => point_range(v),
            VersionValue::Range(r) => r.clone(),
            VersionValue::List(_) => unreachable!("as_range is only called on non-List operands"),
        }
    }

    fn as_list(&self) -> VersionList {
        match self {
            VersionValue::Version(v) => VersionList::from_single(Element::Version(v.clone())),
            VersionValue::Range(r) => VersionList::from_single(Element::from_range(r.clone())),
            VersionValue::List(l) => l.clone(),
        }
    }

    fn coerce_with<'a>(&'a self, other: &'a VersionValue) -> CoercedPair<'a> {
        match (self, other) {
            (VersionValue::Version(a), VersionValue::Version(b)) => CoercedPair::Versions(a, b),
            (VersionValue::List(_), _) | (_, VersionValue::List(_)) => {
                CoercedPair::Lists(self.as_list(), other.as_list())
            }
            _ => CoercedPair::Ranges(self.as_range(), other.as_range()),
        }
    }

    /// Structural equality, after coercing both sides to the higher of their
    /// two lattice levels.
    pub fn equals(&self, other: &VersionValue) -> bool {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) => a == b,
            CoercedPair::Ranges(a, b) => a == b,
            CoercedPair::Lists(a, b) => a == b,
        }
    }

    /// Strict total order, after coercion.
    pub fn less(&self, other: &VersionValue) -> bool {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) => a < b,
            CoercedPair::Ranges(a, b) => a < b,
            CoercedPair::Lists(a, b) => a < b,
        }
    }

    /// `other ∈ self`.
    pub fn contains(&self, other: &VersionValue) -> bool {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) => a.contains(b),
            CoercedPair::Ranges(a, b) => a.contains(&b),
            CoercedPair::Lists(a, b) => a.contains(&b),
        }
    }

    /// Asymmetric prefix satisfaction, after coercion. See
    /// [`Version::satisfies`], [`Range::satisfies`], [`VersionList::satisfies`].
    pub fn satisfies(&self, other: &VersionValue) -> bool {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) => a.satisfies(b),
            CoercedPair::Ranges(a, b) => a.satisfies(&b),
            CoercedPair::Lists(a, b) => a.satisfies(&b, false),
        }
    }

    /// The stricter reading of [`VersionValue::satisfies`]: `self ⊆ other`.
    pub fn satisfies_strict(&self, other: &VersionValue) -> bool {
        self.as_list().satisfies(&other.as_list(), true)
    }

    /// True iff neither value lies strictly to one side of the other.
    pub fn overlaps(&self, other: &VersionValue) -> bool {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) => a == b,
            CoercedPair::Ranges(a, b) => a.overlaps(&b),
            CoercedPair::Lists(a, b) => a.overlaps(&b),
        }
    }

    /// Set union, coerced to the narrowest representable result.
    pub fn union(&self, other: &VersionValue) -> VersionValue {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) if a == b => VersionValue::Version(a.clone()),
            CoercedPair::Versions(a, b) => range_union_to_value(point_range(a), point_range(b)),
            CoercedPair::Ranges(a, b) => range_union_to_value(a, b),
            CoercedPair::Lists(a, b) => {
                let merged = a.union(&b);
                trace!(target: "verset::value", left = %a, right = %b, result = %merged, "canonicalized union");
                narrow(merged)
            }
        }
    }

    /// Set intersection; the empty `List` is the distinguished "no overlap"
    /// result, not an error.
    pub fn intersection(&self, other: &VersionValue) -> VersionValue {
        match self.coerce_with(other) {
            CoercedPair::Versions(a, b) if a == b => VersionValue::Version(a.clone()),
            CoercedPair::Versions(..) => VersionValue::List(VersionList::empty()),
            CoercedPair::Ranges(a, b) => match a.intersection(&b) {
                RangeIntersection::Overlap(r) => narrow_range(r),
                RangeIntersection::Empty => VersionValue::List(VersionList::empty()),
            },
            CoercedPair::Lists(a, b) => narrow(a.intersection(&b)),
        }
    }

    /// Returns the single `Version` this value reduces to, if any.
    pub fn concrete(&self) -> Option<&Version> {
        match self {
            VersionValue::Version(v) => Some(v),
            VersionValue::Range(r) => r.concrete(),
            VersionValue::List(l) => l.concrete(),
        }
    }

    /// The lowest boundary, if this value is non-empty.
    pub fn lowest(&self) -> Option<&Version> {
        match self {
            VersionValue::Version(v) => Some(v),
            VersionValue::Range(r) => r.start(),
            VersionValue::List(l) => l.lowest(),
        }
    }

    /// The highest boundary, if this value is non-empty.
    pub fn highest(&self) -> Option<&Version> {
        match self {
            VersionValue::Version(v) => Some(v),
            VersionValue::Range(r) => r.end(),
            VersionValue::List(l) => l.highest(),
        }
    }

    /// The highest non-infinite boundary, falling back to the overall
    /// highest when every candidate is an infinity token.
    pub fn preferred(&self) -> Option<&Version> {
        match self {
            VersionValue::List(l) => l.preferred(),
            _ => match self.highest() {
                Some(v) if !v.is_infinite() => Some(v),
                _ => self.lowest().filter(|v| !v.is_infinite()).or_else(|| self.highest()),
            },
        }
    }
}

fn point_range(v: &Version) -> Range {
    Range::new(Some(v.clone()), Some(v.clone()), true, true).expect("a point range is always valid")
}

fn narrow_range(range: Range) -> VersionValue {
    match range.concrete() {
        Some(v) => VersionValue::Version(v.clone()),
        None => VersionValue::Range(range),
    }
}

fn range_union_to_value(a: Range, b: Range) -> VersionValue {
    match a.union(&b) {
        RangeUnion::Merged(merged) => narrow_range(merged),
        RangeUnion::Disjoint(lo, hi) => VersionValue::List(VersionList::from_pair(lo, hi)),
    }
}

fn narrow(list: VersionList) -> VersionValue {
    match list.elements() {
        [Element::Version(v)] => VersionValue::Version(v.clone()),
        [Element::Range(r)] => VersionValue::Range(r.clone()),
        _ => VersionValue::List(list),
    }
}

impl FromStr for VersionValue {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Error> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(c) = compact.chars().find(|&c| !is_constructor_char(c)) {
            return Err(Error::InvalidCharacter(c));
        }

        if compact.contains(',') {
            let mut list = VersionList::empty();
            for token in compact.split(',') {
                match parse_range_token(token)? {
                    RangeToken::Version(v) => list.insert(Element::Version(v)),
                    RangeToken::Range(r) => list.insert(Element::from_range(r)),
                    RangeToken::Empty => {}
                }
            }
            return Ok(narrow(list));
        }

        match parse_range_token(&compact)? {
            RangeToken::Version(v) => Ok(VersionValue::Version(v)),
            RangeToken::Range(r) => Ok(VersionValue::Range(r)),
            RangeToken::Empty => Ok(VersionValue::List(VersionList::empty())),
        }
    }
}

fn is_constructor_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '*' | ':' | '!' | ',')
}

impl From<i64> for VersionValue {
    fn from(value: i64) -> Self {
        value
            .to_string()
            .parse()
            .expect("a stringified integer is always a valid version")
    }
}

impl From<u64> for VersionValue {
    fn from(value: u64) -> Self {
        value
            .to_string()
            .parse()
            .expect("a stringified integer is always a valid version")
    }
}

impl FromIterator<VersionValue> for VersionValue {
    fn from_iter<T: IntoIterator<Item = VersionValue>>(iter: T) -> Self {
        let mut list = VersionList::empty();
        for item in iter {
            match item {
                VersionValue::Version(v) => list.insert(Element::Version(v)),
                VersionValue::Range(r) => list.insert(Element::from_range(r)),
                VersionValue::List(other) => {
                    for element in other.elements() {
                        list.insert(element.clone());
                    }
                }
            }
        }
        narrow(list)
    }
}

impl TryFrom<&serde_json::Value> for VersionValue {
    type Error = Error;

    /// The dynamic-transport ingestion path: a recipe loader handing this
    /// crate an already-parsed JSON/YAML value instead of a string. `bool`,
    /// `null`, and object shapes other than `{version}`/`{versions}` have no
    /// representative in the lattice.
    fn try_from(value: &serde_json::Value) -> Result<Self, Error> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            serde_json::Value::Number(n) => n.to_string().parse(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(VersionValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(|values| values.into_iter().collect()),
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(s)) = map.get("version") {
                    return s.parse();
                }
                if let Some(serde_json::Value::Array(items)) = map.get("versions") {
                    return items
                        .iter()
                        .map(VersionValue::try_from)
                        .collect::<Result<Vec<_>, _>>()
                        .map(|values| values.into_iter().collect());
                }
                Err(Error::UncoerceableType)
            }
            serde_json::Value::Bool(_) | serde_json::Value::Null => Err(Error::UncoerceableType),
        }
    }
}

impl Display for VersionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VersionValue::Version(v) => write!(f, "{v}"),
            VersionValue::Range(r) => write!(f, "{r}"),
            VersionValue::List(l) => write!(f, "{l}"),
        }
    }
}

impl PartialEq for VersionValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for VersionValue {}

impl PartialOrd for VersionValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.equals(other) {
            Some(std::cmp::Ordering::Equal)
        } else if self.less(other) {
            Some(std::cmp::Ordering::Less)
        } else {
            Some(std::cmp::Ordering::Greater)
        }
    }
}

impl Hash for VersionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_list().hash(state);
    }
}

impl Serialize for VersionValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VersionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
