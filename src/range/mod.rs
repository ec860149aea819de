//! A contiguous interval over [`Version`]s with optional open ends.

mod parse;

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::version::Version;

pub use parse::ParseRangeError;
pub(crate) use parse::{parse_range_token, RangeToken};

/// An error raised while constructing a [`Range`] directly (not via parsing).
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RangeError {
    /// `start` compared greater than `end`.
    #[error("range start '{start}' is greater than range end '{end}'")]
    InvalidRange {
        /// The offending start boundary, rendered for diagnostics.
        start: String,
        /// The offending end boundary, rendered for diagnostics.
        end: String,
    },
    /// A starred version (`1.2.*`) appeared as one endpoint of a
    /// non-degenerate range, e.g. `1.2.*:1.5`.
    #[error("a starred version cannot appear as one endpoint of a range")]
    StarInInequality,
    /// `X.*` was requested but `X`'s trailing segment isn't an integer, so
    /// there is nothing to bump to build the upper bound.
    #[error("cannot expand '{0}.*': the preceding segment is not numeric")]
    StarRequiresNumericSuffix(String),
}

/// The outcome of unioning two ranges: either they collapse into a single
/// contiguous range, or they remain two disjoint pieces.
pub(crate) enum RangeUnion {
    Merged(Range),
    Disjoint(Range, Range),
}

/// The outcome of intersecting two ranges.
pub(crate) enum RangeIntersection {
    Overlap(Range),
    Empty,
}

/// A pair `(start, end)` of optional [`Version`]s plus inclusivity flags. A
/// `None` endpoint means open infinity on that side and is always treated as
/// inclusive (an "open infinity, exclusive" state is nonsensical).
#[derive(Debug, Clone)]
pub struct Range {
    start: Option<Version>,
    end: Option<Version>,
    includes_left: bool,
    includes_right: bool,
}

impl Range {
    /// Builds a range, normalizing unbounded sides to inclusive and
    /// rejecting an inverted `start > end`.
    pub fn new(
        start: Option<Version>,
        end: Option<Version>,
        includes_left: bool,
        includes_right: bool,
    ) -> Result<Range, RangeError> {
        let includes_left = start.is_none() || includes_left;
        let includes_right = end.is_none() || includes_right;
        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(RangeError::InvalidRange {
                    start: s.to_string(),
                    end: e.to_string(),
                });
            }
        }
        Ok(Range {
            start,
            end,
            includes_left,
            includes_right,
        })
    }

    /// A half-open range built from star expansion: `[base, base + 1)`.
    pub(crate) fn star_expansion(base: Version) -> Result<Range, RangeError> {
        let upper = base
            .bump_last()
            .ok_or_else(|| RangeError::StarRequiresNumericSuffix(base.to_string()))?;
        Ok(Range {
            start: Some(base),
            end: Some(upper),
            includes_left: true,
            includes_right: false,
        })
    }

    pub(crate) fn start(&self) -> Option<&Version> {
        self.start.as_ref()
    }

    pub(crate) fn end(&self) -> Option<&Version> {
        self.end.as_ref()
    }

    pub(crate) fn low_endpoint(&self) -> Endpoint<'_> {
        Endpoint::left(self.start.as_ref(), self.includes_left)
    }

    pub(crate) fn high_endpoint(&self) -> Endpoint<'_> {
        Endpoint::right(self.end.as_ref(), self.includes_right)
    }

    /// True iff this range reduces to a single point: equal, inclusive endpoints.
    pub fn concrete(&self) -> Option<&Version> {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) if self.includes_left && self.includes_right && s == e => Some(s),
            _ => None,
        }
    }

    /// True iff this is the degenerate empty interval: equal endpoints, both excluded.
    pub(crate) fn is_empty(&self) -> bool {
        matches!((&self.start, &self.end), (Some(s), Some(e)) if s == e)
            && !self.includes_left
            && !self.includes_right
    }

    /// `other ∈ self`: is `other` wholly contained in `self`?
    ///
    /// The low side reduces to plain endpoint comparison: the strict order
    /// already ranks a prefix below everything it prefixes (the "longer is
    /// greater" rule from `Version::cmp`), so a proper-prefix relation
    /// between two low-endpoint values and a strict `<` between them always
    /// point the same direction. The high side needs an explicit extra
    /// check: `self`'s high boundary can be a *shorter* family name than
    /// `other`'s (e.g. `4.7` against `4.7.3`), which strict order ranks as
    /// lower even though `4.7` as a boundary reaches at least as far.
    pub fn contains(&self, other: &Range) -> bool {
        self.low_endpoint() <= other.low_endpoint()
            && high_reaches(self.end.as_ref(), self.includes_right, other.end.as_ref(), other.includes_right)
    }

    /// True iff neither range lies strictly to one side of the other. Plain
    /// endpoint comparison only — no prefix-family fallback. Family
    /// awareness lives in [`Range::satisfies`]'s own extra clause instead, so
    /// that `overlaps` stays the strictly-numeric, symmetric relation §4.2's
    /// algebraic laws require, and `satisfies` stays strictly looser.
    pub fn overlaps(&self, other: &Range) -> bool {
        low_at_or_before_high(self.start.as_ref(), self.includes_left, other.end.as_ref(), other.includes_right)
            && low_at_or_before_high(other.start.as_ref(), other.includes_left, self.end.as_ref(), self.includes_right)
    }

    /// Looser than [`Range::overlaps`]: also true when `other`'s low
    /// boundary (finite) is a member of the family named by `self`'s high
    /// boundary (finite), under [`Version::satisfies`]. Asymmetric: a
    /// request for `4.5:4.7` is satisfied by a package accepting
    /// `4.7.3:4.8`, because `4.7.3` lies in `4.5:4.7` once `4.7` is read as a
    /// family, but not the other way around.
    pub fn satisfies(&self, other: &Range) -> bool {
        if self.overlaps(other) {
            return true;
        }
        match (&other.start, &self.end) {
            (Some(other_start), Some(self_end)) => other_start.satisfies(self_end),
            _ => false,
        }
    }

    /// True iff `self` ends strictly before `other` begins, i.e. `self` and
    /// `other` don't overlap or touch and `self` sorts first. Compares the
    /// boundary `Version`s directly rather than through `Endpoint`, since
    /// `Endpoint`'s order is only meaningful between two endpoints on the
    /// same side (§3) — `self.high_endpoint()` and `other.low_endpoint()`
    /// are opposite sides and aren't comparable that way.
    pub(crate) fn ends_strictly_before(&self, other: &Range) -> bool {
        match (&self.end, &other.start) {
            (None, _) | (_, None) => false,
            (Some(end), Some(start)) => match end.cmp(start) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => !(self.includes_right && other.includes_left),
            },
        }
    }

    /// True iff `self` and `other` are disjoint but their touching endpoints
    /// are both inclusive integer-adjacent (`is_predecessor`), so they merge
    /// into one contiguous range without leaving a gap.
    pub(crate) fn is_adjacent_to(&self, other: &Range) -> bool {
        let (lower, higher) = if self.low_endpoint() <= other.low_endpoint() {
            (self, other)
        } else {
            (other, self)
        };
        match (&lower.end, &higher.start) {
            (Some(end), Some(start)) => {
                lower.includes_right && higher.includes_left && end.is_predecessor(start)
            }
            _ => false,
        }
    }

    pub(crate) fn union(&self, other: &Range) -> RangeUnion {
        if self.overlaps(other) || self.is_adjacent_to(other) {
            let low = if self.low_endpoint() <= other.low_endpoint() {
                self
            } else {
                other
            };
            let high = if self.high_endpoint() >= other.high_endpoint() {
                self
            } else {
                other
            };
            RangeUnion::Merged(Range {
                start: low.start.clone(),
                end: high.end.clone(),
                includes_left: low.includes_left,
                includes_right: high.includes_right,
            })
        } else if self.low_endpoint() <= other.low_endpoint() {
            RangeUnion::Disjoint(self.clone(), other.clone())
        } else {
            RangeUnion::Disjoint(other.clone(), self.clone())
        }
    }

    pub(crate) fn intersection(&self, other: &Range) -> RangeIntersection {
        if !self.overlaps(other) {
            return RangeIntersection::Empty;
        }
        let low = if self.low_endpoint() >= other.low_endpoint() {
            self
        } else {
            other
        };
        let high = if self.high_endpoint() <= other.high_endpoint() {
            self
        } else {
            other
        };
        RangeIntersection::Overlap(Range {
            start: low.start.clone(),
            end: high.end.clone(),
            includes_left: low.includes_left,
            includes_right: high.includes_right,
        })
    }
}

/// Is `low` at or before `high` as a boundary check? Plain order only —
/// `overlaps` deliberately does not extend this with prefix-family
/// fallback (see [`Range::overlaps`]'s doc comment).
fn low_at_or_before_high(
    low: Option<&Version>,
    low_inclusive: bool,
    high: Option<&Version>,
    high_inclusive: bool,
) -> bool {
    match (low, high) {
        (None, _) | (_, None) => true,
        (Some(l), Some(h)) => match l.cmp(h) {
            Ordering::Less => true,
            Ordering::Equal => low_inclusive && high_inclusive,
            Ordering::Greater => false,
        },
    }
}

/// Is `self`'s high boundary at least as far out as `other`'s? Besides
/// plain order (with the usual side-dependent inclusivity tie-break), a
/// high boundary that names the family of `other`'s (e.g. `self.end = 4.7`,
/// `other.end = 4.7.3`) also counts, even though `4.7 < 4.7.3` under the
/// strict order.
fn high_reaches(
    self_end: Option<&Version>,
    self_inclusive: bool,
    other_end: Option<&Version>,
    other_inclusive: bool,
) -> bool {
    match (self_end, other_end) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(s), Some(o)) => match s.cmp(o) {
            Ordering::Greater => true,
            Ordering::Equal => self_inclusive || !other_inclusive,
            Ordering::Less => s.contains(o),
        },
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.includes_left == other.includes_left
            && self.includes_right == other.includes_right
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.includes_left.hash(state);
        self.includes_right.hash(state);
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        self.low_endpoint()
            .cmp(&other.low_endpoint())
            .then_with(|| self.high_endpoint().cmp(&other.high_endpoint()))
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(point) = self.concrete() {
            return write!(f, "{point}");
        }
        if let Some(start) = &self.start {
            write!(f, "{start}")?;
            if !self.includes_left {
                write!(f, "!")?;
            }
        }
        write!(f, ":")?;
        if let Some(end) = &self.end {
            if !self.includes_right {
                write!(f, "!")?;
            }
            write!(f, "{end}")?;
        }
        Ok(())
    }
}
