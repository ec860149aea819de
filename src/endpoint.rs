//! A unified representation of range boundaries so that `Range` comparisons
//! can be written once instead of once per combination of open/closed,
//! bounded/unbounded, start/end.

use std::cmp::Ordering;

use crate::version::Version;

/// Which side of an interval an [`Endpoint`] bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A single range boundary: `None` means unbounded on that side, and
/// `inclusive` says whether the boundary value itself belongs to the range.
///
/// Ordering an `Endpoint` answers "does A come at or before B, when A and B
/// are both read as boundary positions on the version line". Two endpoints
/// that carry the same value but differ in `inclusive` are NOT equal: an
/// inclusive left bound sits just before an exclusive left bound at the same
/// value, and the reverse holds on the right.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint<'a> {
    pub value: Option<&'a Version>,
    pub side: Side,
    pub inclusive: bool,
}

impl<'a> Endpoint<'a> {
    pub fn left(value: Option<&'a Version>, inclusive: bool) -> Self {
        Endpoint {
            value,
            side: Side::Left,
            inclusive,
        }
    }

    pub fn right(value: Option<&'a Version>, inclusive: bool) -> Self {
        Endpoint {
            value,
            side: Side::Right,
            inclusive,
        }
    }

    /// Rank used only to order two unbounded-vs-unbounded or
    /// unbounded-vs-bounded endpoints against each other; bounded endpoints
    /// with equal value fall back to `tie_break`.
    fn unbounded_rank(&self) -> i8 {
        match (self.value, self.side) {
            (None, Side::Left) => -1,
            (None, Side::Right) => 1,
            (Some(_), _) => 0,
        }
    }

    fn tie_break(&self) -> i8 {
        match (self.side, self.inclusive) {
            (Side::Left, true) => -1,
            (Side::Left, false) => 1,
            (Side::Right, true) => 1,
            (Side::Right, false) => -1,
        }
    }
}

impl PartialEq for Endpoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Endpoint<'_> {}

impl PartialOrd for Endpoint<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Endpoint<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value, other.value) {
            (None, None) => self.unbounded_rank().cmp(&other.unbounded_rank()),
            (None, Some(_)) | (Some(_), None) => {
                self.unbounded_rank().cmp(&other.unbounded_rank())
            }
            (Some(a), Some(b)) => a.cmp(b).then(self.tie_break().cmp(&other.tie_break())),
        }
    }
}
