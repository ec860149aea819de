//! A sorted, disjoint, maximally-merged union of [`Version`]s and [`Range`]s.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use crate::range::{Range, RangeIntersection, RangeUnion};
use crate::version::Version;

/// One member of a canonical [`VersionList`]. Concrete ranges are always
/// reduced to a bare `Version` on insertion, so a `Range` element here is
/// always a genuine, non-degenerate interval.
#[derive(Debug, Clone)]
pub(crate) enum Element {
    Version(Version),
    Range(Range),
}

impl Element {
    fn as_range(&self) -> Range {
        match self {
            Element::Version(v) => Range::new(Some(v.clone()), Some(v.clone()), true, true)
                .expect("a point range is always valid"),
            Element::Range(r) => r.clone(),
        }
    }

    pub(crate) fn from_range(range: Range) -> Element {
        match range.concrete() {
            Some(point) => Element::Version(point.clone()),
            None => Element::Range(range),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Element::Version(v) => write!(f, "{v}"),
            Element::Range(r) => write!(f, "{r}"),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.as_range() == other.as_range()
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_range().hash(state);
    }
}

/// A sorted, disjoint, maximally-merged collection of versions and ranges.
#[derive(Debug, Clone, Default)]
pub struct VersionList {
    elements: Vec<Element>,
}

impl VersionList {
    /// The empty list: the distinguished "no solution" value.
    pub fn empty() -> VersionList {
        VersionList {
            elements: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// If this list reduces to a single point, return it.
    pub fn concrete(&self) -> Option<&Version> {
        match &self.elements[..] {
            [Element::Version(v)] => Some(v),
            _ => None,
        }
    }

    pub(crate) fn from_single(element: Element) -> VersionList {
        let mut list = VersionList::empty();
        list.insert(element);
        list
    }

    pub(crate) fn from_pair(a: Range, b: Range) -> VersionList {
        let mut list = VersionList::empty();
        list.insert(Element::from_range(a));
        list.insert(Element::from_range(b));
        list
    }

    /// Inserts `value`, merging with any overlapping or integer-adjacent
    /// neighbors so the three canonical invariants (sorted, disjoint,
    /// maximally merged) hold afterward.
    pub(crate) fn insert(&mut self, value: Element) {
        let mut current = value.as_range();
        let mut before: Vec<Element> = Vec::new();
        let mut after: Vec<Element> = Vec::new();
        let mut placed = false;

        for existing in self.elements.drain(..) {
            if placed {
                after.push(existing);
                continue;
            }
            let existing_range = existing.as_range();
            if current.overlaps(&existing_range) || current.is_adjacent_to(&existing_range) {
                current = match current.union(&existing_range) {
                    RangeUnion::Merged(merged) => merged,
                    RangeUnion::Disjoint(..) => {
                        unreachable!("overlap/adjacency already checked above")
                    }
                };
            } else if existing_range.ends_strictly_before(&current) {
                before.push(existing);
            } else {
                placed = true;
                after.push(existing);
            }
        }

        before.push(Element::from_range(current));
        before.extend(after);
        self.elements = before;
    }

    /// `other ⊆ self`.
    pub fn contains(&self, other: &VersionList) -> bool {
        other.elements.iter().all(|other_element| {
            let other_range = other_element.as_range();
            self.elements
                .iter()
                .any(|self_element| self_element.as_range().contains(&other_range))
        })
    }

    /// Two-pointer sweep: true iff some pair of elements, one from each
    /// list, overlap.
    pub fn overlaps(&self, other: &VersionList) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < other.elements.len() {
            let a = self.elements[i].as_range();
            let b = other.elements[j].as_range();
            if a.overlaps(&b) {
                return true;
            }
            if a.ends_strictly_before(&b) {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }

    /// Asymmetric: true iff every element of `other` is satisfied by some
    /// element of `self`. With `strict`, reduces to `self ⊆ other`.
    pub fn satisfies(&self, other: &VersionList, strict: bool) -> bool {
        if strict {
            return other.contains(self);
        }
        other.elements.iter().all(|other_element| {
            let other_range = other_element.as_range();
            self.elements
                .iter()
                .any(|self_element| self_element.as_range().satisfies(&other_range))
        })
    }

    pub fn union(&self, other: &VersionList) -> VersionList {
        let mut result = self.clone();
        for element in &other.elements {
            result.insert(element.clone());
        }
        result
    }

    pub fn intersection(&self, other: &VersionList) -> VersionList {
        let mut result = VersionList::empty();
        for a in &self.elements {
            for b in &other.elements {
                if let RangeIntersection::Overlap(overlap) = a.as_range().intersection(&b.as_range()) {
                    result.insert(Element::from_range(overlap));
                }
            }
        }
        result
    }

    /// The low endpoint of the first element, if any.
    pub fn lowest(&self) -> Option<&Version> {
        self.elements.first().and_then(|e| match e {
            Element::Version(v) => Some(v),
            Element::Range(r) => r.start(),
        })
    }

    /// The high endpoint of the last element, if any.
    pub fn highest(&self) -> Option<&Version> {
        self.elements.last().and_then(|e| match e {
            Element::Version(v) => Some(v),
            Element::Range(r) => r.end(),
        })
    }

    /// The high endpoint of the highest non-infinite element, falling back
    /// to the overall highest when every element is infinite.
    pub fn preferred(&self) -> Option<&Version> {
        self.elements
            .iter()
            .rev()
            .find_map(|e| match e {
                Element::Version(v) if !v.is_infinite() => Some(v),
                Element::Range(r) => match r.end() {
                    Some(end) if !end.is_infinite() => Some(end),
                    _ => None,
                },
                Element::Version(_) => None,
            })
            .or_else(|| self.highest())
    }
}

impl PartialEq for VersionList {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for VersionList {}

impl Hash for VersionList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl PartialOrd for VersionList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionList {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.elements.iter().zip(other.elements.iter()) {
            match a.as_range().cmp(&b.as_range()) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        self.elements.len().cmp(&other.elements.len())
    }
}

impl Display for VersionList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::{Element, VersionList};
    use crate::range::Range;
    use crate::version::Version;

    fn v(s: &str) -> Version {
        Version::from_str(s).unwrap()
    }

    fn r(start: &str, end: &str) -> Range {
        Range::new(Some(v(start)), Some(v(end)), true, true).unwrap()
    }

    #[test]
    fn insert_merges_overlapping_ranges() {
        let mut list = VersionList::empty();
        list.insert(Element::Range(r("1.0", "2.0")));
        list.insert(Element::Range(r("1.5", "3.0")));
        assert_eq!(list.to_string(), "1.0:3.0");
    }

    #[test]
    fn insert_merges_integer_adjacent_ranges() {
        let mut list = VersionList::empty();
        list.insert(Element::Range(r("1.0", "1.5")));
        list.insert(Element::Range(r("1.6", "2.0")));
        assert_eq!(list.to_string(), "1.0:2.0");
    }

    #[test]
    fn insert_keeps_disjoint_ranges_separate_and_sorted() {
        let mut list = VersionList::empty();
        list.insert(Element::Range(r("3.0", "4.0")));
        list.insert(Element::Range(r("1.0", "2.0")));
        assert_eq!(list.to_string(), "1.0:2.0,3.0:4.0");
    }

    #[test]
    fn insert_sorts_touching_exclusive_boundary_regardless_of_order() {
        let mut ascending = VersionList::empty();
        ascending.insert(Element::Range(
            Range::new(Some(v("1.0")), Some(v("2.0")), true, false).unwrap(),
        ));
        ascending.insert(Element::Range(r("2.0", "3.0")));
        assert_eq!(ascending.to_string(), "1.0:!2.0,2.0:3.0");

        let mut descending = VersionList::empty();
        descending.insert(Element::Range(r("2.0", "3.0")));
        descending.insert(Element::Range(
            Range::new(Some(v("1.0")), Some(v("2.0")), true, false).unwrap(),
        ));
        assert_eq!(descending.to_string(), "1.0:!2.0,2.0:3.0");
    }

    #[test]
    fn insert_reduces_concrete_range_to_version() {
        let mut list = VersionList::empty();
        list.insert(Element::Range(r("1.2.3", "1.2.3")));
        assert_eq!(list.concrete(), Some(&v("1.2.3")));
    }

    #[test]
    fn intersection_matches_seed_scenario() {
        let mut a = VersionList::empty();
        a.insert(Element::Range(r("1.0", "2.0")));
        a.insert(Element::Range(r("3.0", "4.0")));
        let mut b = VersionList::empty();
        b.insert(Element::Range(r("1.5", "3.5")));

        assert_eq!(a.intersection(&b).to_string(), "1.5:2.0,3.0:3.5");
    }

    #[test]
    fn preferred_skips_infinite_elements() {
        let mut list = VersionList::empty();
        list.insert(Element::Version(v("1.0")));
        list.insert(Element::Version(v("develop")));
        assert_eq!(list.preferred(), Some(&v("1.0")));
    }
}
