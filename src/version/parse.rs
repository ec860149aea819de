use std::fmt::{Display, Formatter};

use nom::branch::alt;
use nom::character::complete::{alpha1, digit1, one_of};
use nom::combinator::opt;
use nom::error::ErrorKind;
use nom::IResult;
use thiserror::Error;

use super::{Segment, SegmentVec, SeparatorVec, Version};

/// An error that occurred while parsing a string into a [`Version`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseVersionError {
    /// The original string that was the input of the parser.
    pub version: String,
    /// The kind of parse error that occurred.
    pub kind: ParseVersionErrorKind,
}

impl ParseVersionError {
    pub(crate) fn new(text: impl Into<String>, kind: ParseVersionErrorKind) -> Self {
        Self {
            version: text.into(),
            kind,
        }
    }
}

impl Display for ParseVersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed version string '{}': {}", self.version, self.kind)
    }
}

impl std::error::Error for ParseVersionError {}

/// The specific reason a version string failed to parse.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseVersionErrorKind {
    /// The string was empty.
    #[error("empty string")]
    Empty,
    /// The string contained a character outside `[A-Za-z0-9._-]`.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A segment was expected (a run of letters or digits) but none was found.
    #[error("expected a version segment, e.g. `2` or `rc`")]
    ExpectedSegment,
    /// A numeral segment did not fit in a `u64`.
    #[error("numeral segment is too large")]
    NumberOverflow,
    /// Characters remained after a valid version was parsed.
    #[error("unexpected trailing characters")]
    TrailingInput,
    /// An internal nom error that doesn't map onto a more specific kind.
    #[error("{0:?}")]
    Nom(ErrorKind),
}

impl<'i> nom::error::ParseError<&'i str> for ParseVersionErrorKind {
    fn from_error_kind(_: &'i str, kind: ErrorKind) -> Self {
        ParseVersionErrorKind::Nom(kind)
    }

    fn append(_: &'i str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

fn numeral_segment(input: &str) -> IResult<&str, Segment, ParseVersionErrorKind> {
    let (rest, digits) = digit1(input)?;
    match digits.parse::<u64>() {
        Ok(value) => Ok((
            rest,
            Segment::Number {
                value,
                text: digits.into(),
            },
        )),
        Err(_) => Err(nom::Err::Failure(ParseVersionErrorKind::NumberOverflow)),
    }
}

fn word_segment(input: &str) -> IResult<&str, Segment, ParseVersionErrorKind> {
    let (rest, word) = alpha1(input)?;
    Ok((rest, Segment::Word(word.into())))
}

/// Parses a single version [`Segment`] (an integer or an alphabetic run).
fn segment_parser(input: &str) -> IResult<&str, Segment, ParseVersionErrorKind> {
    match alt((numeral_segment, word_segment))(input) {
        Err(nom::Err::Error(ParseVersionErrorKind::Nom(_))) => {
            Err(nom::Err::Error(ParseVersionErrorKind::ExpectedSegment))
        }
        other => other,
    }
}

/// Parses the body of a version string: a leading segment followed by
/// `separator segment` pairs. A separator not followed by a segment is left
/// unconsumed in the returned remainder (the caller decides whether a single
/// dangling separator is acceptable).
pub(super) fn version_parser(
    input: &str,
) -> IResult<&str, (SegmentVec, SeparatorVec), ParseVersionErrorKind> {
    let mut segments = SegmentVec::new();
    let mut separators = SeparatorVec::new();

    let (mut rest, first) = segment_parser(input)?;
    segments.push(first);

    loop {
        let (after_sep, maybe_sep) =
            opt(one_of::<_, _, ParseVersionErrorKind>("._-"))(rest).expect("opt never fails");
        let Some(sep) = maybe_sep else {
            break;
        };
        match segment_parser(after_sep) {
            Ok((after_seg, seg)) => {
                separators.push(sep.to_string().into_boxed_str());
                segments.push(seg);
                rest = after_seg;
            }
            // A separator with nothing following it is a dropped trailing
            // separator (see the `Version` invariants), not an error.
            Err(_) => break,
        }
    }

    Ok((rest, (segments, separators)))
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

impl std::str::FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseVersionError::new(s, ParseVersionErrorKind::Empty));
        }
        if let Some(c) = s.chars().find(|&c| !is_version_char(c)) {
            return Err(ParseVersionError::new(s, ParseVersionErrorKind::InvalidCharacter(c)));
        }

        let (rest, (segments, separators)) = version_parser(s).map_err(|e| match e {
            nom::Err::Error(kind) | nom::Err::Failure(kind) => ParseVersionError::new(s, kind),
            nom::Err::Incomplete(_) => unreachable!("not streaming, so no other error possible"),
        })?;

        let dangling_separator = rest.len() == 1 && matches!(rest.as_bytes()[0], b'.' | b'_' | b'-');
        if !rest.is_empty() && !dangling_separator {
            return Err(ParseVersionError::new(s, ParseVersionErrorKind::TrailingInput));
        }

        let consumed = s.len() - rest.len();
        Ok(Version {
            source: s[..consumed].to_owned().into_boxed_str(),
            segments,
            separators,
        })
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::super::Version;

    #[test]
    fn drops_trailing_separator() {
        let v = Version::from_str("1.2.").unwrap();
        assert_eq!(v.to_string(), "1.2");
    }

    #[test]
    fn rejects_double_separator() {
        assert!(Version::from_str("1..2").is_err());
    }

    #[test]
    fn rejects_invalid_character() {
        let err = Version::from_str("1.2@3").unwrap_err();
        assert_eq!(err.kind, super::ParseVersionErrorKind::InvalidCharacter('@'));
    }

    #[test]
    fn rejects_empty() {
        assert!(Version::from_str("").is_err());
    }

    #[test]
    fn round_trips_mixed_case() {
        let v = Version::from_str("1.2.RC1").unwrap();
        assert_eq!(v.to_string(), "1.2.RC1");
    }
}
