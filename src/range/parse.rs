use std::fmt::{Display, Formatter};

use thiserror::Error;

use super::{Range, RangeError};
use crate::version::{ParseVersionError, Version};

/// What a single comma-separated token of the grammar turned out to name.
pub(crate) enum RangeToken {
    Version(Version),
    Range(Range),
    /// The degenerate `a!:!a` form: equal endpoints, both excluded.
    Empty,
}

/// An error raised while parsing one `version`, `a:b` or `a.*` token.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseRangeError {
    /// The token names an endpoint that failed to parse as a [`Version`].
    #[error(transparent)]
    Version(#[from] ParseVersionError),
    /// The endpoints parsed fine but violate a [`Range`] invariant.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// The token contains more than one `:`.
    #[error("'{0}' has more than one ':'")]
    MultipleColons(String),
}

impl Display for RangeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeToken::Version(v) => write!(f, "{v}"),
            RangeToken::Range(r) => write!(f, "{r}"),
            RangeToken::Empty => Ok(()),
        }
    }
}

/// Parses one token of the grammar (no commas) into a [`Version`], [`Range`],
/// or the degenerate empty interval.
pub(crate) fn parse_range_token(input: &str) -> Result<RangeToken, ParseRangeError> {
    if input.contains('*') {
        return parse_starred(input);
    }

    let Some(colon) = input.find(':') else {
        return Ok(RangeToken::Version(input.parse()?));
    };
    let (left, right) = (&input[..colon], &input[colon + 1..]);
    if right.contains(':') {
        return Err(ParseRangeError::MultipleColons(input.to_owned()));
    }

    let (start, includes_left) = parse_boundary(left, '!', true)?;
    let (end, includes_right) = parse_boundary(right, '!', false)?;

    let range = Range::new(start, end, includes_left, includes_right)?;
    if range.is_empty() {
        Ok(RangeToken::Empty)
    } else {
        Ok(RangeToken::Range(range))
    }
}

/// Parses one range boundary, stripping a `!` from the side adjacent to the
/// colon (trailing on the left boundary, leading on the right one).
fn parse_boundary(
    text: &str,
    bang: char,
    bang_is_trailing: bool,
) -> Result<(Option<Version>, bool), ParseRangeError> {
    if text.is_empty() {
        return Ok((None, true));
    }
    let (core, inclusive) = if bang_is_trailing {
        match text.strip_suffix(bang) {
            Some(core) => (core, false),
            None => (text, true),
        }
    } else {
        match text.strip_prefix(bang) {
            Some(core) => (core, false),
            None => (text, true),
        }
    };
    Ok((Some(core.parse()?), inclusive))
}

/// A token containing `*` is only valid as a star-expanded version (`X.Y.*`)
/// with nothing else in the token; `*` anywhere else is surfaced as an
/// ordinary invalid-character parse error from [`Version::from_str`], and a
/// star combined with a colon is `RangeError::StarInInequality`.
fn parse_starred(input: &str) -> Result<RangeToken, ParseRangeError> {
    if input.contains(':') {
        return Err(RangeError::StarInInequality.into());
    }
    let Some(base) = input.strip_suffix(".*") else {
        // Not a trailing `.*`: let `Version::from_str` reject the stray `*`
        // with its own InvalidCharacter error.
        let _: Version = input.parse()?;
        unreachable!("Version::from_str rejects '*' unconditionally");
    };
    let base: Version = base.parse()?;
    Ok(RangeToken::Range(Range::star_expansion(base)?))
}

#[cfg(test)]
mod test {
    use super::{parse_range_token, RangeToken};

    #[test]
    fn parses_plain_version() {
        match parse_range_token("1.2.3").unwrap() {
            RangeToken::Version(v) => assert_eq!(v.to_string(), "1.2.3"),
            _ => panic!("expected a version"),
        }
    }

    #[test]
    fn parses_closed_range() {
        match parse_range_token("1.0:2.0").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), "1.0:2.0"),
            _ => panic!("expected a range"),
        }
    }

    #[test]
    fn parses_exclusive_range() {
        match parse_range_token("1.0!:!2.0").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), "1.0!:!2.0"),
            _ => panic!("expected a range"),
        }
    }

    #[test]
    fn parses_half_open_ranges() {
        match parse_range_token("1.0:").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), "1.0:"),
            _ => panic!("expected a range"),
        }
        match parse_range_token(":2.0").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), ":2.0"),
            _ => panic!("expected a range"),
        }
    }

    #[test]
    fn parses_universe() {
        match parse_range_token(":").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), ":"),
            _ => panic!("expected a range"),
        }
    }

    #[test]
    fn star_expands_to_half_open_range() {
        match parse_range_token("1.2.*").unwrap() {
            RangeToken::Range(r) => assert_eq!(r.to_string(), "1.2:!1.3"),
            _ => panic!("expected a range"),
        }
    }

    #[test]
    fn star_in_inequality_is_rejected() {
        let err = parse_range_token("1.2.*:1.5").unwrap_err();
        assert!(matches!(err, super::ParseRangeError::Range(crate::range::RangeError::StarInInequality)));
    }

    #[test]
    fn fully_excluded_equal_endpoints_is_empty() {
        assert!(matches!(parse_range_token("1.0!:!1.0").unwrap(), RangeToken::Empty));
    }

    #[test]
    fn rejects_multiple_colons() {
        assert!(parse_range_token("1.0:2.0:3.0").is_err());
    }
}
