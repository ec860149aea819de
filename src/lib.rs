//! Version algebra for a package manager.
//!
//! Three value types, layered leaves-first: a single point [`Version`], a
//! contiguous [`Range`] over versions, and a canonical disjoint [`VersionList`].
//! [`VersionValue`] is the public lattice type a caller actually holds —
//! parsing always returns the narrowest of the three that losslessly
//! represents the input, and every binary operation promotes both operands
//! to the higher of their two levels before dispatching.
//!
//! ```
//! use verset::VersionValue;
//!
//! let a: VersionValue = "1.0:1.5".parse().unwrap();
//! let b: VersionValue = "1.6:2.0".parse().unwrap();
//! assert_eq!(a.union(&b).to_string(), "1.0:2.0");
//!
//! assert!("4.7.3".parse::<VersionValue>().unwrap().satisfies(&"4.7".parse().unwrap()));
//! ```

mod endpoint;
mod error;
mod list;
mod range;
mod value;
mod version;

pub use error::Error;
pub use list::VersionList;
pub use range::{ParseRangeError, Range, RangeError};
pub use value::{SerializedForm, VersionValue};
pub use version::{ParseVersionError, ParseVersionErrorKind, Version};
