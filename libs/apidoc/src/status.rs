use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidStatusCode;

/// Response status key of an operation.
///
/// Holds a string whose first character is `1`-`5` followed by ASCII
/// alphanumerics, so both literal codes (`"201"`) and families (`"4XX"`) are
/// representable. Construction is the only place the shape is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusCode(Cow<'static, str>);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(Cow::Borrowed("200"));
    pub const CREATED: StatusCode = StatusCode(Cow::Borrowed("201"));
    pub const ACCEPTED: StatusCode = StatusCode(Cow::Borrowed("202"));
    pub const NO_CONTENT: StatusCode = StatusCode(Cow::Borrowed("204"));
    pub const BAD_REQUEST: StatusCode = StatusCode(Cow::Borrowed("400"));
    pub const UNAUTHORIZED: StatusCode = StatusCode(Cow::Borrowed("401"));
    pub const FORBIDDEN: StatusCode = StatusCode(Cow::Borrowed("403"));
    pub const NOT_FOUND: StatusCode = StatusCode(Cow::Borrowed("404"));
    pub const CONFLICT: StatusCode = StatusCode(Cow::Borrowed("409"));
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(Cow::Borrowed("422"));
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(Cow::Borrowed("500"));

    pub fn new(code: impl Into<String>) -> Result<Self, InvalidStatusCode> {
        let code = code.into();
        if Self::is_well_formed(&code) {
            Ok(Self(Cow::Owned(code)))
        } else {
            Err(InvalidStatusCode(code))
        }
    }

    fn is_well_formed(code: &str) -> bool {
        let mut chars = code.chars();
        matches!(chars.next(), Some('1'..='5')) && chars.all(|c| c.is_ascii_alphanumeric())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for literal codes (`"404"`), false for families (`"4XX"`).
    pub fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }

    fn sort_key(&self) -> (bool, usize, &str) {
        let numeric = self.is_numeric();
        (!numeric, if numeric { self.0.len() } else { 0 }, &self.0)
    }
}

/// Literal codes first in numeric order, then families.
impl Ord for StatusCode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for StatusCode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StatusCode {
    type Err = InvalidStatusCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (100..=599).contains(&value) {
            Ok(Self(Cow::Owned(value.to_string())))
        } else {
            Err(InvalidStatusCode(value.to_string()))
        }
    }
}

impl From<StatusCode> for String {
    fn from(code: StatusCode) -> Self {
        code.0.into_owned()
    }
}
