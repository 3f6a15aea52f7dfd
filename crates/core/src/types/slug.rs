//! URL slug type for product detail pages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9` and `-`.
    #[error("slug may only contain lowercase letters, digits and hyphens (found {0:?})")]
    InvalidChar(char),
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A product slug, e.g. `bridge-saw-3000`.
///
/// ```
/// use rmt_core::Slug;
///
/// assert!(Slug::parse("bridge-saw-3000").is_ok());
/// assert!(Slug::parse("Bridge Saw").is_err());
/// assert_eq!(Slug::from_name("Bridge Saw 3000!").as_str(), "bridge-saw-3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a slug, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is empty, too long, contains characters
    /// other than `a-z0-9-`, or begins/ends with a hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(c));
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from a display name.
    ///
    /// Runs of non-alphanumeric characters collapse to a single hyphen. A name
    /// with no usable characters yields `product`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut out = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out.truncate(Self::MAX_LENGTH);
        while out.ends_with('-') {
            out.pop();
        }
        if out.is_empty() {
            out.push_str("product");
        }
        Self(out)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Slug::parse(" x ").unwrap().as_str(), "x");
        assert!(Slug::parse("multi-wire-saw-mw80").is_ok());
    }

    #[test]
    fn test_parse_rejects_uppercase_and_spaces() {
        assert_eq!(Slug::parse("Saw"), Err(SlugError::InvalidChar('S')));
        assert_eq!(Slug::parse("a b"), Err(SlugError::InvalidChar(' ')));
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert_eq!(Slug::parse("-saw"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("saw-"), Err(SlugError::EdgeHyphen));
    }

    #[test]
    fn test_parse_empty_and_long() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert!(matches!(
            Slug::parse(&"a".repeat(129)),
            Err(SlugError::TooLong { .. })
        ));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Slug::from_name("CNC Bridge Saw").as_str(), "cnc-bridge-saw");
        assert_eq!(Slug::from_name("  --Edge Polisher--  ").as_str(), "edge-polisher");
        assert_eq!(Slug::from_name("!!!").as_str(), "product");
    }

    #[test]
    fn test_from_name_output_always_parses() {
        for name in ["Calibrating Machine 2.0", "ÉCLAT", "a  b", "-"] {
            let slug = Slug::from_name(name);
            assert!(Slug::parse(slug.as_str()).is_ok(), "{name} -> {slug}");
        }
    }
}
